//! # Stylepass
//!
//! Design-token injection and pixel-to-rem normalization for CSS.
//!
//! Stylepass parses a style sheet into a small syntax tree, runs a set of
//! independent rewrite passes over it in a single traversal, and prints the
//! result back out.
//!
//! ## Architecture
//!
//! - **Style sheet**: lexer, parser and printer for the CSS syntax tree
//! - **Tokens**: the nested design token table, its flattened form, and
//!   the breakpoint table used inside media queries
//! - **Visitor**: ordered per-node-kind handler lists run in one walk
//! - **Transforms**: the Length Normalizer and the Token Injector
//! - **Pipeline**: both passes composed, driven by a [`TransformConfig`]
//!
//! ## Example
//!
//! ```
//! use stylepass::*;
//!
//! let tokens = DesignTokenTable::from_json(r#"{"space": {"md": "16px"}}"#).unwrap();
//! let flat = FlattenedTokenTable::flatten(&tokens).unwrap();
//! let mut breakpoints = BreakpointTable::new();
//! breakpoints.insert("tablet", 768.0);
//!
//! let css = transform_css(
//!     "@media (min-width: env(--tablet)) { a { gap: env(--space-md) } }",
//!     &TransformConfig::default(),
//!     &flat,
//!     &breakpoints,
//! )
//! .unwrap();
//! assert_eq!(css, "@media (min-width: 48rem) {\n  a {\n    gap: 1rem;\n  }\n}\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod stylesheet;
pub mod tokens;
pub mod transform;
pub mod visit;

// Re-export main types
pub use config::{BreakpointPrecedence, TransformConfig, UnresolvedPolicy, DEFAULT_REM_BASE};
pub use error::{
    ConfigError, ParseError, Result, SourcePosition, StylepassError, TokenError,
};
pub use pipeline::{transform_css, Pipeline};
pub use stylesheet::{
    parse_stylesheet, parse_value, AtRule, Block, BlockItem, Comparison, ComponentValue,
    Declaration, Dimension, EnvReference, Function, MediaComponent, MediaFeature, MediaQuery,
    MediaRule, NodeKind, Numeric, Printer, QuotedString, Rule, StyleRule, StyleSheet, Unit,
    VarReference,
};
pub use tokens::{
    kebab_case, BreakpointTable, DesignTokenTable, FlattenedTokenTable, TokenNode, TokenValue,
};
pub use transform::{
    insert_root_rule, root_custom_properties, LengthNormalizer, TokenInjector, Transform,
};
pub use visit::{ComposedVisitor, Rewrite, VisitContext, VisitStats};

/// Stylepass version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
