//! Error types for stylepass

use thiserror::Error;

/// A position in style sheet source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    /// Byte offset into the source
    pub offset: usize,

    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourcePosition {
    /// Compute the line/column of a byte offset in `source`.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            offset,
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors produced while parsing style sheet text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A block was opened with `{` but never closed
    #[error("unterminated block opened at {at}")]
    UnterminatedBlock {
        /// Where the block was opened
        at: SourcePosition,
    },

    /// A selector or at-rule prelude ran into something other than `{`
    #[error("expected `{{` after {what} at {at}")]
    ExpectedBlock {
        /// What was being parsed ("selector", "@media prelude", ...)
        what: String,
        /// Where parsing stopped
        at: SourcePosition,
    },

    /// A declaration is missing the `:` between property and value
    #[error("expected `:` after property `{property}` at {at}")]
    ExpectedColon {
        /// Property name read so far
        property: String,
        /// Where the colon was expected
        at: SourcePosition,
    },

    /// A declaration did not start with a property name
    #[error("expected property name, found `{found}` at {at}")]
    ExpectedProperty {
        /// Source text of the offending token
        found: String,
        /// Where it was found
        at: SourcePosition,
    },

    /// A function or parenthesized group was not closed
    #[error("unclosed `{opener}` opened at {at}")]
    Unclosed {
        /// The opening text (`env(`, `(`, ...)
        opener: String,
        /// Where it was opened
        at: SourcePosition,
    },

    /// A closing `}` or `)` appeared where nothing was open
    #[error("unexpected `{found}` at {at}")]
    Unexpected {
        /// Source text of the offending token
        found: String,
        /// Where it was found
        at: SourcePosition,
    },
}

/// Errors produced while loading or flattening design tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    /// Two distinct paths flatten to the same key
    #[error("duplicate token key `{key}` (from `{first}` and `{second}`)")]
    DuplicateKey {
        /// The flattened key
        key: String,
        /// Dotted path of the first definition
        first: String,
        /// Dotted path of the conflicting definition
        second: String,
    },

    /// A leaf value is neither a string nor a number
    #[error("unsupported token value at `{path}`: expected string or number, got {kind}")]
    UnsupportedValue {
        /// Dotted path of the leaf
        path: String,
        /// JSON kind that was found
        kind: &'static str,
    },

    /// The token document root is not an object
    #[error("token table must be a JSON object, got {kind}")]
    NotAnObject {
        /// JSON kind that was found
        kind: &'static str,
    },

    /// A breakpoint width is not a number of pixels
    #[error("breakpoint `{name}` must be a pixel width, got `{value}`")]
    InvalidBreakpoint {
        /// Breakpoint name as authored
        name: String,
        /// Offending value
        value: String,
    },

    /// The JSON document itself is malformed
    #[error("invalid token JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::Json(err.to_string())
    }
}

/// Errors in a [`TransformConfig`](crate::TransformConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The rem base must be a finite, positive number
    #[error("rem base must be a finite number greater than zero, got {0}")]
    InvalidRemBase(f64),
}

/// Main error type for stylepass operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StylepassError {
    /// Style sheet syntax error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Token table error
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for stylepass operations
pub type Result<T> = std::result::Result<T, StylepassError>;
