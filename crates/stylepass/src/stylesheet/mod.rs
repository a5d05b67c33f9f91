//! Style sheet syntax tree
//!
//! A deliberately small model of CSS: enough structure to find lengths,
//! `env()` references and media features, with everything else carried
//! through verbatim so that printing a parsed sheet reproduces it.
//!
//! ```text
//! StyleSheet
//! └── Rule::{Style, Media, At}
//!     └── Block
//!         ├── BlockItem::Declaration ── Vec<ComponentValue>
//!         └── BlockItem::Rule (nesting)
//! ```

mod display;
mod lexer;
mod parser;

pub use display::{format_number, Printer};
pub use lexer::{tokenize, Spanned, Token};
pub use parser::{parse_stylesheet, parse_value};

/// A parsed style sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
    /// Top-level rules in source order
    pub rules: Vec<Rule>,
}

impl StyleSheet {
    /// Create a sheet from rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse CSS text.
    pub fn parse(source: &str) -> Result<Self, crate::ParseError> {
        parse_stylesheet(source)
    }
}

/// A rule at the top level or nested inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `selector { ... }`
    Style(StyleRule),

    /// `@media <query-list> { ... }`
    Media(MediaRule),

    /// Any other at-rule: `@import ...;`, `@font-face { ... }`, `@keyframes`
    At(AtRule),
}

/// `selector { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Selector text, trimmed, carried verbatim
    pub selector: String,
    /// Rule body
    pub block: Block,
}

/// `@media <query-list> { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    /// The media query list
    pub queries: Vec<MediaQuery>,
    /// Rule body
    pub block: Block,
}

/// Any at-rule other than `@media`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Name without the `@`
    pub name: String,
    /// Prelude values between the name and `{`/`;`
    pub prelude: Vec<ComponentValue>,
    /// Body, or `None` for statement at-rules ending in `;`
    pub block: Option<Block>,
}

/// The body of a rule: declarations interleaved with nested rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Items in source order
    pub items: Vec<BlockItem>,
}

impl Block {
    /// Create a block from items.
    pub fn new(items: Vec<BlockItem>) -> Self {
        Self { items }
    }

    /// Iterate over the declarations directly inside this block.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.items.iter().filter_map(|item| match item {
            BlockItem::Declaration(decl) => Some(decl),
            BlockItem::Rule(_) => None,
        })
    }
}

/// One entry of a [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    /// `property: value;`
    Declaration(Declaration),
    /// A nested rule
    Rule(Rule),
}

/// `property: value [!important];`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name as written (custom properties keep their `--`)
    pub property: String,
    /// Value, with whitespace collapsed to single [`ComponentValue::Whitespace`]
    pub value: Vec<ComponentValue>,
    /// Whether the declaration carried `!important`
    pub important: bool,
}

impl Declaration {
    /// Create a declaration without `!important`.
    pub fn new(property: impl Into<String>, value: Vec<ComponentValue>) -> Self {
        Self {
            property: property.into(),
            value,
            important: false,
        }
    }

    /// Whether this declares a custom property (`--name`).
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }
}

/// One query of a media query list, e.g. `screen and (min-width: 40rem)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaQuery {
    /// Space-separated components
    pub components: Vec<MediaComponent>,
}

/// A component of a [`MediaQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaComponent {
    /// `(name: value)`, `(name >= value)` or `(name)`
    Feature(MediaFeature),
    /// `( ... )` wrapping a nested condition, e.g. `(not (hover))`
    Group(Vec<MediaComponent>),
    /// Anything else (`screen`, `and`, value-first ranges), kept verbatim
    Other(ComponentValue),
}

/// A media feature test inside parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFeature {
    /// Feature name, e.g. `min-width`
    pub name: String,
    /// Comparison, or `None` for boolean features like `(hover)`
    pub comparison: Option<Comparison>,
    /// Value to the right of the comparison
    pub value: Vec<ComponentValue>,
}

/// The operator between a media feature name and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `:`
    Colon,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `=`
    Eq,
}

impl Comparison {
    /// Source text of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Colon => ":",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "=",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Component Values
// ═══════════════════════════════════════════════════════════════════════

/// A single value in a declaration, prelude or function argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// Unitless number: `1.5`, `0`
    Number(Numeric),
    /// `50%`
    Percentage(Numeric),
    /// Number with a unit: `16px`, `1.5rem`, `150ms`
    Dimension(Dimension),
    /// Identifier or custom ident: `auto`, `--brand`
    Ident(String),
    /// `#fff`, stored without the `#`
    Hash(String),
    /// Quoted string
    String(QuotedString),
    /// Unquoted `url(...)`, stored without the wrapper
    Url(String),
    /// Generic function call: `rgba(...)`, `calc(...)`
    Function(Function),
    /// `env(--key[, fallback])`
    Env(EnvReference),
    /// `var(--key[, fallback])`
    Var(VarReference),
    /// `( ... )` outside of a function
    Parenthesized(Vec<ComponentValue>),
    /// `,`
    Comma,
    /// Any other single character: `/`, `+`, `!`, ...
    Delim(char),
    /// A run of whitespace, printed as one space
    Whitespace,
    /// Raw text emitted as-is
    Verbatim(String),
}

impl ComponentValue {
    /// Shorthand for a dimension value.
    pub fn dimension(value: f64, unit: Unit) -> Self {
        ComponentValue::Dimension(Dimension::new(value, unit))
    }

    /// Shorthand for a unitless number.
    pub fn number(value: f64) -> Self {
        ComponentValue::Number(Numeric::new(value))
    }

    /// Shorthand for a double-quoted string.
    pub fn string(value: &str) -> Self {
        ComponentValue::String(QuotedString::new(value))
    }

    /// Shorthand for an identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        ComponentValue::Ident(name.into())
    }

    /// The kind of node this value is, for visitor dispatch.
    pub fn kind(&self) -> NodeKind {
        match self {
            ComponentValue::Dimension(_) => NodeKind::Dimension,
            ComponentValue::Env(_) => NodeKind::Env,
            ComponentValue::Function(_) => NodeKind::Function,
            _ => NodeKind::Other,
        }
    }
}

/// Node kinds that visitors can register handlers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// [`ComponentValue::Dimension`]
    Dimension,
    /// [`ComponentValue::Env`]
    Env,
    /// [`ComponentValue::Function`]
    Function,
    /// Everything else; no handlers
    Other,
}

/// A number, remembering how it was written.
///
/// Equality compares the value only. `raw` is printed in place of the
/// value so that `+0025` or `.5` come out as written.
#[derive(Debug, Clone)]
pub struct Numeric {
    /// The value
    pub value: f64,
    /// Source text of the number, if parsed
    pub raw: Option<String>,
}

impl Numeric {
    /// A number with no source text.
    pub fn new(value: f64) -> Self {
        Self { value, raw: None }
    }
}

impl PartialEq for Numeric {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A number with a unit.
///
/// Equality compares value and unit. A parsed dimension keeps its source
/// text in `raw`, printed as long as the dimension is not replaced.
#[derive(Debug, Clone)]
pub struct Dimension {
    /// Magnitude
    pub value: f64,
    /// Unit
    pub unit: Unit,
    /// Source text, e.g. `-00FF`, if parsed
    pub raw: Option<String>,
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.unit == other.unit
    }
}

impl Dimension {
    /// Create a dimension.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self {
            value,
            unit,
            raw: None,
        }
    }

    /// Create a pixel length.
    pub fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    /// Create a root-em length.
    pub fn rem(value: f64) -> Self {
        Self::new(value, Unit::Rem)
    }
}

/// Units the transforms care about; everything else is [`Unit::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// `px`
    Px,
    /// `rem`
    Rem,
    /// Any other unit, lower-cased
    Other(String),
}

impl Unit {
    /// Parse a unit name (case-insensitive).
    pub fn parse(unit: &str) -> Self {
        let lower = unit.to_ascii_lowercase();
        match lower.as_str() {
            "px" => Unit::Px,
            "rem" => Unit::Rem,
            _ => Unit::Other(lower),
        }
    }

    /// Source text of this unit.
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Other(unit) => unit,
        }
    }
}

/// A generic function call.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Function name as written
    pub name: String,
    /// Arguments, including commas and whitespace
    pub arguments: Vec<ComponentValue>,
}

/// A quoted string as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedString {
    /// Contents between the quotes, escapes left as written
    pub value: String,
    /// The delimiter, `"` or `'`
    pub quote: char,
}

impl QuotedString {
    /// A double-quoted string with `text` as its contents; `"` and `\` are
    /// escaped.
    pub fn new(text: &str) -> Self {
        Self {
            value: text.replace('\\', "\\\\").replace('"', "\\\""),
            quote: '"',
        }
    }
}

/// `env(<ident>[, <fallback>])`
#[derive(Debug, Clone, PartialEq)]
pub struct EnvReference {
    /// The ident as written, e.g. `--space-md`
    pub name: String,
    /// Fallback values after the comma
    pub fallback: Option<Vec<ComponentValue>>,
}

impl EnvReference {
    /// Create a reference without a fallback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: None,
        }
    }

    /// The token key this reference names: the ident without a leading `--`.
    pub fn key(&self) -> &str {
        self.name.strip_prefix("--").unwrap_or(&self.name)
    }
}

/// `var(--name[, fallback])`
#[derive(Debug, Clone, PartialEq)]
pub struct VarReference {
    /// Custom property name, including `--`
    pub name: String,
    /// Fallback values after the comma
    pub fallback: Option<Vec<ComponentValue>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_strips_dashes() {
        assert_eq!(EnvReference::new("--space-md").key(), "space-md");
        assert_eq!(EnvReference::new("space-md").key(), "space-md");
    }

    #[test]
    fn test_unit_parse_is_case_insensitive() {
        assert_eq!(Unit::parse("PX"), Unit::Px);
        assert_eq!(Unit::parse("Rem"), Unit::Rem);
        assert_eq!(Unit::parse("MS"), Unit::Other("ms".to_string()));
    }

    #[test]
    fn test_equality_ignores_source_text() {
        let parsed = Dimension {
            raw: Some("016PX".to_string()),
            ..Dimension::px(16.0)
        };
        assert_eq!(parsed, Dimension::px(16.0));
    }

    #[test]
    fn test_quoted_string_new_escapes() {
        let s = QuotedString::new(r#"say "hi""#);
        assert_eq!(s.value, r#"say \"hi\""#);
        assert_eq!(s.quote, '"');
    }

    #[test]
    fn test_component_kind() {
        assert_eq!(
            ComponentValue::dimension(1.0, Unit::Px).kind(),
            NodeKind::Dimension
        );
        assert_eq!(
            ComponentValue::Env(EnvReference::new("--a")).kind(),
            NodeKind::Env
        );
        assert_eq!(ComponentValue::number(1.0).kind(), NodeKind::Other);
    }

    #[test]
    fn test_block_declarations_skip_rules() {
        let block = Block::new(vec![
            BlockItem::Declaration(Declaration::new("color", vec![ComponentValue::ident("red")])),
            BlockItem::Rule(Rule::Style(StyleRule {
                selector: "&:hover".to_string(),
                block: Block::default(),
            })),
        ]);
        assert_eq!(block.declarations().count(), 1);
    }
}
