//! Design token tables
//!
//! Tokens are authored as a nested JSON object. Leaves are strings or
//! numbers; every other level is a named group:
//!
//! ```json
//! { "space": { "md": "16px" }, "color": { "light": { "primary": "#fff" } } }
//! ```
//!
//! [`FlattenedTokenTable`] turns that tree into dash-joined keys
//! (`space-md`, `color-light-primary`), which is what `env()` references
//! name. [`BreakpointTable`] is a separate flat table used inside media
//! feature conditions.

mod breakpoints;
mod case;
mod flatten;

pub use breakpoints::BreakpointTable;
pub use case::kebab_case;
pub use flatten::FlattenedTokenTable;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TokenError;
use crate::stylesheet::format_number;

/// A leaf value in a token table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    /// A bare number, e.g. a font weight or z-index
    Number(f64),
    /// Any CSS value text: `16px`, `#ffffff`, `0 1px 2px #0003`
    String(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Number(n) => f.write_str(&format_number(*n)),
            TokenValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(s: &str) -> Self {
        TokenValue::String(s.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(s: String) -> Self {
        TokenValue::String(s)
    }
}

impl From<f64> for TokenValue {
    fn from(n: f64) -> Self {
        TokenValue::Number(n)
    }
}

/// A node of the authored token tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    /// A named group of further nodes
    Group(IndexMap<String, TokenNode>),
    /// A token value
    Leaf(TokenValue),
}

/// The authored, nested design token table.
///
/// # Example
///
/// ```
/// use stylepass::{DesignTokenTable, TokenValue};
///
/// let mut tokens = DesignTokenTable::new();
/// tokens.insert("space.md", "16px");
/// tokens.insert("font.weight.bold", 700.0);
///
/// assert_eq!(tokens.get("space.md"), Some(&TokenValue::from("16px")));
/// assert_eq!(tokens.leaf_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesignTokenTable {
    root: IndexMap<String, TokenNode>,
}

impl DesignTokenTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON text.
    pub fn from_json(source: &str) -> Result<Self, TokenError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        Self::from_json_value(&value)
    }

    /// Build a table from an already-parsed JSON value.
    ///
    /// The root must be an object. Leaves must be strings or numbers;
    /// anything else is rejected with the path where it was found.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, TokenError> {
        match value {
            serde_json::Value::Object(map) => {
                let mut path = Vec::new();
                Ok(Self {
                    root: group_from_json(map, &mut path)?,
                })
            }
            other => Err(TokenError::NotAnObject {
                kind: json_kind(other),
            }),
        }
    }

    /// Insert a leaf at a dotted path, creating groups as needed.
    ///
    /// A leaf standing where a group is needed is replaced by a group.
    pub fn insert(&mut self, path: &str, value: impl Into<TokenValue>) {
        let segments: Vec<&str> = path.split('.').collect();
        insert_into(&mut self.root, &segments, value.into());
    }

    /// Look up a leaf by dotted path.
    pub fn get(&self, path: &str) -> Option<&TokenValue> {
        let mut segments = path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            node = match node {
                TokenNode::Group(children) => children.get(segment)?,
                TokenNode::Leaf(_) => return None,
            };
        }
        match node {
            TokenNode::Leaf(value) => Some(value),
            TokenNode::Group(_) => None,
        }
    }

    /// Top-level groups and leaves in authoring order.
    pub fn root(&self) -> &IndexMap<String, TokenNode> {
        &self.root
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        fn count(group: &IndexMap<String, TokenNode>) -> usize {
            group
                .values()
                .map(|node| match node {
                    TokenNode::Group(children) => count(children),
                    TokenNode::Leaf(_) => 1,
                })
                .sum()
        }
        count(&self.root)
    }

    /// Whether the table has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }
}

fn insert_into(group: &mut IndexMap<String, TokenNode>, segments: &[&str], value: TokenValue) {
    match segments {
        [] => {}
        [last] => {
            group.insert(last.to_string(), TokenNode::Leaf(value));
        }
        [first, rest @ ..] => {
            let node = group
                .entry(first.to_string())
                .or_insert_with(|| TokenNode::Group(IndexMap::new()));
            if let TokenNode::Leaf(_) = node {
                *node = TokenNode::Group(IndexMap::new());
            }
            if let TokenNode::Group(children) = node {
                insert_into(children, rest, value);
            }
        }
    }
}

fn group_from_json(
    map: &serde_json::Map<String, serde_json::Value>,
    path: &mut Vec<String>,
) -> Result<IndexMap<String, TokenNode>, TokenError> {
    let mut group = IndexMap::with_capacity(map.len());
    for (name, value) in map {
        path.push(name.clone());
        let node = match value {
            serde_json::Value::Object(children) => TokenNode::Group(group_from_json(children, path)?),
            serde_json::Value::String(s) => TokenNode::Leaf(TokenValue::String(s.clone())),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(n) => TokenNode::Leaf(TokenValue::Number(n)),
                None => {
                    return Err(TokenError::UnsupportedValue {
                        path: path.join("."),
                        kind: "number out of range",
                    })
                }
            },
            other => {
                return Err(TokenError::UnsupportedValue {
                    path: path.join("."),
                    kind: json_kind(other),
                })
            }
        };
        path.pop();
        group.insert(name.clone(), node);
    }
    Ok(group)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_nested() {
        let tokens =
            DesignTokenTable::from_json(r##"{"color": {"light": {"primary": "#fff"}}, "z": 10}"##)
                .unwrap();
        assert_eq!(
            tokens.get("color.light.primary"),
            Some(&TokenValue::from("#fff"))
        );
        assert_eq!(tokens.get("z"), Some(&TokenValue::Number(10.0)));
        assert_eq!(tokens.get("color.light"), None);
        assert_eq!(tokens.leaf_count(), 2);
    }

    #[test]
    fn test_from_json_rejects_unsupported_leaf() {
        let err = DesignTokenTable::from_json(r#"{"a": {"b": [1, 2]}}"#).unwrap_err();
        assert_eq!(
            err,
            TokenError::UnsupportedValue {
                path: "a.b".to_string(),
                kind: "array",
            }
        );
    }

    #[test]
    fn test_from_json_rejects_non_object_root() {
        let err = DesignTokenTable::from_json("[1]").unwrap_err();
        assert_eq!(err, TokenError::NotAnObject { kind: "array" });
    }

    #[test]
    fn test_from_json_syntax_error() {
        let err = DesignTokenTable::from_json("{").unwrap_err();
        assert!(matches!(err, TokenError::Json(_)));
    }

    #[test]
    fn test_insert_replaces_leaf_with_group() {
        let mut tokens = DesignTokenTable::new();
        tokens.insert("a", "1px");
        tokens.insert("a.b", "2px");
        assert_eq!(tokens.get("a"), None);
        assert_eq!(tokens.get("a.b"), Some(&TokenValue::from("2px")));
    }

    #[test]
    fn test_token_value_display() {
        assert_eq!(TokenValue::Number(600.0).to_string(), "600");
        assert_eq!(TokenValue::from("1px").to_string(), "1px");
    }
}
