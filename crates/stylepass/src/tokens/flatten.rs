//! Flattening of the nested token tree into dash-joined keys

use indexmap::IndexMap;
use serde::Serialize;

use super::{kebab_case, DesignTokenTable, TokenNode, TokenValue};
use crate::error::TokenError;

/// Dash-joined token key → literal value.
///
/// Built once from a [`DesignTokenTable`] and read-only afterwards. Every
/// leaf of the source tree has exactly one key: the kebab-cased path
/// segments joined with `-`.
///
/// # Example
///
/// ```
/// use stylepass::{DesignTokenTable, FlattenedTokenTable, TokenValue};
///
/// let mut tokens = DesignTokenTable::new();
/// tokens.insert("space.md", "16px");
/// tokens.insert("color.light.primaryHover", "#0af");
///
/// let flat = FlattenedTokenTable::flatten(&tokens).unwrap();
/// assert_eq!(flat.get("space-md"), Some(&TokenValue::from("16px")));
/// assert_eq!(flat.get("color-light-primary-hover"), Some(&TokenValue::from("#0af")));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FlattenedTokenTable {
    entries: IndexMap<String, TokenValue>,
}

impl FlattenedTokenTable {
    /// Flatten a design token tree, depth-first in authoring order.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if two different paths produce the same key, e.g.
    /// `{"a-b": 1, "a": {"b": 2}}`.
    pub fn flatten(tokens: &DesignTokenTable) -> Result<Self, TokenError> {
        let mut entries = IndexMap::with_capacity(tokens.leaf_count());
        let mut origins: IndexMap<String, String> = IndexMap::new();
        let mut path = Vec::new();
        walk(tokens.root(), &mut path, &mut entries, &mut origins)?;
        tracing::debug!(count = entries.len(), "flattened design tokens");
        Ok(Self { entries })
    }

    /// Look up a literal by flattened key.
    pub fn get(&self, key: &str) -> Option<&TokenValue> {
        self.entries.get(key)
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over `(key, value)` pairs in flattening order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All keys in flattening order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn walk(
    group: &IndexMap<String, TokenNode>,
    path: &mut Vec<String>,
    entries: &mut IndexMap<String, TokenValue>,
    origins: &mut IndexMap<String, String>,
) -> Result<(), TokenError> {
    for (name, node) in group {
        path.push(name.clone());
        match node {
            TokenNode::Group(children) => walk(children, path, entries, origins)?,
            TokenNode::Leaf(value) => {
                let key = flat_key(path);
                let origin = path.join(".");
                if let Some(first) = origins.get(&key) {
                    return Err(TokenError::DuplicateKey {
                        key,
                        first: first.clone(),
                        second: origin,
                    });
                }
                origins.insert(key.clone(), origin);
                entries.insert(key, value.clone());
            }
        }
        path.pop();
    }
    Ok(())
}

fn flat_key(path: &[String]) -> String {
    path.iter()
        .map(|segment| kebab_case(segment))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
