//! Breakpoint widths used inside media feature conditions

use indexmap::IndexMap;

use super::kebab_case;
use crate::error::TokenError;

/// Breakpoint name → width in pixels, keyed by kebab-cased name.
///
/// # Example
///
/// ```
/// use stylepass::BreakpointTable;
///
/// let mut breakpoints = BreakpointTable::new();
/// breakpoints.insert("tabletLandscape", 1024.0);
///
/// assert_eq!(breakpoints.get("tablet-landscape"), Some(1024.0));
/// assert_eq!(breakpoints.get("tabletLandscape"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakpointTable {
    widths: IndexMap<String, f64>,
}

impl BreakpointTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "name": 640, "other": "1024px" }`.
    pub fn from_json(source: &str) -> Result<Self, TokenError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        let map = match value {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Array(_) => return Err(TokenError::NotAnObject { kind: "array" }),
            _ => return Err(TokenError::NotAnObject { kind: "scalar" }),
        };

        let mut table = Self::new();
        for (name, width) in &map {
            let px = match width {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => parse_px(s),
                _ => None,
            };
            match px {
                Some(px) => table.insert(name, px),
                None => {
                    return Err(TokenError::InvalidBreakpoint {
                        name: name.clone(),
                        value: width.to_string(),
                    })
                }
            }
        }
        Ok(table)
    }

    /// Add a breakpoint. The name is kebab-cased.
    pub fn insert(&mut self, name: &str, px: f64) {
        self.widths.insert(kebab_case(name), px);
    }

    /// Look up a width by kebab-cased key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.widths.get(key).copied()
    }

    /// Iterate over `(key, px)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.widths.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Accept `"640"` or `"640px"`.
fn parse_px(text: &str) -> Option<f64> {
    let text = text.trim();
    let number = text.strip_suffix("px").unwrap_or(text).trim();
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_numbers_and_px_strings() {
        let table =
            BreakpointTable::from_json(r#"{"sm": 640, "tabletLandscape": "1024px"}"#).unwrap();
        assert_eq!(table.get("sm"), Some(640.0));
        assert_eq!(table.get("tablet-landscape"), Some(1024.0));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_non_pixel() {
        let err = BreakpointTable::from_json(r#"{"md": "40em"}"#).unwrap_err();
        assert_eq!(
            err,
            TokenError::InvalidBreakpoint {
                name: "md".to_string(),
                value: "\"40em\"".to_string(),
            }
        );
    }

    #[test]
    fn test_from_json_rejects_array() {
        let err = BreakpointTable::from_json("[640]").unwrap_err();
        assert_eq!(err, TokenError::NotAnObject { kind: "array" });
    }

    #[test]
    fn test_iter_preserves_order() {
        let mut table = BreakpointTable::new();
        table.insert("lg", 1280.0);
        table.insert("sm", 640.0);
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["lg", "sm"]);
    }
}
