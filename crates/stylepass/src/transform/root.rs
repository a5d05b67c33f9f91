//! `:root` custom property emission

use super::inject::literal_values;
use super::{LengthNormalizer, Transform};
use crate::config::TransformConfig;
use crate::stylesheet::{Block, BlockItem, Declaration, Rule, StyleRule, StyleSheet};
use crate::tokens::FlattenedTokenTable;
use crate::visit::{ComposedVisitor, VisitContext};

/// Build a `:root { --key: value; ... }` rule declaring every token as a
/// custom property, in table order.
///
/// This is what `var(--key)` references left behind by
/// [`UnresolvedPolicy::NativeVariable`](crate::UnresolvedPolicy) resolve
/// against at runtime. Values are length-normalized when the config
/// enables it.
///
/// # Example
///
/// ```
/// use stylepass::*;
///
/// let mut tokens = DesignTokenTable::new();
/// tokens.insert("space.md", "16px");
/// let flat = FlattenedTokenTable::flatten(&tokens).unwrap();
///
/// let sheet = StyleSheet::new(vec![root_custom_properties(&flat, &TransformConfig::default())]);
/// assert_eq!(sheet.to_string(), ":root {\n  --space-md: 1rem;\n}\n");
/// ```
pub fn root_custom_properties(tokens: &FlattenedTokenTable, config: &TransformConfig) -> Rule {
    let normalizer = LengthNormalizer::new(config.rem_base);
    let mut visitor = ComposedVisitor::new();
    if config.normalize_lengths {
        normalizer.register(&mut visitor);
    }

    let items = tokens
        .iter()
        .map(|(key, value)| {
            let property = format!("--{}", key);
            let mut values = literal_values(key, value);
            visitor.visit_values(&mut values, &VisitContext::Declaration(property.clone()));
            BlockItem::Declaration(Declaration::new(property, values))
        })
        .collect();

    Rule::Style(StyleRule {
        selector: ":root".to_string(),
        block: Block::new(items),
    })
}

/// Insert `rule` as the first rule after the leading `@charset`,
/// `@import`, `@namespace` and `@layer a, b;` statements, which must
/// precede every other rule to take effect.
///
/// # Example
///
/// ```
/// use stylepass::*;
///
/// let mut sheet = StyleSheet::parse("@import url(a.css);\na { b: c }").unwrap();
/// insert_root_rule(&mut sheet, root_custom_properties(&FlattenedTokenTable::default(), &TransformConfig::default()));
/// assert_eq!(Printer::minified().print(&sheet), "@import url(a.css);:root{}a{b:c}");
/// ```
pub fn insert_root_rule(sheet: &mut StyleSheet, rule: Rule) {
    let at = sheet
        .rules
        .iter()
        .position(|rule| !is_leading_statement(rule))
        .unwrap_or(sheet.rules.len());
    sheet.rules.insert(at, rule);
}

fn is_leading_statement(rule: &Rule) -> bool {
    match rule {
        Rule::At(at) => match at.name.to_ascii_lowercase().as_str() {
            "charset" | "import" | "namespace" => true,
            "layer" => at.block.is_none(),
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::{Printer, StyleSheet};
    use crate::tokens::DesignTokenTable;

    fn flat() -> FlattenedTokenTable {
        let mut tokens = DesignTokenTable::new();
        tokens.insert("space.md", "16px");
        tokens.insert("space.none", "0px");
        tokens.insert("color.primary", "#0af");
        tokens.insert("z.modal", 100.0);
        FlattenedTokenTable::flatten(&tokens).unwrap()
    }

    #[test]
    fn test_declares_every_token_in_order() {
        let sheet = StyleSheet::new(vec![root_custom_properties(&flat(), &TransformConfig::default())]);
        assert_eq!(
            Printer::minified().print(&sheet),
            ":root{--space-md:1rem;--space-none:0;--color-primary:#0af;--z-modal:100}"
        );
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let config = TransformConfig::new().with_normalize_lengths(false);
        let sheet = StyleSheet::new(vec![root_custom_properties(&flat(), &config)]);
        assert!(Printer::minified().print(&sheet).starts_with(":root{--space-md:16px;--space-none:0px;"));
    }

    fn placed(source: &str) -> String {
        let mut sheet = StyleSheet::parse(source).unwrap();
        let rule = root_custom_properties(&flat(), &TransformConfig::default());
        insert_root_rule(&mut sheet, rule);
        Printer::minified().print(&sheet)
    }

    #[test]
    fn test_root_rule_follows_leading_statements() {
        assert_eq!(
            placed("@charset \"utf-8\"; @import url(a.css); @namespace svg url(x); @layer base, ui; a { b: c }"),
            "@charset \"utf-8\";@import url(a.css);@namespace svg url(x);@layer base, ui;\
             :root{--space-md:1rem;--space-none:0;--color-primary:#0af;--z-modal:100}a{b:c}"
        );
    }

    #[test]
    fn test_root_rule_precedes_layer_blocks() {
        assert!(placed("@layer base { a { b: c } }").starts_with(":root{"));
    }

    #[test]
    fn test_root_rule_first_without_statements() {
        assert!(placed("a { b: c } @import url(late.css);").starts_with(":root{"));
    }

    #[test]
    fn test_root_rule_appended_after_only_statements() {
        assert!(placed("@import url(a.css);").ends_with(";:root{--space-md:1rem;--space-none:0;--color-primary:#0af;--z-modal:100}"));
    }

    #[test]
    fn test_empty_table_gives_empty_rule() {
        let rule = root_custom_properties(&FlattenedTokenTable::default(), &TransformConfig::default());
        assert_eq!(StyleSheet::new(vec![rule]).to_string(), ":root {}\n");
    }
}
