//! The composed transform pipeline

use tracing::debug;

use crate::config::TransformConfig;
use crate::error::{ConfigError, Result};
use crate::stylesheet::{Printer, StyleSheet};
use crate::tokens::{BreakpointTable, FlattenedTokenTable};
use crate::transform::{LengthNormalizer, TokenInjector, Transform};
use crate::visit::{ComposedVisitor, VisitStats};

/// The Length Normalizer and Token Injector, composed into one traversal.
///
/// The normalizer is registered before the injector. Because injected
/// values are re-visited by handlers that have not yet run at their slot,
/// a token such as `16px` still comes out as `1rem`.
///
/// A pipeline only holds configuration and pre-parsed tables, so it can be
/// built once and run over any number of sheets.
///
/// # Example
///
/// ```
/// use stylepass::*;
///
/// let tokens = DesignTokenTable::from_json(r#"{"space": {"md": "16px"}}"#).unwrap();
/// let flat = FlattenedTokenTable::flatten(&tokens).unwrap();
/// let pipeline = Pipeline::new(&TransformConfig::default(), &flat, &BreakpointTable::new()).unwrap();
///
/// let mut sheet = parse_stylesheet("a { padding: env(--space-md) 18px }").unwrap();
/// pipeline.run(&mut sheet);
/// assert_eq!(sheet.to_string(), "a {\n  padding: 1rem 1.125rem;\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Option<LengthNormalizer>,
    injector: Option<TokenInjector>,
}

impl Pipeline {
    /// Validate the config and prepare both passes.
    pub fn new(
        config: &TransformConfig,
        tokens: &FlattenedTokenTable,
        breakpoints: &BreakpointTable,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let normalizer = config
            .normalize_lengths
            .then(|| LengthNormalizer::new(config.rem_base));
        let injector = config
            .inject_tokens
            .then(|| TokenInjector::new(tokens, breakpoints, config));

        Ok(Self {
            normalizer,
            injector,
        })
    }

    /// A visitor with every enabled pass registered, normalizer first.
    pub fn visitor(&self) -> ComposedVisitor<'_> {
        let mut visitor = ComposedVisitor::new();
        if let Some(normalizer) = &self.normalizer {
            normalizer.register(&mut visitor);
        }
        if let Some(injector) = &self.injector {
            injector.register(&mut visitor);
        }
        visitor
    }

    /// Rewrite a sheet in place.
    pub fn run(&self, sheet: &mut StyleSheet) -> VisitStats {
        let stats = self.visitor().visit(sheet);
        debug!(
            rules = sheet.rules.len(),
            visited = stats.visited,
            replaced = stats.replaced,
            "pipeline finished"
        );
        stats
    }
}

/// Parse, transform and pretty-print CSS source in one call.
///
/// # Example
///
/// ```
/// use stylepass::*;
///
/// let css = transform_css(
///     "a { margin: 0px 32px }",
///     &TransformConfig::default(),
///     &FlattenedTokenTable::default(),
///     &BreakpointTable::new(),
/// )
/// .unwrap();
/// assert_eq!(css, "a {\n  margin: 0 2rem;\n}\n");
/// ```
pub fn transform_css(
    source: &str,
    config: &TransformConfig,
    tokens: &FlattenedTokenTable,
    breakpoints: &BreakpointTable,
) -> Result<String> {
    let pipeline = Pipeline::new(config, tokens, breakpoints)?;
    let mut sheet = StyleSheet::parse(source)?;
    pipeline.run(&mut sheet);
    Ok(Printer::pretty().print(&sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StylepassError;
    use crate::stylesheet::NodeKind;
    use crate::tokens::DesignTokenTable;

    fn flat(json: &str) -> FlattenedTokenTable {
        FlattenedTokenTable::flatten(&DesignTokenTable::from_json(json).unwrap()).unwrap()
    }

    #[test]
    fn test_normalizer_registered_before_injector() {
        let pipeline =
            Pipeline::new(&TransformConfig::default(), &flat("{}"), &BreakpointTable::new()).unwrap();
        let visitor = pipeline.visitor();
        assert_eq!(visitor.handler_names(NodeKind::Dimension), vec!["length-normalizer"]);
        assert_eq!(visitor.handler_names(NodeKind::Env), vec!["token-injector"]);
    }

    #[test]
    fn test_disabled_passes_are_not_registered() {
        let config = TransformConfig::new()
            .with_normalize_lengths(false)
            .with_inject_tokens(false);
        let pipeline = Pipeline::new(&config, &flat("{}"), &BreakpointTable::new()).unwrap();
        let visitor = pipeline.visitor();
        assert!(visitor.handler_names(NodeKind::Dimension).is_empty());
        assert!(visitor.handler_names(NodeKind::Env).is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TransformConfig::new().with_rem_base(-1.0);
        assert_eq!(
            Pipeline::new(&config, &flat("{}"), &BreakpointTable::new()).unwrap_err(),
            ConfigError::InvalidRemBase(-1.0)
        );
    }

    #[test]
    fn test_injected_length_is_normalized() {
        let tokens = flat(r#"{"space": {"md": "16px"}}"#);
        let css = transform_css(
            "a { padding: env(--space-md) }",
            &TransformConfig::default(),
            &tokens,
            &BreakpointTable::new(),
        )
        .unwrap();
        assert_eq!(css, "a {\n  padding: 1rem;\n}\n");
    }

    #[test]
    fn test_transform_css_reports_parse_errors() {
        let err = transform_css(
            "a { color: red",
            &TransformConfig::default(),
            &flat("{}"),
            &BreakpointTable::new(),
        )
        .unwrap_err();
        assert!(matches!(err, StylepassError::Parse(_)));
    }

    #[test]
    fn test_run_reports_stats() {
        let pipeline =
            Pipeline::new(&TransformConfig::default(), &flat("{}"), &BreakpointTable::new()).unwrap();
        let mut sheet = StyleSheet::parse("a { margin: 8px 1rem }").unwrap();
        let stats = pipeline.run(&mut sheet);
        assert_eq!(stats.replaced, 1);
    }
}
