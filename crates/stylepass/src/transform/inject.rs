//! Design token injection for `env()` references

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::Transform;
use crate::config::{BreakpointPrecedence, TransformConfig, UnresolvedPolicy};
use crate::stylesheet::{parse_value, ComponentValue, Dimension, EnvReference, VarReference};
use crate::tokens::{kebab_case, BreakpointTable, FlattenedTokenTable, TokenValue};
use crate::visit::{ComposedVisitor, Rewrite, VisitContext};

/// Replaces `env(--key)` with the token's literal value.
///
/// Literals are parsed once, up front, into component values, so `16px`
/// becomes a dimension, `#fff` a hash color and `0 1px 2px #0003` a spliced
/// sequence. Inside a media feature the breakpoint table is consulted too,
/// in the order given by [`BreakpointPrecedence`]. Unknown keys never fail:
/// they become `var(--key)` or stay as written, per [`UnresolvedPolicy`].
/// Inside a media query they always stay as written.
///
/// # Example
///
/// ```
/// use stylepass::*;
///
/// let mut tokens = DesignTokenTable::new();
/// tokens.insert("color.primary", "#0af");
/// let flat = FlattenedTokenTable::flatten(&tokens).unwrap();
///
/// let injector = TokenInjector::new(&flat, &BreakpointTable::new(), &TransformConfig::default());
/// let ctx = VisitContext::Declaration("color".into());
///
/// assert_eq!(
///     injector.resolve(&EnvReference::new("--color-primary"), &ctx),
///     Rewrite::Replace(ComponentValue::Hash("0af".into()))
/// );
/// assert_eq!(
///     injector.resolve(&EnvReference::new("--color-accent"), &ctx),
///     Rewrite::Replace(ComponentValue::Var(VarReference {
///         name: "--color-accent".into(),
///         fallback: None,
///     }))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TokenInjector {
    tokens: IndexMap<String, Vec<ComponentValue>>,
    breakpoints: IndexMap<String, f64>,
    unresolved: UnresolvedPolicy,
    precedence: BreakpointPrecedence,
}

impl TokenInjector {
    /// Build an injector, parsing every token literal once.
    pub fn new(
        tokens: &FlattenedTokenTable,
        breakpoints: &BreakpointTable,
        config: &TransformConfig,
    ) -> Self {
        let tokens: IndexMap<String, Vec<ComponentValue>> = tokens
            .iter()
            .map(|(key, value)| (key.to_string(), literal_values(key, value)))
            .collect();
        let breakpoints = breakpoints
            .iter()
            .map(|(key, px)| (key.to_string(), px))
            .collect();
        debug!(tokens = tokens.len(), "token injector ready");

        Self {
            tokens,
            breakpoints,
            unresolved: config.unresolved,
            precedence: config.precedence,
        }
    }

    /// Resolve one reference in its context.
    pub fn resolve(&self, env: &EnvReference, ctx: &VisitContext) -> Rewrite<ComponentValue> {
        let key = env.key();
        let resolved = match ctx.media_feature() {
            Some(_) => match self.precedence {
                BreakpointPrecedence::BreakpointsFirst => {
                    self.breakpoint(key).or_else(|| self.token(key))
                }
                BreakpointPrecedence::TokensFirst => {
                    self.token(key).or_else(|| self.breakpoint(key))
                }
            },
            None => self.token(key),
        };

        match resolved {
            Some(mut values) if values.len() == 1 => Rewrite::Replace(values.remove(0)),
            Some(values) => Rewrite::Splice(values),
            None => self.unresolved(env, ctx),
        }
    }

    fn token(&self, key: &str) -> Option<Vec<ComponentValue>> {
        self.tokens.get(key).cloned()
    }

    fn breakpoint(&self, key: &str) -> Option<Vec<ComponentValue>> {
        self.breakpoints
            .get(&kebab_case(key))
            .map(|px| vec![ComponentValue::Dimension(Dimension::px(*px))])
    }

    fn unresolved(&self, env: &EnvReference, ctx: &VisitContext) -> Rewrite<ComponentValue> {
        debug!(key = env.key(), policy = ?self.unresolved, "unresolved token reference");
        // var() is invalid in media queries
        if ctx.is_media() {
            return Rewrite::Unchanged;
        }
        match self.unresolved {
            UnresolvedPolicy::PassThrough => Rewrite::Unchanged,
            UnresolvedPolicy::NativeVariable => Rewrite::Replace(ComponentValue::Var(VarReference {
                name: format!("--{}", env.key()),
                fallback: env.fallback.clone(),
            })),
        }
    }
}

impl Transform for TokenInjector {
    fn name(&self) -> &'static str {
        "token-injector"
    }

    fn register<'a>(&'a self, visitor: &mut ComposedVisitor<'a>) {
        visitor.on_env(self.name(), move |env, ctx| self.resolve(env, ctx));
    }
}

/// Parse a token literal into component values.
///
/// A literal that is not valid CSS is kept verbatim rather than failing
/// the build.
pub(crate) fn literal_values(key: &str, value: &TokenValue) -> Vec<ComponentValue> {
    match value {
        TokenValue::Number(n) => vec![ComponentValue::number(*n)],
        TokenValue::String(text) => match parse_value(text) {
            Ok(values) => values,
            Err(err) => {
                warn!(key, %err, "token literal is not a CSS value; inlining verbatim");
                vec![ComponentValue::Verbatim(text.trim().to_string())]
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Unit;
    use crate::tokens::DesignTokenTable;

    fn injector(config: TransformConfig) -> TokenInjector {
        let mut tokens = DesignTokenTable::new();
        tokens.insert("space.md", "16px");
        tokens.insert("color.light.primary", "#ffffff");
        tokens.insert("shadow.sm", "0 1px 2px rgba(0, 0, 0, 0.1)");
        tokens.insert("font.weight.bold", 700.0);
        tokens.insert("md", "999px");
        let flat = FlattenedTokenTable::flatten(&tokens).unwrap();

        let mut breakpoints = BreakpointTable::new();
        breakpoints.insert("md", 768.0);
        breakpoints.insert("tabletLandscape", 1024.0);

        TokenInjector::new(&flat, &breakpoints, &config)
    }

    fn decl_ctx() -> VisitContext {
        VisitContext::Declaration("padding".into())
    }

    fn media_ctx() -> VisitContext {
        VisitContext::MediaFeature("min-width".into())
    }

    #[test]
    fn test_resolves_length() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("--space-md"), &decl_ctx()),
            Rewrite::Replace(ComponentValue::dimension(16.0, Unit::Px))
        );
    }

    #[test]
    fn test_resolves_color_and_number() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("--color-light-primary"), &decl_ctx()),
            Rewrite::Replace(ComponentValue::Hash("ffffff".into()))
        );
        assert_eq!(
            inj.resolve(&EnvReference::new("--font-weight-bold"), &decl_ctx()),
            Rewrite::Replace(ComponentValue::number(700.0))
        );
    }

    #[test]
    fn test_multi_part_value_is_spliced() {
        let inj = injector(TransformConfig::default());
        match inj.resolve(&EnvReference::new("--shadow-sm"), &decl_ctx()) {
            Rewrite::Splice(values) => {
                assert_eq!(values.len(), 7);
                assert!(matches!(&values[6], ComponentValue::Function(f) if f.name == "rgba"));
            }
            other => panic!("expected splice, got {:?}", other),
        }
    }

    #[test]
    fn test_key_without_leading_dashes() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("space-md"), &decl_ctx()),
            Rewrite::Replace(ComponentValue::dimension(16.0, Unit::Px))
        );
    }

    #[test]
    fn test_unresolved_native_variable_keeps_fallback() {
        let inj = injector(TransformConfig::default());
        let env = EnvReference {
            name: "--missing".into(),
            fallback: Some(vec![ComponentValue::ident("red")]),
        };
        assert_eq!(
            inj.resolve(&env, &decl_ctx()),
            Rewrite::Replace(ComponentValue::Var(VarReference {
                name: "--missing".into(),
                fallback: Some(vec![ComponentValue::ident("red")]),
            }))
        );
    }

    #[test]
    fn test_unresolved_pass_through() {
        let inj = injector(TransformConfig::new().with_unresolved(UnresolvedPolicy::PassThrough));
        assert_eq!(
            inj.resolve(&EnvReference::new("--missing"), &decl_ctx()),
            Rewrite::Unchanged
        );
    }

    #[test]
    fn test_breakpoints_only_in_media_features() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("--tablet-landscape"), &media_ctx()),
            Rewrite::Replace(ComponentValue::dimension(1024.0, Unit::Px))
        );
        assert!(matches!(
            inj.resolve(&EnvReference::new("--tablet-landscape"), &decl_ctx()),
            Rewrite::Replace(ComponentValue::Var(ref var)) if var.name == "--tablet-landscape"
        ));
    }

    #[test]
    fn test_breakpoint_key_is_kebab_cased() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("--tabletLandscape"), &media_ctx()),
            Rewrite::Replace(ComponentValue::dimension(1024.0, Unit::Px))
        );
    }

    #[test]
    fn test_precedence_is_configurable() {
        let env = EnvReference::new("--md");

        let breakpoints_first = injector(TransformConfig::default());
        assert_eq!(
            breakpoints_first.resolve(&env, &media_ctx()),
            Rewrite::Replace(ComponentValue::dimension(768.0, Unit::Px))
        );

        let tokens_first =
            injector(TransformConfig::new().with_precedence(BreakpointPrecedence::TokensFirst));
        assert_eq!(
            tokens_first.resolve(&env, &media_ctx()),
            Rewrite::Replace(ComponentValue::dimension(999.0, Unit::Px))
        );
    }

    #[test]
    fn test_unresolved_in_media_is_never_a_variable() {
        let inj = injector(TransformConfig::default());
        let env = EnvReference::new("--missing");
        assert_eq!(inj.resolve(&env, &media_ctx()), Rewrite::Unchanged);
        assert_eq!(inj.resolve(&env, &VisitContext::MediaQuery), Rewrite::Unchanged);
    }

    #[test]
    fn test_media_feature_falls_back_to_tokens() {
        let inj = injector(TransformConfig::default());
        assert_eq!(
            inj.resolve(&EnvReference::new("--space-md"), &media_ctx()),
            Rewrite::Replace(ComponentValue::dimension(16.0, Unit::Px))
        );
    }

    #[test]
    fn test_invalid_literal_is_verbatim() {
        let values = literal_values("broken", &TokenValue::from("calc(1px"));
        assert_eq!(values, vec![ComponentValue::Verbatim("calc(1px".into())]);
    }

    #[test]
    fn test_empty_literal_splices_nothing() {
        assert!(literal_values("empty", &TokenValue::from("")).is_empty());
    }
}
