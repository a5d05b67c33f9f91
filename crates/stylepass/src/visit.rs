//! Visitor composition over the style sheet syntax tree
//!
//! Independent rewrite passes register handlers per node kind on a
//! [`ComposedVisitor`]; one traversal then runs them all. Handlers for a
//! kind run in registration order and each returns a [`Rewrite`].
//!
//! Children are visited before their parent. When a handler replaces a
//! node with one of a different kind (an `env()` becoming a `16px`
//! dimension), the replacement is visited again by the handlers of every
//! kind that has not yet run at that slot. A kind never runs twice at one
//! slot, so replacements cannot loop.

use tracing::trace;

use crate::stylesheet::{
    Block, BlockItem, ComponentValue, Declaration, Dimension, EnvReference, Function,
    MediaComponent, NodeKind, Rule, StyleSheet,
};

/// Result of a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite<T> {
    /// Keep the node as is
    Unchanged,
    /// Replace the node with another
    Replace(T),
    /// Replace the node with zero or more nodes
    Splice(Vec<T>),
}

/// Where a visited value sits in the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitContext {
    /// Inside the value of a declaration with this property
    Declaration(String),
    /// Inside a media feature test with this name, including value-first
    /// ranges like `(600px <= width)`
    MediaFeature(String),
    /// A media query component outside any feature, e.g. `screen`
    MediaQuery,
    /// Inside the prelude of the named at-rule
    Prelude(String),
}

impl VisitContext {
    /// The media feature name, if visiting inside one.
    pub fn media_feature(&self) -> Option<&str> {
        match self {
            VisitContext::MediaFeature(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the value sits anywhere in a media query, where only
    /// literal values are valid and `var()` is not.
    pub fn is_media(&self) -> bool {
        matches!(self, VisitContext::MediaFeature(_) | VisitContext::MediaQuery)
    }
}

/// Counters from one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitStats {
    /// Component values and declarations visited
    pub visited: usize,
    /// Handler results other than [`Rewrite::Unchanged`]
    pub replaced: usize,
}

type ValueHandler<'a, N> = Box<dyn Fn(&N, &VisitContext) -> Rewrite<ComponentValue> + 'a>;
type DeclarationHandler<'a> = Box<dyn Fn(&Declaration, &VisitContext) -> Rewrite<Declaration> + 'a>;

struct Registered<H> {
    name: &'static str,
    handler: H,
}

/// Set of node kinds whose handlers already ran at a slot.
#[derive(Debug, Clone, Copy, Default)]
struct KindSet(u8);

impl KindSet {
    fn bit(kind: NodeKind) -> u8 {
        match kind {
            NodeKind::Dimension => 1,
            NodeKind::Env => 2,
            NodeKind::Function => 4,
            NodeKind::Other => 0,
        }
    }

    fn contains(self, kind: NodeKind) -> bool {
        self.0 & Self::bit(kind) != 0
    }

    fn with(self, kind: NodeKind) -> Self {
        KindSet(self.0 | Self::bit(kind))
    }
}

/// Ordered handler lists per node kind, run in a single traversal.
///
/// # Example
///
/// ```
/// use stylepass::{parse_stylesheet, ComponentValue, ComposedVisitor, Rewrite, Unit};
///
/// let mut sheet = parse_stylesheet("a { width: 3pt }").unwrap();
///
/// let mut visitor = ComposedVisitor::new();
/// visitor.on_dimension("pt-to-px", |dim, _ctx| match &dim.unit {
///     Unit::Other(unit) if unit == "pt" => {
///         Rewrite::Replace(ComponentValue::dimension(dim.value * 4.0 / 3.0, Unit::Px))
///     }
///     _ => Rewrite::Unchanged,
/// });
/// let stats = visitor.visit(&mut sheet);
///
/// assert_eq!(stats.replaced, 1);
/// assert_eq!(sheet.to_string(), "a {\n  width: 4px;\n}\n");
/// ```
#[derive(Default)]
pub struct ComposedVisitor<'a> {
    dimension: Vec<Registered<ValueHandler<'a, Dimension>>>,
    env: Vec<Registered<ValueHandler<'a, EnvReference>>>,
    function: Vec<Registered<ValueHandler<'a, Function>>>,
    declaration: Vec<Registered<DeclarationHandler<'a>>>,
}

impl<'a> ComposedVisitor<'a> {
    /// Create a visitor with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Registration
    // ═══════════════════════════════════════════════════════════════════

    /// Register a handler for dimensions (`16px`, `1.5rem`, `150ms`).
    pub fn on_dimension(
        &mut self,
        name: &'static str,
        handler: impl Fn(&Dimension, &VisitContext) -> Rewrite<ComponentValue> + 'a,
    ) -> &mut Self {
        self.dimension.push(Registered {
            name,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a handler for `env()` references.
    pub fn on_env(
        &mut self,
        name: &'static str,
        handler: impl Fn(&EnvReference, &VisitContext) -> Rewrite<ComponentValue> + 'a,
    ) -> &mut Self {
        self.env.push(Registered {
            name,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a handler for generic function calls.
    pub fn on_function(
        &mut self,
        name: &'static str,
        handler: impl Fn(&Function, &VisitContext) -> Rewrite<ComponentValue> + 'a,
    ) -> &mut Self {
        self.function.push(Registered {
            name,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a handler for whole declarations, run after their values.
    pub fn on_declaration(
        &mut self,
        name: &'static str,
        handler: impl Fn(&Declaration, &VisitContext) -> Rewrite<Declaration> + 'a,
    ) -> &mut Self {
        self.declaration.push(Registered {
            name,
            handler: Box::new(handler),
        });
        self
    }

    /// Names of the handlers registered for a value kind, in order.
    pub fn handler_names(&self, kind: NodeKind) -> Vec<&'static str> {
        match kind {
            NodeKind::Dimension => self.dimension.iter().map(|r| r.name).collect(),
            NodeKind::Env => self.env.iter().map(|r| r.name).collect(),
            NodeKind::Function => self.function.iter().map(|r| r.name).collect(),
            NodeKind::Other => Vec::new(),
        }
    }

    /// Names of the registered declaration handlers, in order.
    pub fn declaration_handler_names(&self) -> Vec<&'static str> {
        self.declaration.iter().map(|r| r.name).collect()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Traversal
    // ═══════════════════════════════════════════════════════════════════

    /// Run every registered handler over the sheet, rewriting it in place.
    pub fn visit(&self, sheet: &mut StyleSheet) -> VisitStats {
        let mut stats = VisitStats::default();
        for rule in &mut sheet.rules {
            self.visit_rule(rule, &mut stats);
        }
        stats
    }

    /// Run value handlers over a standalone value list.
    pub fn visit_values(&self, values: &mut Vec<ComponentValue>, ctx: &VisitContext) -> VisitStats {
        let mut stats = VisitStats::default();
        self.rewrite_values(values, ctx, KindSet::default(), &mut stats);
        stats
    }

    fn visit_rule(&self, rule: &mut Rule, stats: &mut VisitStats) {
        match rule {
            Rule::Style(style) => self.visit_block(&mut style.block, stats),
            Rule::Media(media) => {
                for query in &mut media.queries {
                    self.visit_media_components(&mut query.components, stats);
                }
                self.visit_block(&mut media.block, stats);
            }
            Rule::At(at) => {
                let ctx = VisitContext::Prelude(at.name.clone());
                self.rewrite_values(&mut at.prelude, &ctx, KindSet::default(), stats);
                if let Some(block) = &mut at.block {
                    self.visit_block(block, stats);
                }
            }
        }
    }

    fn visit_media_components(&self, components: &mut Vec<MediaComponent>, stats: &mut VisitStats) {
        for component in std::mem::take(components) {
            match component {
                MediaComponent::Feature(mut feature) => {
                    let ctx = VisitContext::MediaFeature(feature.name.clone());
                    self.rewrite_values(&mut feature.value, &ctx, KindSet::default(), stats);
                    components.push(MediaComponent::Feature(feature));
                }
                MediaComponent::Group(mut inner) => {
                    self.visit_media_components(&mut inner, stats);
                    components.push(MediaComponent::Group(inner));
                }
                MediaComponent::Other(value) => {
                    let ctx = match &value {
                        ComponentValue::Parenthesized(inner) => {
                            VisitContext::MediaFeature(range_feature_name(inner))
                        }
                        _ => VisitContext::MediaQuery,
                    };
                    let mut out = Vec::new();
                    self.rewrite_value(value, &ctx, KindSet::default(), stats, &mut out);
                    components.extend(out.into_iter().map(MediaComponent::Other));
                }
            }
        }
    }

    fn visit_block(&self, block: &mut Block, stats: &mut VisitStats) {
        let items = std::mem::take(&mut block.items);
        for item in items {
            match item {
                BlockItem::Declaration(mut decl) => {
                    let ctx = VisitContext::Declaration(decl.property.clone());
                    self.rewrite_values(&mut decl.value, &ctx, KindSet::default(), stats);
                    for decl in self.rewrite_declaration(decl, &ctx, stats) {
                        block.items.push(BlockItem::Declaration(decl));
                    }
                }
                BlockItem::Rule(mut rule) => {
                    self.visit_rule(&mut rule, stats);
                    block.items.push(BlockItem::Rule(rule));
                }
            }
        }
    }

    fn rewrite_declaration(
        &self,
        decl: Declaration,
        ctx: &VisitContext,
        stats: &mut VisitStats,
    ) -> Vec<Declaration> {
        stats.visited += 1;
        let mut current = vec![decl];
        for registered in &self.declaration {
            let mut next = Vec::with_capacity(current.len());
            for decl in current {
                match (registered.handler)(&decl, ctx) {
                    Rewrite::Unchanged => next.push(decl),
                    Rewrite::Replace(replacement) => {
                        stats.replaced += 1;
                        trace!(handler = registered.name, property = %decl.property, "declaration replaced");
                        next.push(replacement);
                    }
                    Rewrite::Splice(replacements) => {
                        stats.replaced += 1;
                        trace!(handler = registered.name, property = %decl.property, count = replacements.len(), "declaration spliced");
                        next.extend(replacements);
                    }
                }
            }
            current = next;
        }
        current
    }

    fn rewrite_values(
        &self,
        values: &mut Vec<ComponentValue>,
        ctx: &VisitContext,
        done: KindSet,
        stats: &mut VisitStats,
    ) {
        let input = std::mem::take(values);
        let mut out = Vec::with_capacity(input.len());
        for value in input {
            self.rewrite_value(value, ctx, done, stats, &mut out);
        }
        *values = out;
    }

    /// Visit children, then run this slot's handlers; push the result(s).
    fn rewrite_value(
        &self,
        mut value: ComponentValue,
        ctx: &VisitContext,
        done: KindSet,
        stats: &mut VisitStats,
        out: &mut Vec<ComponentValue>,
    ) {
        stats.visited += 1;
        self.rewrite_children(&mut value, ctx, done, stats);

        let kind = value.kind();
        if kind == NodeKind::Other || done.contains(kind) {
            out.push(value);
            return;
        }

        let mut current = value;
        for index in 0..self.handler_count(kind) {
            let (name, result) = self.call(kind, index, &current, ctx);
            match result {
                Rewrite::Unchanged => {}
                Rewrite::Replace(next) => {
                    stats.replaced += 1;
                    trace!(handler = name, from = %current, to = %next, "value replaced");
                    if next.kind() == kind {
                        current = next;
                        continue;
                    }
                    self.rewrite_value(next, ctx, done.with(kind), stats, out);
                    return;
                }
                Rewrite::Splice(values) => {
                    stats.replaced += 1;
                    trace!(handler = name, from = %current, count = values.len(), "value spliced");
                    for next in values {
                        self.rewrite_value(next, ctx, done.with(kind), stats, out);
                    }
                    return;
                }
            }
        }
        out.push(current);
    }

    fn rewrite_children(
        &self,
        value: &mut ComponentValue,
        ctx: &VisitContext,
        done: KindSet,
        stats: &mut VisitStats,
    ) {
        match value {
            ComponentValue::Function(func) => {
                self.rewrite_values(&mut func.arguments, ctx, done, stats)
            }
            ComponentValue::Env(env) => {
                if let Some(fallback) = &mut env.fallback {
                    self.rewrite_values(fallback, ctx, done, stats);
                }
            }
            ComponentValue::Var(var) => {
                if let Some(fallback) = &mut var.fallback {
                    self.rewrite_values(fallback, ctx, done, stats);
                }
            }
            ComponentValue::Parenthesized(inner) => self.rewrite_values(inner, ctx, done, stats),
            _ => {}
        }
    }

    fn handler_count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Dimension => self.dimension.len(),
            NodeKind::Env => self.env.len(),
            NodeKind::Function => self.function.len(),
            NodeKind::Other => 0,
        }
    }

    fn call(
        &self,
        kind: NodeKind,
        index: usize,
        value: &ComponentValue,
        ctx: &VisitContext,
    ) -> (&'static str, Rewrite<ComponentValue>) {
        match (kind, value) {
            (NodeKind::Dimension, ComponentValue::Dimension(dim)) => {
                let r = &self.dimension[index];
                (r.name, (r.handler)(dim, ctx))
            }
            (NodeKind::Env, ComponentValue::Env(env)) => {
                let r = &self.env[index];
                (r.name, (r.handler)(env, ctx))
            }
            (NodeKind::Function, ComponentValue::Function(func)) => {
                let r = &self.function[index];
                (r.name, (r.handler)(func, ctx))
            }
            _ => ("", Rewrite::Unchanged),
        }
    }
}

/// The feature name of a range the parser did not recognize, such as
/// `(600px <= width)`: its first identifier.
fn range_feature_name(inner: &[ComponentValue]) -> String {
    inner
        .iter()
        .find_map(|v| match v {
            ComponentValue::Ident(name) => Some(name.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

impl std::fmt::Debug for ComposedVisitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedVisitor")
            .field("dimension", &self.handler_names(NodeKind::Dimension))
            .field("env", &self.handler_names(NodeKind::Env))
            .field("function", &self.handler_names(NodeKind::Function))
            .field("declaration", &self.declaration_handler_names())
            .finish()
    }
}
