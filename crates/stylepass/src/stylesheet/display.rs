//! Serialization of the syntax tree back to CSS text

use std::fmt::{self, Write};

use super::*;

/// Format a number the way CSS expects: shortest round-trip form, no
/// exponent, and no negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentValue::Number(n) => write!(f, "{}", n),
            ComponentValue::Percentage(n) => write!(f, "{}%", n),
            ComponentValue::Dimension(d) => write!(f, "{}", d),
            ComponentValue::Ident(name) => f.write_str(name),
            ComponentValue::Hash(hash) => write!(f, "#{}", hash),
            ComponentValue::String(s) => write!(f, "{q}{}{q}", s.value, q = s.quote),
            ComponentValue::Url(url) => write!(f, "url({})", url),
            ComponentValue::Function(func) => {
                write!(f, "{}(", func.name)?;
                write_values(f, &func.arguments)?;
                f.write_char(')')
            }
            ComponentValue::Env(env) => {
                write!(f, "env({}", env.name)?;
                write_fallback(f, env.fallback.as_deref())?;
                f.write_char(')')
            }
            ComponentValue::Var(var) => {
                write!(f, "var({}", var.name)?;
                write_fallback(f, var.fallback.as_deref())?;
                f.write_char(')')
            }
            ComponentValue::Parenthesized(inner) => {
                f.write_char('(')?;
                write_values(f, inner)?;
                f.write_char(')')
            }
            ComponentValue::Comma => f.write_char(','),
            ComponentValue::Delim(c) => f.write_char(*c),
            ComponentValue::Whitespace => f.write_char(' '),
            ComponentValue::Verbatim(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => f.write_str(&format_number(self.value)),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write!(f, "{}{}", format_number(self.value), self.unit.as_str()),
        }
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[ComponentValue]) -> fmt::Result {
    for value in values {
        write!(f, "{}", value)?;
    }
    Ok(())
}

fn write_fallback(f: &mut fmt::Formatter<'_>, fallback: Option<&[ComponentValue]>) -> fmt::Result {
    if let Some(values) = fallback {
        f.write_str(", ")?;
        write_values(f, values)?;
    }
    Ok(())
}

fn values_to_string(values: &[ComponentValue]) -> String {
    values.iter().map(ToString::to_string).collect()
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.comparison {
            None => write!(f, "({})", self.name),
            Some(Comparison::Colon) => {
                write!(f, "({}: {})", self.name, values_to_string(&self.value))
            }
            Some(op) => write!(
                f,
                "({} {} {})",
                self.name,
                op.as_str(),
                values_to_string(&self.value)
            ),
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_media_components(f, &self.components)
    }
}

fn write_media_components(f: &mut fmt::Formatter<'_>, components: &[MediaComponent]) -> fmt::Result {
    for (i, component) in components.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        match component {
            MediaComponent::Feature(feature) => write!(f, "{}", feature)?,
            MediaComponent::Group(inner) => {
                f.write_char('(')?;
                write_media_components(f, inner)?;
                f.write_char(')')?;
            }
            MediaComponent::Other(value) => write!(f, "{}", value)?,
        }
    }
    Ok(())
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Printer::pretty().print(self))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Printer
// ═══════════════════════════════════════════════════════════════════════

/// Serializes a [`StyleSheet`], either indented or minified.
///
/// # Example
///
/// ```
/// use stylepass::{parse_stylesheet, Printer};
///
/// let sheet = parse_stylesheet("a { margin: 1rem 0; color: red }").unwrap();
/// assert_eq!(Printer::minified().print(&sheet), "a{margin:1rem 0;color:red}");
/// assert_eq!(
///     Printer::pretty().print(&sheet),
///     "a {\n  margin: 1rem 0;\n  color: red;\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    minify: bool,
}

impl Printer {
    /// Two-space indented output, one declaration per line.
    pub fn pretty() -> Self {
        Self { minify: false }
    }

    /// Output without optional whitespace.
    pub fn minified() -> Self {
        Self { minify: true }
    }

    /// Serialize a whole sheet.
    pub fn print(&self, sheet: &StyleSheet) -> String {
        let mut out = String::new();
        for (i, rule) in sheet.rules.iter().enumerate() {
            if i > 0 && !self.minify {
                out.push('\n');
            }
            self.print_rule(&mut out, rule, 0);
        }
        out
    }

    fn print_rule(&self, out: &mut String, rule: &Rule, depth: usize) {
        self.indent(out, depth);
        match rule {
            Rule::Style(style) => {
                out.push_str(&style.selector);
                self.print_block(out, &style.block, depth);
            }
            Rule::Media(media) => {
                out.push_str("@media");
                let queries: Vec<String> = media
                    .queries
                    .iter()
                    .map(|q| self.media_query(q))
                    .collect();
                if !queries.is_empty() {
                    out.push(' ');
                    out.push_str(&queries.join(if self.minify { "," } else { ", " }));
                }
                self.print_block(out, &media.block, depth);
            }
            Rule::At(at) => {
                out.push('@');
                out.push_str(&at.name);
                if !at.prelude.is_empty() {
                    out.push(' ');
                    out.push_str(&values_to_string(&at.prelude));
                }
                match &at.block {
                    Some(block) => self.print_block(out, block, depth),
                    None => {
                        out.push(';');
                        if !self.minify {
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }

    fn media_query(&self, query: &MediaQuery) -> String {
        let text = query.to_string();
        if self.minify {
            text.replace(": ", ":")
        } else {
            text
        }
    }

    fn print_block(&self, out: &mut String, block: &Block, depth: usize) {
        if self.minify {
            out.push('{');
            let count = block.items.len();
            for (i, item) in block.items.iter().enumerate() {
                match item {
                    BlockItem::Declaration(decl) => {
                        self.print_declaration(out, decl);
                        if i + 1 < count {
                            out.push(';');
                        }
                    }
                    BlockItem::Rule(rule) => self.print_rule(out, rule, 0),
                }
            }
            out.push('}');
            return;
        }

        if block.items.is_empty() {
            out.push_str(" {}\n");
            return;
        }
        out.push_str(" {\n");
        for item in &block.items {
            match item {
                BlockItem::Declaration(decl) => {
                    self.indent(out, depth + 1);
                    self.print_declaration(out, decl);
                    out.push_str(";\n");
                }
                BlockItem::Rule(rule) => self.print_rule(out, rule, depth + 1),
            }
        }
        self.indent(out, depth);
        out.push_str("}\n");
    }

    fn print_declaration(&self, out: &mut String, decl: &Declaration) {
        out.push_str(&decl.property);
        out.push_str(if self.minify { ":" } else { ": " });
        out.push_str(&values_to_string(&decl.value));
        if decl.important {
            out.push_str(if self.minify { "!important" } else { " !important" });
        }
    }

    fn indent(&self, out: &mut String, depth: usize) {
        if !self.minify {
            for _ in 0..depth {
                out.push_str("  ");
            }
        }
    }
}
