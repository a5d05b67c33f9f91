//! Recursive-descent parser from CSS text to the syntax tree

use super::lexer::{tokenize, Spanned, Token};
use super::{
    AtRule, Block, BlockItem, Comparison, ComponentValue, Declaration, Dimension, EnvReference,
    Function, MediaComponent, MediaFeature, MediaQuery, MediaRule, Numeric, QuotedString, Rule,
    StyleRule, StyleSheet, Unit, VarReference,
};
use crate::error::{ParseError, SourcePosition};

/// Parse a complete style sheet.
///
/// # Example
///
/// ```
/// use stylepass::parse_stylesheet;
///
/// let sheet = parse_stylesheet("a { margin: 16px; }").unwrap();
/// assert_eq!(sheet.rules.len(), 1);
/// ```
pub fn parse_stylesheet(source: &str) -> Result<StyleSheet, ParseError> {
    let mut parser = Parser::new(source);
    let rules = parser.parse_rule_list()?;
    Ok(StyleSheet { rules })
}

/// Parse a standalone declaration value such as `0 1px 2px #0003`.
///
/// Used for design token literals. Surrounding whitespace is dropped.
pub fn parse_value(source: &str) -> Result<Vec<ComponentValue>, ParseError> {
    let mut parser = Parser::new(source);
    let values = parser.parse_component_values(|_| false)?;
    Ok(values)
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|t| t.token)
    }

    fn bump(&mut self) -> Option<Spanned> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn text(&self, tok: &Spanned) -> &'src str {
        &self.source[tok.span.clone()]
    }

    fn at(&self, offset: usize) -> SourcePosition {
        SourcePosition::locate(self.source, offset)
    }

    fn here(&self) -> SourcePosition {
        let offset = self.peek().map(|t| t.span.start).unwrap_or(self.source.len());
        self.at(offset)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_token() == Some(Token::Whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(tok) => ParseError::Unexpected {
                found: self.text(tok).to_string(),
                at: self.at(tok.span.start),
            },
            None => ParseError::Unexpected {
                found: "end of input".to_string(),
                at: self.here(),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Rules
    // ═══════════════════════════════════════════════════════════════════

    fn parse_rule_list(&mut self) -> Result<Vec<Rule>, ParseError> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_token() {
                None => return Ok(rules),
                Some(Token::Semicolon) => {
                    self.pos += 1;
                }
                Some(Token::RBrace) => return Err(self.unexpected()),
                Some(_) => rules.push(self.parse_rule()?),
            }
        }
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        if self.peek_token() == Some(Token::AtKeyword) {
            self.parse_at_rule()
        } else {
            self.parse_style_rule()
        }
    }

    fn parse_style_rule(&mut self) -> Result<Rule, ParseError> {
        let mut selector = String::new();
        let mut depth = 0usize;
        loop {
            let tok = match self.peek() {
                Some(tok) => tok.clone(),
                None => {
                    return Err(ParseError::ExpectedBlock {
                        what: "selector".to_string(),
                        at: self.here(),
                    })
                }
            };
            match tok.token {
                Token::LBrace if depth == 0 => break,
                Token::Semicolon | Token::RBrace if depth == 0 => {
                    return Err(ParseError::ExpectedBlock {
                        what: "selector".to_string(),
                        at: self.at(tok.span.start),
                    })
                }
                Token::LParen | Token::Function => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            if tok.token == Token::Whitespace {
                if !selector.ends_with(' ') {
                    selector.push(' ');
                }
            } else {
                selector.push_str(self.text(&tok));
            }
            self.pos += 1;
        }

        let block = self.parse_block()?;
        Ok(Rule::Style(StyleRule {
            selector: selector.trim().to_string(),
            block,
        }))
    }

    fn parse_at_rule(&mut self) -> Result<Rule, ParseError> {
        let keyword = match self.bump() {
            Some(tok) => tok,
            None => return Err(self.unexpected()),
        };
        let name = self.text(&keyword)[1..].to_string();
        let prelude = self.parse_component_values(|t| {
            matches!(t, Token::LBrace | Token::Semicolon | Token::RBrace)
        })?;

        if name.eq_ignore_ascii_case("media") {
            if self.peek_token() != Some(Token::LBrace) {
                return Err(ParseError::ExpectedBlock {
                    what: "@media prelude".to_string(),
                    at: self.here(),
                });
            }
            let block = self.parse_block()?;
            return Ok(Rule::Media(MediaRule {
                queries: media_queries(prelude),
                block,
            }));
        }

        let block = match self.peek_token() {
            Some(Token::LBrace) => Some(self.parse_block()?),
            Some(Token::Semicolon) => {
                self.pos += 1;
                None
            }
            _ => None,
        };
        Ok(Rule::At(AtRule {
            name,
            prelude,
            block,
        }))
    }

    /// Parse `{ ... }`; the cursor must be on the `{`.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        let open = match self.bump() {
            Some(tok) if tok.token == Token::LBrace => tok,
            _ => return Err(self.unexpected()),
        };

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek_token() {
                None => {
                    return Err(ParseError::UnterminatedBlock {
                        at: self.at(open.span.start),
                    })
                }
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(Block { items });
                }
                Some(Token::Semicolon) => {
                    self.pos += 1;
                }
                Some(Token::AtKeyword) => items.push(BlockItem::Rule(self.parse_at_rule()?)),
                Some(_) if self.item_is_rule() => {
                    items.push(BlockItem::Rule(self.parse_style_rule()?))
                }
                Some(_) => items.push(BlockItem::Declaration(self.parse_declaration()?)),
            }
        }
    }

    /// Whether the block item at the cursor reaches `{` before `;` or `}`.
    fn item_is_rule(&self) -> bool {
        let mut depth = 0usize;
        for tok in &self.tokens[self.pos..] {
            match tok.token {
                Token::LBrace if depth == 0 => return true,
                Token::Semicolon | Token::RBrace if depth == 0 => return false,
                Token::LParen | Token::Function => depth += 1,
                Token::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        false
    }

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let name = match self.peek() {
            Some(tok) if tok.token == Token::Ident => tok.clone(),
            Some(tok) => {
                return Err(ParseError::ExpectedProperty {
                    found: self.text(tok).to_string(),
                    at: self.at(tok.span.start),
                })
            }
            None => return Err(self.unexpected()),
        };
        self.pos += 1;
        let property = self.text(&name).to_string();

        self.skip_whitespace();
        if self.peek_token() != Some(Token::Colon) {
            return Err(ParseError::ExpectedColon {
                property,
                at: self.here(),
            });
        }
        self.pos += 1;

        let mut value =
            self.parse_component_values(|t| matches!(t, Token::Semicolon | Token::RBrace))?;
        let important = strip_important(&mut value);
        if self.peek_token() == Some(Token::Semicolon) {
            self.pos += 1;
        }

        Ok(Declaration {
            property,
            value,
            important,
        })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Component Values
    // ═══════════════════════════════════════════════════════════════════

    /// Parse values until `stop` accepts the next token (left unconsumed)
    /// or input ends. Whitespace is collapsed and trimmed.
    fn parse_component_values(
        &mut self,
        stop: impl Fn(Token) -> bool,
    ) -> Result<Vec<ComponentValue>, ParseError> {
        let mut values = Vec::new();
        while let Some(tok) = self.peek().cloned() {
            if stop(tok.token) {
                break;
            }
            let text = self.text(&tok);
            let value = match tok.token {
                Token::Whitespace => {
                    self.pos += 1;
                    if !values.is_empty() && values.last() != Some(&ComponentValue::Whitespace) {
                        values.push(ComponentValue::Whitespace);
                    }
                    continue;
                }
                Token::Function => {
                    values.push(self.parse_function()?);
                    continue;
                }
                Token::LParen => {
                    values.push(self.parse_parenthesized()?);
                    continue;
                }
                Token::LBrace | Token::RBrace | Token::RParen | Token::Semicolon => {
                    return Err(self.unexpected())
                }
                Token::Number => ComponentValue::Number(parse_numeric(text)),
                Token::Percentage => {
                    ComponentValue::Percentage(parse_numeric(&text[..text.len() - 1]))
                }
                Token::Dimension => ComponentValue::Dimension(parse_dimension(text)),
                Token::Ident => ComponentValue::Ident(text.to_string()),
                Token::Hash => ComponentValue::Hash(text[1..].to_string()),
                Token::String => ComponentValue::String(QuotedString {
                    value: text[1..text.len() - 1].to_string(),
                    quote: text.chars().next().unwrap_or('"'),
                }),
                Token::Comma => ComponentValue::Comma,
                Token::Colon => ComponentValue::Delim(':'),
                Token::AtKeyword => ComponentValue::Verbatim(text.to_string()),
                Token::Delim => ComponentValue::Delim(text.chars().next().unwrap_or(' ')),
            };
            self.pos += 1;
            values.push(value);
        }
        trim_whitespace(&mut values);
        Ok(values)
    }

    fn parse_function(&mut self) -> Result<ComponentValue, ParseError> {
        let open = match self.bump() {
            Some(tok) => tok,
            None => return Err(self.unexpected()),
        };
        let text = self.text(&open);
        let name = text[..text.len() - 1].to_string();

        if name.eq_ignore_ascii_case("url") {
            if let Some(url) = self.parse_unquoted_url(&open)? {
                return Ok(ComponentValue::Url(url));
            }
        }

        let arguments = self.parse_component_values(|t| {
            matches!(
                t,
                Token::RParen | Token::Semicolon | Token::RBrace | Token::LBrace
            )
        })?;
        self.expect_close(&open)?;

        let value = if name.eq_ignore_ascii_case("env") {
            env_reference(&arguments).map(ComponentValue::Env)
        } else if name.eq_ignore_ascii_case("var") {
            var_reference(&arguments).map(ComponentValue::Var)
        } else {
            None
        };
        Ok(value.unwrap_or(ComponentValue::Function(Function { name, arguments })))
    }

    /// `url(` followed by anything but a string: take the raw text up to `)`.
    fn parse_unquoted_url(&mut self, open: &Spanned) -> Result<Option<String>, ParseError> {
        let next = self.tokens[self.pos..]
            .iter()
            .find(|t| t.token != Token::Whitespace)
            .map(|t| t.token);
        if next == Some(Token::String) {
            return Ok(None);
        }

        let rest = &self.source[open.span.end..];
        let close = match rest.find(')') {
            Some(i) => open.span.end + i,
            None => {
                return Err(ParseError::Unclosed {
                    opener: "url(".to_string(),
                    at: self.at(open.span.start),
                })
            }
        };
        while self.peek().is_some_and(|t| t.span.start < close) {
            self.pos += 1;
        }
        self.expect_close(open)?;
        Ok(Some(self.source[open.span.end..close].trim().to_string()))
    }

    fn parse_parenthesized(&mut self) -> Result<ComponentValue, ParseError> {
        let open = match self.bump() {
            Some(tok) => tok,
            None => return Err(self.unexpected()),
        };
        let inner = self.parse_component_values(|t| {
            matches!(
                t,
                Token::RParen | Token::Semicolon | Token::RBrace | Token::LBrace
            )
        })?;
        self.expect_close(&open)?;
        Ok(ComponentValue::Parenthesized(inner))
    }

    fn expect_close(&mut self, open: &Spanned) -> Result<(), ParseError> {
        if self.peek_token() == Some(Token::RParen) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError::Unclosed {
                opener: self.text(open).to_string(),
                at: self.at(open.span.start),
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════

fn parse_number(text: &str) -> f64 {
    // The lexer only produces digit/sign/dot sequences here
    text.parse().unwrap_or_default()
}

fn parse_numeric(text: &str) -> Numeric {
    Numeric {
        value: parse_number(text),
        raw: Some(text.to_string()),
    }
}

fn parse_dimension(text: &str) -> Dimension {
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    Dimension {
        raw: Some(text.to_string()),
        ..Dimension::new(parse_number(&text[..split]), Unit::parse(&text[split..]))
    }
}

fn trim_whitespace(values: &mut Vec<ComponentValue>) {
    while values.last() == Some(&ComponentValue::Whitespace) {
        values.pop();
    }
    let leading = values
        .iter()
        .take_while(|v| **v == ComponentValue::Whitespace)
        .count();
    values.drain(..leading);
}

/// Remove a trailing `!important`, reporting whether it was present.
fn strip_important(values: &mut Vec<ComponentValue>) -> bool {
    let is_important = matches!(values.last(), Some(ComponentValue::Ident(word)) if word.eq_ignore_ascii_case("important"));
    if !is_important {
        return false;
    }
    let bang = values[..values.len() - 1]
        .iter()
        .rposition(|v| *v != ComponentValue::Whitespace);
    match bang {
        Some(i) if values[i] == ComponentValue::Delim('!') => {
            values.truncate(i);
            trim_whitespace(values);
            true
        }
        _ => false,
    }
}

/// Split arguments at the first top-level comma into `(head, fallback)`.
fn split_fallback(
    arguments: &[ComponentValue],
) -> (Vec<ComponentValue>, Option<Vec<ComponentValue>>) {
    match arguments.iter().position(|v| *v == ComponentValue::Comma) {
        Some(i) => {
            let mut head = arguments[..i].to_vec();
            let mut fallback = arguments[i + 1..].to_vec();
            trim_whitespace(&mut head);
            trim_whitespace(&mut fallback);
            (head, Some(fallback))
        }
        None => (arguments.to_vec(), None),
    }
}

fn env_reference(arguments: &[ComponentValue]) -> Option<EnvReference> {
    let (head, fallback) = split_fallback(arguments);
    match head.as_slice() {
        [ComponentValue::Ident(name)] => Some(EnvReference {
            name: name.clone(),
            fallback,
        }),
        _ => None,
    }
}

fn var_reference(arguments: &[ComponentValue]) -> Option<VarReference> {
    let (head, fallback) = split_fallback(arguments);
    match head.as_slice() {
        [ComponentValue::Ident(name)] if name.starts_with("--") => Some(VarReference {
            name: name.clone(),
            fallback,
        }),
        _ => None,
    }
}

/// Split a media prelude into queries and recognize feature tests.
fn media_queries(prelude: Vec<ComponentValue>) -> Vec<MediaQuery> {
    prelude
        .split(|v| *v == ComponentValue::Comma)
        .map(|segment| MediaQuery {
            components: media_components(segment),
        })
        .collect()
}

fn media_components(values: &[ComponentValue]) -> Vec<MediaComponent> {
    values
        .iter()
        .filter(|v| **v != ComponentValue::Whitespace)
        .map(media_component)
        .collect()
}

/// A parenthesized feature test, a nested condition, or anything else.
fn media_component(value: &ComponentValue) -> MediaComponent {
    let inner = match value {
        ComponentValue::Parenthesized(inner) => inner,
        other => return MediaComponent::Other(other.clone()),
    };
    if let Some(feature) = media_feature(inner) {
        return MediaComponent::Feature(feature);
    }
    if inner
        .iter()
        .any(|v| matches!(v, ComponentValue::Parenthesized(_)))
    {
        return MediaComponent::Group(media_components(inner));
    }
    MediaComponent::Other(value.clone())
}

/// Recognize `name`, `name: value` and `name <op> value`.
fn media_feature(inner: &[ComponentValue]) -> Option<MediaFeature> {
    let skip_ws = |mut i: usize| {
        while inner.get(i) == Some(&ComponentValue::Whitespace) {
            i += 1;
        }
        i
    };

    let name = match inner.first() {
        Some(ComponentValue::Ident(name)) => name.clone(),
        _ => return None,
    };
    let op = skip_ws(1);
    if op == inner.len() {
        return Some(MediaFeature {
            name,
            comparison: None,
            value: Vec::new(),
        });
    }

    let followed_by_eq = inner.get(op + 1) == Some(&ComponentValue::Delim('='));
    let (comparison, rest) = match inner[op] {
        ComponentValue::Delim(':') => (Comparison::Colon, op + 1),
        ComponentValue::Delim('<') if followed_by_eq => (Comparison::Le, op + 2),
        ComponentValue::Delim('<') => (Comparison::Lt, op + 1),
        ComponentValue::Delim('>') if followed_by_eq => (Comparison::Ge, op + 2),
        ComponentValue::Delim('>') => (Comparison::Gt, op + 1),
        ComponentValue::Delim('=') => (Comparison::Eq, op + 1),
        _ => return None,
    };

    let mut value = inner[rest..].to_vec();
    trim_whitespace(&mut value);
    if value.is_empty() {
        return None;
    }
    Some(MediaFeature {
        name,
        comparison: Some(comparison),
        value,
    })
}
