//! Style sheet tokenizer

use logos::Logos;
use std::ops::Range;

/// CSS tokens. Payloads are recovered from the source by span.
///
/// Comments, including the empty `/**/`, are skipped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Token {
    // Trivia
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    // Numerics
    #[regex(r"[+-]?([0-9]+|[0-9]*\.[0-9]+)")]
    Number,

    #[regex(r"[+-]?([0-9]+|[0-9]*\.[0-9]+)%")]
    Percentage,

    #[regex(r"[+-]?([0-9]+|[0-9]*\.[0-9]+)[a-zA-Z]+")]
    Dimension,

    // Names
    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    #[regex(r"--[a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*\(")]
    Function,

    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_-]*")]
    AtKeyword,

    #[regex(r"#[a-zA-Z0-9_-]+")]
    Hash,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,

    /// Any single character no other token accepts
    Delim,
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token
    pub token: Token,
    /// Byte range in the source
    pub span: Range<usize>,
}

/// Tokenize CSS source. Comments are dropped; characters the lexer does
/// not recognize become one [`Token::Delim`] each, so this never fails.
pub fn tokenize(source: &str) -> Vec<Spanned> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                for (i, ch) in source[span.clone()].char_indices() {
                    let start = span.start + i;
                    tokens.push(Spanned {
                        token: Token::Delim,
                        span: start..start + ch.len_utf8(),
                    });
                }
            }
        }
    }

    tokens
}
