//! Token definitions for the material language
//!
//! The tokens are defined using the logos derive macro. Whitespace and `//`
//! comments are skipped between tokens, never inside string literals.
//!
//! Keywords are plain identifiers: the grammar compares identifier text, so a
//! keyword such as `SrcAlphaSaturate` is always lexed as a single token and can
//! never be split into `SrcAlpha` followed by `Saturate`.
use logos::Logos;
use std::fmt;

/// All possible tokens in a material document
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Keywords, option names, technique/pass/uniform names
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),

    // Raw literal text, converted to f32 by the grammar
    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", float_literal)]
    Float(String),

    // Unescaped content of a double-quoted literal
    #[regex(r#""([^"\\\r\n]|\\["\\])*""#, unescape)]
    Str(String),
}

/// Decode a float literal, or `None` when its value is outside the f32 range
///
/// Overflow to infinity and nonzero literals that round to zero are both out of
/// range.
pub fn decode_float(text: &str) -> Option<f32> {
    let value: f32 = text.parse().ok()?;
    let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
    let nonzero = mantissa.bytes().any(|digit| matches!(digit, b'1'..=b'9'));
    if value.is_finite() && (value != 0.0 || !nonzero) {
        Some(value)
    } else {
        None
    }
}

fn float_literal(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let text = lex.slice();
    decode_float(text).map(|_| text.to_owned())
}

/// Strip the quotes of a string literal and resolve `\"` and `\\`.
fn unescape(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            // The regex only admits `\"` and `\\`
            if let Some(escaped) = chars.next() {
                value.push(escaped);
            }
        } else {
            value.push(ch);
        }
    }
    value
}

impl Token {
    /// Check if this token is the identifier `keyword`
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Ident(text) if text == keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Ident(text) | Token::Float(text) => write!(f, "{}", text),
            Token::Str(text) => write!(f, "{:?}", text),
        }
    }
}
