//! Implementation of the material lexer
//!
//! This module provides convenience functions for tokenizing material text.
//! The actual tokenization is handled entirely by logos; this layer only
//! attaches spans and turns the first unrecognised input into a [`LexError`].

use crate::lexer::tokens::Token;
use logos::Logos;
use std::ops::Range;
use thiserror::Error;

/// Token paired with its byte range in the source
pub type TokenSpan = (Token, Range<usize>);

/// Input the lexer could not turn into a token
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Range<usize> },
    #[error("invalid escape sequence `\\{found}` in string literal")]
    InvalidEscape { found: char, span: Range<usize> },
    #[error("number `{text}` out of range for a 32-bit float")]
    NumberOutOfRange { text: String, span: Range<usize> },
    #[error("unexpected character `{found}`")]
    UnexpectedCharacter { found: char, span: Range<usize> },
}

impl LexError {
    /// Byte range of the offending input
    pub fn span(&self) -> Range<usize> {
        match self {
            LexError::UnterminatedString { span }
            | LexError::InvalidEscape { span, .. }
            | LexError::NumberOutOfRange { span, .. }
            | LexError::UnexpectedCharacter { span, .. } => span.clone(),
        }
    }
}

/// Tokenize a string and collect tokens with their spans
///
/// Stops at the first lexical error: a material document is rejected as a
/// whole, so there is nothing to gain from lexing past it.
pub fn tokenize_with_spans(source: &str) -> Result<Vec<TokenSpan>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(classify_error(source, span)),
        }
    }

    Ok(tokens)
}

fn classify_error(source: &str, span: Range<usize>) -> LexError {
    let rest = &source[span.start..];
    if rest.starts_with('"') {
        return classify_string_error(source, span.start);
    }
    // A well-formed literal rejected by the range check
    let slice = &source[span.clone()];
    if slice.parse::<f32>().is_ok() {
        return LexError::NumberOutOfRange {
            text: slice.to_string(),
            span,
        };
    }
    let found = rest.chars().next().unwrap_or('\0');
    LexError::UnexpectedCharacter {
        found,
        span: span.start..span.start + found.len_utf8(),
    }
}

/// A literal starting at `start` failed to lex: either it is closed on its
/// line but holds an escape other than `\"` and `\\`, or it is not closed
fn classify_string_error(source: &str, start: usize) -> LexError {
    let mut invalid_escape = None;
    let mut chars = source[start + 1..].char_indices();
    while let Some((offset, ch)) = chars.next() {
        let at = start + 1 + offset;
        match ch {
            '"' => break,
            '\r' | '\n' => {
                return LexError::UnterminatedString { span: start..at };
            }
            '\\' => match chars.next() {
                Some((_, '"' | '\\')) => {}
                Some((_, '\r' | '\n')) | None => {
                    return LexError::UnterminatedString { span: start..at + 1 };
                }
                Some((_, escaped)) => {
                    invalid_escape
                        .get_or_insert((escaped, at..at + 1 + escaped.len_utf8()));
                }
            },
            _ => {}
        }
    }
    match invalid_escape {
        Some((found, span)) => LexError::InvalidEscape { found, span },
        None => LexError::UnterminatedString {
            span: start..source.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize_with_spans(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_simple_tokenization() {
        assert_eq!(
            kinds("pass { }"),
            vec![Token::Ident("pass".into()), Token::LBrace, Token::RBrace]
        );
    }

    #[test]
    fn test_tokenize_with_spans() {
        let tokens = tokenize_with_spans("CullFace: Back").unwrap();
        assert_eq!(
            tokens,
            vec![
                (Token::Ident("CullFace".into()), 0..8),
                (Token::Colon, 8..9),
                (Token::Ident("Back".into()), 10..14),
            ]
        );
    }

    #[test]
    fn test_vector_tokenization() {
        assert_eq!(
            kinds("(1.0, 0.5)"),
            vec![
                Token::LParen,
                Token::Float("1.0".into()),
                Token::Comma,
                Token::Float("0.5".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize_with_spans("Shader \"a.glsl\nDepthTest On").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: 7..14 });
    }

    #[test]
    fn test_unterminated_string_at_end_of_input() {
        let err = tokenize_with_spans("Shader \"a.glsl").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: 7..14 });

        // An escaped quote does not close the literal
        let err = tokenize_with_spans("Shader \"a\\\"").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: 7..11 });
    }

    #[test]
    fn test_invalid_escape() {
        let err = tokenize_with_spans("Shader \"a\\qb\"").unwrap_err();
        assert_eq!(err, LexError::InvalidEscape { found: 'q', span: 9..11 });
        assert_eq!(err.to_string(), "invalid escape sequence `\\q` in string literal");

        // Invalid escape on a line the literal never closes on
        let err = tokenize_with_spans("Shader \"a\\qb\nDepthTest On").unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { span: 7..12 });
    }

    #[test]
    fn test_number_out_of_range() {
        let err = tokenize_with_spans("SetUniform x 1e50").unwrap_err();
        assert_eq!(
            err,
            LexError::NumberOutOfRange {
                text: "1e50".into(),
                span: 13..17
            }
        );
        assert_eq!(
            err.to_string(),
            "number `1e50` out of range for a 32-bit float"
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize_with_spans("CullFace # Back").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                found: '#',
                span: 9..10
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![]);
        assert_eq!(tokenize_with_spans("  // only a comment").unwrap(), vec![]);
    }
}
