//! Lexer module for the material language
//!
//! This module contains the tokenization logic: whitespace and `//` comment
//! skipping, identifiers, float literals and quoted string literals. The
//! grammar works on the resulting `(Token, span)` stream.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize_with_spans, LexError, TokenSpan};
pub use tokens::{decode_float, Token};

/// UTF-8 byte order mark some editors prepend to text files
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Main lexer function: tokens with their source spans, or the first lexical error
pub fn lex_with_spans(source: &str) -> Result<Vec<TokenSpan>, LexError> {
    tokenize_with_spans(source)
}

/// Remove a leading byte order mark, returning the remaining text and whether one was found
pub fn strip_byte_order_mark(source: &str) -> (&str, bool) {
    match source.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => (rest, true),
        None => (source, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_byte_order_mark() {
        assert_eq!(strip_byte_order_mark("\u{feff}pass {}"), ("pass {}", true));
        assert_eq!(strip_byte_order_mark("pass {}"), ("pass {}", false));
    }
}
