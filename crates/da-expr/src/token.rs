//! Tokenizer for the expression language.
//!
//! Matching is longest-first: two-character comparisons win over their
//! one-character prefixes, `sum`/`product` win over identifiers of the same
//! length, and `summary` is still an identifier.

use logos::Logos;

use crate::error::{ExprError, ExprResult};

/// Lexical category of a token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,

    #[token(">=")]
    GtEq,
    #[token("<=")]
    LtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,

    #[token("=")]
    Assign,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// Unsigned numeric literal; a leading sign is a separate unary operator.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[token("sum")]
    Sum,
    #[token("product")]
    Product,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// A token together with its source text and byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

/// Tokenize `src` into a *reversed* token vector.
///
/// The parser consumes from the back with `pop`, so the first token of the
/// source is the last element.
pub fn tokenize(src: &str) -> ExprResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(src);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                text: lexer.slice().to_string(),
                offset: span.start,
            }),
            Err(()) => {
                return Err(ExprError::InvalidCharacter {
                    text: lexer.slice().to_string(),
                    offset: span.start,
                });
            }
        }
    }

    tokens.reverse();
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut tokens = tokenize(src).unwrap();
        tokens.reverse();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn numeric_literals() {
        for src in ["1", "12", "1.4", "1e4", "1e-4", "1e+4", ".5"] {
            let tokens = tokenize(src).unwrap();
            assert_eq!(tokens.len(), 1, "{src}");
            assert_eq!(tokens[0].kind, TokenKind::Number);
            assert_eq!(tokens[0].text, src);
        }
    }

    #[test]
    fn identifiers_and_keywords() {
        assert_eq!(kinds("s sin x_554 _t"), vec![TokenKind::Ident; 4]);
        assert_eq!(kinds("sum"), vec![TokenKind::Sum]);
        assert_eq!(kinds("product"), vec![TokenKind::Product]);
        assert_eq!(kinds("summary products"), vec![TokenKind::Ident; 2]);
    }

    #[test]
    fn punctuation_prefers_two_characters() {
        use TokenKind::*;
        assert_eq!(
            kinds("5+6*7/x^sin(45)><,=>=<=!=%=="),
            vec![
                Number, Plus, Number, Star, Number, Slash, Ident, Caret, Ident, LParen, Number,
                RParen, Gt, Lt, Comma, Assign, GtEq, LtEq, NotEq, Percent, EqEq,
            ]
        );
    }

    #[test]
    fn output_is_reversed_for_popping() {
        let mut tokens = tokenize("a + 1").unwrap();
        assert_eq!(tokens.pop().unwrap().text, "a");
        assert_eq!(tokens.pop().unwrap().kind, TokenKind::Plus);
        let one = tokens.pop().unwrap();
        assert_eq!(one.text, "1");
        assert_eq!(one.offset, 4);
        assert!(tokens.is_empty());
    }

    #[test]
    fn newlines_are_whitespace() {
        assert_eq!(kinds("a = 1\nb = 2").len(), 6);
    }

    #[test]
    fn invalid_character_is_reported_with_offset() {
        let err = tokenize("1 + $x").unwrap_err();
        assert_eq!(
            err,
            ExprError::InvalidCharacter {
                text: "$".into(),
                offset: 4
            }
        );
    }
}
