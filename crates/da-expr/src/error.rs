//! Expression engine error types.

use thiserror::Error;

use crate::ast::Quantifier;

pub type ExprResult<T> = Result<T, ExprError>;

/// Tokenizer, parser and evaluator errors.
///
/// All of these are recoverable: they describe a bad expression string, never
/// a broken engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Invalid character '{text}' at offset {offset}")]
    InvalidCharacter { text: String, offset: usize },

    #[error("Invalid number literal '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("Empty expression encountered")]
    EmptyExpression,

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("Unclosed left bracket at offset {offset}")]
    UnclosedBracket { offset: usize },

    #[error("Tried to call builtin function '{name}', but it does not exist")]
    UnknownFunction { name: String },

    #[error("Tried to call builtin function '{name}' with {found} parameters, but it takes {expected}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Referenced undefined variables: {}", quote_names(.names))]
    UndefinedVariables { names: Vec<String> },

    #[error("Binding '{name}' references undefined variables: {}", quote_names(.missing))]
    UnresolvedBinding { name: String, missing: Vec<String> },

    #[error("Non integer value in range of {kind}")]
    NonIntegerRange { kind: Quantifier },

    #[error("Range of {kind} has more than {limit} terms")]
    RangeTooLarge { kind: Quantifier, limit: u64 },
}

fn quote_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_variables_lists_every_name() {
        let err = ExprError::UndefinedVariables {
            names: vec!["x".into(), "y".into()],
        };
        assert_eq!(err.to_string(), "Referenced undefined variables: 'x', 'y'");
    }

    #[test]
    fn range_error_names_quantifier() {
        let err = ExprError::NonIntegerRange {
            kind: Quantifier::Product,
        };
        assert!(err.to_string().ends_with("product"));
    }
}
