//! da-expr: the expression language used for custom constants, `let`
//! chains and device transfer functions.
//!
//! Provides:
//! - Tokenizer ([`tokenize`]) and Pratt parser ([`parse`])
//! - Evaluator and partial evaluator ([`eval`], [`partial_eval`])
//! - Compilation against known constants ([`compile`])
//! - `let` chain resolution for custom variable blocks ([`resolve_let_chain`])
//!
//! # Example
//!
//! ```
//! use da_expr::{compile, eval_str, Bindings};
//!
//! assert_eq!(eval_str("a = 1; b = a + 2; b * 3", &Bindings::new()).unwrap(), 9.0);
//!
//! let mut known = Bindings::new();
//! known.insert("k".to_string(), 2.0);
//! let f = compile("k x ^ 2", &known).unwrap();
//!
//! let mut args = Bindings::new();
//! args.insert("x".to_string(), 3.0);
//! assert_eq!(f.call(&args).unwrap(), 18.0);
//! ```

pub mod ast;
pub mod builtins;
pub mod compile;
pub mod error;
pub mod eval;
pub mod parser;
pub mod token;

pub use ast::{BinaryOp, Expr, Quantifier, UnaryOp};
pub use compile::{compile, resolve_let_chain, Compiled, LetChain};
pub use error::{ExprError, ExprResult};
pub use eval::{eval, eval_str, partial_eval, Bindings, Unknowns, MAX_TERMS};
pub use parser::parse;
pub use token::{tokenize, Token, TokenKind};
