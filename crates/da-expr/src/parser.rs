//! Pratt parser over the reversed token vector produced by [`tokenize`].
//!
//! Binding powers (left, right):
//! - comparisons `< > <= >= == !=`: (0, 1)
//! - `+ -`: (2, 3)
//! - `* / %` and juxtaposition: (4, 5)
//! - `^`: (7, 6), right associative
//! - prefix `+ -`: 5
//!
//! Statements are `name = value` followed by `;` or a newline and a
//! continuation. A chain that ends after a binding continues with `0`.

use da_core::Real;

use crate::ast::{BinaryOp, Expr, Quantifier, UnaryOp};
use crate::error::{ExprError, ExprResult};
use crate::token::{tokenize, Token, TokenKind};

const PREFIX_BINDING_POWER: u8 = 5;
const IMPLICIT_MUL: (u8, u8) = (4, 5);

fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8, BinaryOp)> {
    let info = match kind {
        TokenKind::Lt => (0, 1, BinaryOp::Lt),
        TokenKind::Gt => (0, 1, BinaryOp::Gt),
        TokenKind::LtEq => (0, 1, BinaryOp::LtEq),
        TokenKind::GtEq => (0, 1, BinaryOp::GtEq),
        TokenKind::EqEq => (0, 1, BinaryOp::Eq),
        TokenKind::NotEq => (0, 1, BinaryOp::NotEq),
        TokenKind::Plus => (2, 3, BinaryOp::Add),
        TokenKind::Minus => (2, 3, BinaryOp::Sub),
        TokenKind::Star => (4, 5, BinaryOp::Mul),
        TokenKind::Slash => (4, 5, BinaryOp::Div),
        TokenKind::Percent => (4, 5, BinaryOp::Rem),
        TokenKind::Caret => (7, 6, BinaryOp::Pow),
        _ => return None,
    };
    Some(info)
}

/// Parse a complete expression or `let` chain.
pub fn parse(src: &str) -> ExprResult<Expr> {
    let mut parser = Parser::new(tokenize(src)?);
    if parser.tokens.is_empty() {
        return Err(ExprError::EmptyExpression);
    }
    let expr = parser.parse_statement()?;
    match parser.tokens.pop() {
        None => Ok(expr),
        Some(tok) => Err(unexpected(tok)),
    }
}

fn unexpected(tok: Token) -> ExprError {
    ExprError::UnexpectedToken {
        token: tok.text,
        offset: tok.offset,
    }
}

struct Parser {
    /// Reversed: the next token is at the back.
    tokens: Vec<Token>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.last().map(|t| t.kind)
    }

    fn peek_second(&self) -> Option<TokenKind> {
        let len = self.tokens.len();
        if len < 2 {
            return None;
        }
        Some(self.tokens[len - 2].kind)
    }

    fn next(&mut self) -> ExprResult<Token> {
        self.tokens.pop().ok_or(ExprError::UnexpectedEnd)
    }

    fn expect(&mut self, kind: TokenKind) -> ExprResult<Token> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(unexpected(tok))
        }
    }

    /// `ident =` ahead: the start of a binding.
    fn at_binding(&self) -> bool {
        self.peek() == Some(TokenKind::Ident) && self.peek_second() == Some(TokenKind::Assign)
    }

    fn parse_statement(&mut self) -> ExprResult<Expr> {
        if !self.at_binding() {
            return self.parse_expr(0);
        }

        let name = self.next()?.text;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr(0)?;

        if self.peek() == Some(TokenKind::Semicolon) {
            self.next()?;
        }
        let cons = match self.peek() {
            None => Expr::Lit(0.0),
            Some(TokenKind::RParen) | Some(TokenKind::Comma) | Some(TokenKind::Semicolon) => {
                return Err(unexpected(self.next()?));
            }
            Some(_) => self.parse_statement()?,
        };

        Ok(Expr::let_in(name, value, cons))
    }

    fn parse_expr(&mut self, min_bp: u8) -> ExprResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(kind) = self.peek() else { break };

            if let Some((l_bp, r_bp, op)) = infix_binding_power(kind) {
                if l_bp < min_bp {
                    break;
                }
                self.next()?;
                let rhs = self.parse_expr(r_bp)?;
                lhs = Expr::binary(op, lhs, rhs);
                continue;
            }

            match kind {
                TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Assign => break,
                // a new binding on the next line, not `lhs * ident`
                TokenKind::Ident if self.at_binding() => break,
                TokenKind::Ident
                | TokenKind::Number
                | TokenKind::LParen
                | TokenKind::Sum
                | TokenKind::Product => {
                    let (l_bp, r_bp) = IMPLICIT_MUL;
                    if l_bp < min_bp {
                        break;
                    }
                    let rhs = self.parse_expr(r_bp)?;
                    lhs = Expr::binary(BinaryOp::Mul, lhs, rhs);
                }
                _ => return Err(unexpected(self.next()?)),
            }
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ExprResult<Expr> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Number => {
                let value: Real = tok.text.parse().map_err(|_| ExprError::InvalidNumber {
                    text: tok.text.clone(),
                    offset: tok.offset,
                })?;
                Ok(Expr::Lit(value))
            }
            TokenKind::Ident => {
                if self.peek() == Some(TokenKind::LParen) {
                    let open = self.next()?;
                    let args = self.parse_args(open.offset)?;
                    Ok(Expr::Call {
                        name: tok.text,
                        args,
                    })
                } else {
                    Ok(Expr::Var(tok.text))
                }
            }
            TokenKind::LParen => {
                let inner = self.parse_expr(0)?;
                self.close_bracket(tok.offset)?;
                Ok(inner)
            }
            TokenKind::Plus | TokenKind::Minus => {
                let op = if tok.kind == TokenKind::Plus {
                    UnaryOp::Plus
                } else {
                    UnaryOp::Neg
                };
                let operand = self.parse_expr(PREFIX_BINDING_POWER)?;
                Ok(Expr::unary(op, operand))
            }
            TokenKind::Sum => self.parse_quantified(Quantifier::Sum),
            TokenKind::Product => self.parse_quantified(Quantifier::Product),
            _ => Err(unexpected(tok)),
        }
    }

    /// Arguments after an already consumed `(`.
    fn parse_args(&mut self, open_offset: usize) -> ExprResult<Vec<Expr>> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_expr(0)?);
            let tok = self
                .tokens
                .pop()
                .ok_or(ExprError::UnclosedBracket {
                    offset: open_offset,
                })?;
            match tok.kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => break,
                _ => return Err(unexpected(tok)),
            }
        }
        Ok(args)
    }

    fn close_bracket(&mut self, open_offset: usize) -> ExprResult<()> {
        match self.tokens.pop() {
            Some(tok) if tok.kind == TokenKind::RParen => Ok(()),
            Some(tok) => Err(unexpected(tok)),
            None => Err(ExprError::UnclosedBracket {
                offset: open_offset,
            }),
        }
    }

    /// `sum(i = start, end, body)` after the keyword.
    fn parse_quantified(&mut self, kind: Quantifier) -> ExprResult<Expr> {
        let open = self.expect(TokenKind::LParen)?;
        let index = self.expect(TokenKind::Ident)?.text;
        self.expect(TokenKind::Assign)?;
        let start = self.parse_expr(0)?;
        self.expect(TokenKind::Comma)?;
        let end = self.parse_expr(0)?;
        self.expect(TokenKind::Comma)?;
        let body = self.parse_expr(0)?;
        self.close_bracket(open.offset)?;

        Ok(Expr::Quantified {
            kind,
            index,
            start: Box::new(start),
            end: Box::new(end),
            body: Box::new(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: Real) -> Expr {
        Expr::Lit(v)
    }

    fn bin(l: Expr, op: BinaryOp, r: Expr) -> Expr {
        Expr::binary(op, l, r)
    }

    #[test]
    fn precedence_shapes() {
        use BinaryOp::*;
        let cases = [
            ("5 + 6", bin(lit(5.0), Add, lit(6.0))),
            ("5 + 6 * 7", bin(lit(5.0), Add, bin(lit(6.0), Mul, lit(7.0)))),
            ("5 * 6 + 7", bin(bin(lit(5.0), Mul, lit(6.0)), Add, lit(7.0))),
            ("5 - 6 * 7", bin(lit(5.0), Sub, bin(lit(6.0), Mul, lit(7.0)))),
            ("5 / 6 + 7", bin(bin(lit(5.0), Div, lit(6.0)), Add, lit(7.0))),
            (
                "5 + 6 ^ 7 + 8",
                bin(bin(lit(5.0), Add, bin(lit(6.0), Pow, lit(7.0))), Add, lit(8.0)),
            ),
            (
                "5 + 6 ^ 7 ^ 8",
                bin(lit(5.0), Add, bin(lit(6.0), Pow, bin(lit(7.0), Pow, lit(8.0)))),
            ),
            ("5 * 6 * 7", bin(bin(lit(5.0), Mul, lit(6.0)), Mul, lit(7.0))),
            ("5 + 6 + 7", bin(bin(lit(5.0), Add, lit(6.0)), Add, lit(7.0))),
            ("7 % 4 * 2", bin(bin(lit(7.0), Rem, lit(4.0)), Mul, lit(2.0))),
            ("(((0)))", lit(0.0)),
            ("(5 + 6) * 7", bin(bin(lit(5.0), Add, lit(6.0)), Mul, lit(7.0))),
            (
                "5 + 6 == 6 * 7",
                bin(bin(lit(5.0), Add, lit(6.0)), Eq, bin(lit(6.0), Mul, lit(7.0))),
            ),
            (
                "5 + 6 >= 6 ^ 7",
                bin(bin(lit(5.0), Add, lit(6.0)), GtEq, bin(lit(6.0), Pow, lit(7.0))),
            ),
        ];
        for (src, expected) in cases {
            assert_eq!(parse(src).unwrap(), expected, "{src}");
        }
    }

    #[test]
    fn unary_operators() {
        assert_eq!(parse("-5").unwrap(), Expr::unary(UnaryOp::Neg, lit(5.0)));
        assert_eq!(parse("+5").unwrap(), Expr::unary(UnaryOp::Plus, lit(5.0)));
        assert_eq!(
            parse("-5 * 6").unwrap(),
            bin(Expr::unary(UnaryOp::Neg, lit(5.0)), BinaryOp::Mul, lit(6.0))
        );
        assert_eq!(
            parse("-2 ^ 2").unwrap(),
            Expr::unary(UnaryOp::Neg, bin(lit(2.0), BinaryOp::Pow, lit(2.0)))
        );
    }

    #[test]
    fn function_calls() {
        assert_eq!(parse("x(6)").unwrap(), Expr::call("x", vec![lit(6.0)]));
        assert_eq!(
            parse("x(6, 7)").unwrap(),
            Expr::call("x", vec![lit(6.0), lit(7.0)])
        );
        assert_eq!(
            parse("x(y(6, 7), 8)").unwrap(),
            Expr::call("x", vec![Expr::call("y", vec![lit(6.0), lit(7.0)]), lit(8.0)])
        );
    }

    #[test]
    fn juxtaposition_multiplies() {
        assert_eq!(
            parse("2 x").unwrap(),
            bin(lit(2.0), BinaryOp::Mul, Expr::var("x"))
        );
        assert_eq!(
            parse("2(3 + 1)").unwrap(),
            bin(lit(2.0), BinaryOp::Mul, bin(lit(3.0), BinaryOp::Add, lit(1.0)))
        );
        // binds like `*`: `2 x ^ 2` is `2 * (x ^ 2)`, `1 + 2 x` is `1 + (2 * x)`
        assert_eq!(
            parse("2 x ^ 2").unwrap(),
            bin(
                lit(2.0),
                BinaryOp::Mul,
                bin(Expr::var("x"), BinaryOp::Pow, lit(2.0))
            )
        );
        assert_eq!(
            parse("1 + 2 x").unwrap(),
            bin(
                lit(1.0),
                BinaryOp::Add,
                bin(lit(2.0), BinaryOp::Mul, Expr::var("x"))
            )
        );
    }

    #[test]
    fn let_chains() {
        assert_eq!(
            parse("a = 1; b = a + 2; b * 3").unwrap(),
            Expr::let_in(
                "a",
                lit(1.0),
                Expr::let_in(
                    "b",
                    bin(Expr::var("a"), BinaryOp::Add, lit(2.0)),
                    bin(Expr::var("b"), BinaryOp::Mul, lit(3.0)),
                ),
            )
        );
    }

    #[test]
    fn let_without_continuation_defaults_to_zero() {
        assert_eq!(
            parse("a = 1").unwrap(),
            Expr::let_in("a", lit(1.0), lit(0.0))
        );
        assert_eq!(
            parse("a = 1;").unwrap(),
            Expr::let_in("a", lit(1.0), lit(0.0))
        );
    }

    #[test]
    fn newline_separated_bindings() {
        assert_eq!(
            parse("a = 2\nb = 3 a\n").unwrap(),
            Expr::let_in(
                "a",
                lit(2.0),
                Expr::let_in("b", bin(lit(3.0), BinaryOp::Mul, Expr::var("a")), lit(0.0)),
            )
        );
    }

    #[test]
    fn quantified_sum() {
        assert_eq!(
            parse("sum(i = 1, 10, i ^ 2)").unwrap(),
            Expr::Quantified {
                kind: Quantifier::Sum,
                index: "i".into(),
                start: Box::new(lit(1.0)),
                end: Box::new(lit(10.0)),
                body: Box::new(bin(Expr::var("i"), BinaryOp::Pow, lit(2.0))),
            }
        );
    }

    #[test]
    fn errors_name_the_token() {
        assert_eq!(parse(""), Err(ExprError::EmptyExpression));
        assert_eq!(parse("   \n"), Err(ExprError::EmptyExpression));
        assert_eq!(parse("(1 + 2"), Err(ExprError::UnclosedBracket { offset: 0 }));
        assert_eq!(parse("sin(1"), Err(ExprError::UnclosedBracket { offset: 3 }));
        assert_eq!(
            parse("1 + )"),
            Err(ExprError::UnexpectedToken {
                token: ")".into(),
                offset: 4
            })
        );
        assert_eq!(
            parse("1 2 )"),
            Err(ExprError::UnexpectedToken {
                token: ")".into(),
                offset: 4
            })
        );
        assert_eq!(parse("1 +"), Err(ExprError::UnexpectedEnd));
        assert!(matches!(
            parse("5 = 3"),
            Err(ExprError::UnexpectedToken { .. })
        ));
    }
}
