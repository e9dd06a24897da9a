use super::{ast::*, lexer::*};
use crate::common::*;
use logos_iter::LogosIter;
use std::fmt;
use std::ops::Range;

type PResult<'a, T = Expr<'a>> = Result<T, ParseError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: Vec<TokenKind>,
    },
    UnexpectedString {
        expected: Vec<TokenKind>,
    },
    BadNumber,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                found: Some(found),
                expected,
            } => {
                write!(f, "unexpected {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedToken {
                found: None,
                expected,
            } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedString { expected } => {
                write!(f, "expected ")?;
                fmt_expected(expected, f)
            }
            Self::BadNumber => write!(f, "number out of range"),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let len = expected.len();

    if expected.is_empty() {
        f.write_str("end of input")
    } else if len == 1 {
        f.write_str(expected[0].as_str())
    } else if len == 2 {
        write!(f, "{} or {}", expected[0], expected[1])
    } else {
        for exp in &expected[..len - 1] {
            write!(f, "{}, ", exp)?;
        }
        write!(f, "or {}", expected[len - 1])
    }
}

/// Recursive descent over `+ -` < `* /` < unary signs < `**` (right associative).
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    const ADDITION_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const MULTIPLICATION_OPS: &'static [TokenKind] = &[TokenKind::Star, TokenKind::Slash];

    const UNARY_PREFIX_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const ATOMS: &'static [TokenKind] = &[
        TokenKind::LeftParen,
        TokenKind::Integer,
        TokenKind::Decimal,
        TokenKind::Ident,
    ];

    pub fn new(s: &'a str) -> Self {
        Self { lexer: lexer(s) }
    }

    pub fn parse(mut self) -> PResult<'a> {
        let expr = self.parse_addition()?;
        if self.lexer.peek().is_some() {
            return self.unexpected_token(vec![]);
        }
        Ok(expr)
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<'a, ()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            self.unexpected_token(vec![expected])
        }
    }

    fn consume_as<T: std::str::FromStr>(&mut self, expected: TokenKind) -> PResult<'a, T> {
        self.consume(expected)?;
        match self.lexer.slice().parse() {
            Ok(x) => Ok(x),
            Err(_) => self.error(ParseErrorKind::BadNumber),
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<'a, T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: Vec<TokenKind>) -> PResult<'a, T> {
        let found = self.lexer.next();
        if matches!(found, Some(TokenKind::Error)) {
            self.error(ParseErrorKind::UnexpectedString { expected })
        } else {
            self.error(ParseErrorKind::UnexpectedToken { found, expected })
        }
    }

    fn binary_op(&mut self) -> Option<BinaryOperator> {
        let op = match self.lexer.next()? {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            TokenKind::StarStar => BinaryOperator::Pow,
            _ => return None,
        };
        Some(op)
    }

    fn parse_addition(&mut self) -> PResult<'a> {
        let mut lhs = self.parse_multiplication()?;

        while self.matches_any(Self::ADDITION_OPS) {
            let op = self.binary_op().unwrap_or(BinaryOperator::Add);
            let rhs = self.parse_multiplication()?;

            lhs = Expr::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult<'a> {
        let mut lhs = self.parse_unary_prefix()?;

        while self.matches_any(Self::MULTIPLICATION_OPS) {
            let op = self.binary_op().unwrap_or(BinaryOperator::Mul);
            let rhs = self.parse_unary_prefix()?;

            lhs = Expr::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_unary_prefix(&mut self) -> PResult<'a> {
        if self.matches_any(Self::UNARY_PREFIX_OPS) {
            let op = match self.lexer.next() {
                Some(TokenKind::Minus) => UnaryOperator::Neg,
                _ => UnaryOperator::Pos,
            };
            let rhs = self.parse_unary_prefix()?;

            Ok(Expr::new_unary(op, rhs))
        } else {
            self.parse_power()
        }
    }

    fn parse_power(&mut self) -> PResult<'a> {
        let base = self.parse_atom()?;

        if self.matches(TokenKind::StarStar) {
            self.lexer.next();
            // `2 ** -1` is allowed, and `2 ** 3 ** 2` groups to the right
            let exponent = self.parse_unary_prefix()?;
            Ok(Expr::new_binary(BinaryOperator::Pow, base, exponent))
        } else {
            Ok(base)
        }
    }

    fn parse_atom(&mut self) -> PResult<'a> {
        match self.lexer.peek() {
            Some(TokenKind::LeftParen) => self.parse_grouping(),
            Some(TokenKind::Decimal) => self
                .consume_as::<Float>(TokenKind::Decimal)
                .map(Expr::new_literal),
            Some(TokenKind::Integer) => self
                .consume_as::<Int>(TokenKind::Integer)
                .map(Expr::new_literal),
            Some(TokenKind::Ident) => {
                self.consume(TokenKind::Ident)?;
                Ok(Expr::Variable(self.lexer.slice()))
            }
            _ => self.unexpected_token(Self::ATOMS.to_vec()),
        }
    }

    fn parse_grouping(&mut self) -> PResult<'a> {
        self.consume(TokenKind::LeftParen)?;
        let inner = self.parse_addition()?;
        self.consume(TokenKind::RightParen)?;
        Ok(Expr::new_grouping(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BinaryOperator::*;
    use UnaryOperator::*;

    fn lit(x: Int) -> Expr<'static> {
        Expr::new_literal(x)
    }

    fn bin<'a>(l: Expr<'a>, op: BinaryOperator, r: Expr<'a>) -> Expr<'a> {
        Expr::new_binary(op, l, r)
    }

    fn check(s: &str, expected: Expr) {
        let parsed = Parser::new(s).parse().unwrap();
        assert_eq!(parsed, expected);
    }

    fn check_err(s: &str, expected: ParseErrorKind) {
        let err = Parser::new(s).parse().unwrap_err();
        assert_eq!(err.kind, expected);
    }

    #[test]
    fn test_parse_nums() {
        check("32", lit(32));
        check("3.5", Expr::new_literal(3.5));
        check(".25", Expr::new_literal(0.25));
    }

    #[test]
    fn test_parse_left_assoc() {
        check("1 - 2 - 3", bin(bin(lit(1), Sub, lit(2)), Sub, lit(3)));
        check("8 / 4 * 2", bin(bin(lit(8), Div, lit(4)), Mul, lit(2)));
    }

    #[test]
    fn test_parse_precedence() {
        check("1 + 2 * 3", bin(lit(1), Add, bin(lit(2), Mul, lit(3))));
        check(
            "-2 ** 2",
            Expr::new_unary(Neg, bin(lit(2), Pow, lit(2))),
        );
        check(
            "2 ** 3 ** 2",
            bin(lit(2), Pow, bin(lit(3), Pow, lit(2))),
        );
        check(
            "(1 + 2) * x",
            bin(
                Expr::new_grouping(bin(lit(1), Add, lit(2))),
                Mul,
                Expr::Variable("x"),
            ),
        );
    }

    #[test]
    fn test_parse_errors() {
        check_err(
            "1 +",
            ParseErrorKind::UnexpectedToken {
                found: None,
                expected: Parser::ATOMS.to_vec(),
            },
        );
        check_err(
            "(1",
            ParseErrorKind::UnexpectedToken {
                found: None,
                expected: vec![TokenKind::RightParen],
            },
        );
        check_err("1 2", ParseErrorKind::UnexpectedToken {
            found: Some(TokenKind::Integer),
            expected: vec![],
        });
        check_err("99999999999999999999", ParseErrorKind::BadNumber);
    }

    #[test]
    fn test_error_position() {
        let err = Parser::new("1 2").parse().unwrap_err();
        assert_eq!(err.span, 2..3);
        assert_eq!(err.slice, "2");
    }
}
