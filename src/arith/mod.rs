//! A small arithmetic language: numbers, names, `+ - * / **` and parentheses.

mod ast;
mod eval;
mod lexer;
mod num;
mod parser;
mod visit;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use eval::{Bindings, Evaluator};
pub use num::Number;
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use visit::{Accept, ExprVisitor};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ArithError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("unknown variable {0:?}")]
    UnknownVariable(String),
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("arithmetic overflow")]
    Overflow,
}

pub fn parse(s: &str) -> Result<Expr, ParseError> {
    Parser::new(s).parse()
}

pub fn evaluate(s: &str, bindings: impl Bindings) -> Result<Number, ArithError> {
    let expr = parse(s)?;
    log::trace!("evaluating {}", expr);
    Evaluator::new(bindings).eval(&expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn check(s: &str, expected: impl Into<Number>) {
        assert_eq!(evaluate(s, ()).unwrap(), expected.into());
    }

    fn check_err(s: &str, expected: ArithError) {
        assert_eq!(evaluate(s, ()).unwrap_err(), expected);
    }

    #[test]
    fn test_eval_number() {
        check("2", 2);
        check("2.5", 2.5);
    }

    #[test]
    fn test_eval_unary() {
        check("-2", -2);
        check("--2", 2);
        check("-2 ** 2", -4);
    }

    #[test]
    fn test_eval_binary() {
        check("2 + 3", 5);
        check("10 - 4 - 3", 3);
        check("2 * (1 - 3)", -4);
        check("7 / 2", 3.5);
        check("2 ** 10", 1024);
        check("2 ** -1", 0.5);
    }

    #[test]
    fn test_eval_bindings() {
        let mut bindings = HashMap::new();
        bindings.insert("x".to_string(), Number::Int(4));
        assert_eq!(evaluate("x * x + 1", &bindings), Ok(Number::Int(17)));
        assert_eq!(
            evaluate("y", &bindings),
            Err(ArithError::UnknownVariable("y".to_string()))
        );
    }

    #[test]
    fn test_eval_errors() {
        check_err("1 / 0", ArithError::ZeroDivision);
        check_err("1 / (2 - 2)", ArithError::ZeroDivision);
        check_err("9223372036854775807 + 1", ArithError::Overflow);
        check_err("(-9223372036854775807 - 1) / -1", ArithError::Overflow);
        assert!(matches!(evaluate("1 +", ()), Err(ArithError::Parse(_))));
    }
}
