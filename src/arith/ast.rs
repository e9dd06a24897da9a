use super::num::Number;
use std::fmt::{self, Write};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnaryOperator {
    Pos,
    Neg,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Pos => '+',
            Self::Neg => '-',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Literal(Number),
    Variable(&'a str),
    Grouping(Box<Expr<'a>>),
    Unary(UnaryOperator, Box<Expr<'a>>),
    Binary(Box<Expr<'a>>, BinaryOperator, Box<Expr<'a>>),
}

impl<'a> Expr<'a> {
    pub fn new_literal(x: impl Into<Number>) -> Self {
        Self::Literal(x.into())
    }

    pub fn new_grouping(inner: Self) -> Self {
        Self::Grouping(Box::new(inner))
    }

    pub fn new_unary(op: UnaryOperator, r: Self) -> Self {
        Self::Unary(op, Box::new(r))
    }

    pub fn new_binary(op: BinaryOperator, l: Self, r: Self) -> Self {
        Self::Binary(Box::new(l), op, Box::new(r))
    }
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(x) => write!(f, "{}", x),
            Self::Variable(name) => f.write_str(name),
            Self::Grouping(x) => write!(f, "({})", x),
            Self::Unary(op, x) => write!(f, "{}{}", op, x),
            Self::Binary(l, op, r) => write!(f, "{} {} {}", l, op, r),
        }
    }
}
