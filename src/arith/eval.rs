use super::ast::*;
use super::num::Number;
use super::visit::{Accept, ExprVisitor};
use super::ArithError;
use std::collections::{BTreeMap, HashMap};

/// Values for the names an expression may refer to.
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<Number>;
}

impl Bindings for () {
    fn lookup(&self, _name: &str) -> Option<Number> {
        None
    }
}

impl Bindings for HashMap<String, Number> {
    fn lookup(&self, name: &str) -> Option<Number> {
        self.get(name).copied()
    }
}

impl Bindings for BTreeMap<String, Number> {
    fn lookup(&self, name: &str) -> Option<Number> {
        self.get(name).copied()
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn lookup(&self, name: &str) -> Option<Number> {
        (**self).lookup(name)
    }
}

pub struct Evaluator<B> {
    bindings: B,
}

impl<B: Bindings> Evaluator<B> {
    pub fn new(bindings: B) -> Self {
        Self { bindings }
    }

    pub fn eval(&mut self, expr: &Expr<'_>) -> Result<Number, ArithError> {
        expr.accept(self)
    }
}

impl<'a, B: Bindings> ExprVisitor<'a> for Evaluator<B> {
    type Output = Result<Number, ArithError>;

    fn visit_literal(&mut self, x: &Number) -> Self::Output {
        Ok(*x)
    }

    fn visit_variable(&mut self, name: &'a str) -> Self::Output {
        self.bindings
            .lookup(name)
            .ok_or_else(|| ArithError::UnknownVariable(name.to_string()))
    }

    fn visit_grouping(&mut self, inner: &Expr<'a>) -> Self::Output {
        inner.accept(self)
    }

    fn visit_unary(&mut self, op: &UnaryOperator, r: &Expr<'a>) -> Self::Output {
        let value = r.accept(self)?;
        match op {
            UnaryOperator::Pos => Ok(value),
            UnaryOperator::Neg => value.neg(),
        }
    }

    fn visit_binary(&mut self, l: &Expr<'a>, op: &BinaryOperator, r: &Expr<'a>) -> Self::Output {
        let left = l.accept(self)?;
        let right = r.accept(self)?;
        match op {
            BinaryOperator::Add => left.add(right),
            BinaryOperator::Sub => left.sub(right),
            BinaryOperator::Mul => left.mul(right),
            BinaryOperator::Div => left.div(right),
            BinaryOperator::Pow => left.pow(right),
        }
    }
}
