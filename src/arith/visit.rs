use super::ast::*;
use super::num::Number;

pub trait ExprVisitor<'a> {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<'a, Self>,
    {
        node.accept(self)
    }

    fn visit_literal(&mut self, x: &Number) -> Self::Output;

    fn visit_variable(&mut self, name: &'a str) -> Self::Output;

    fn visit_grouping(&mut self, inner: &Expr<'a>) -> Self::Output;

    fn visit_unary(&mut self, op: &UnaryOperator, r: &Expr<'a>) -> Self::Output;

    fn visit_binary(&mut self, l: &Expr<'a>, op: &BinaryOperator, r: &Expr<'a>) -> Self::Output;
}

pub trait Accept<'a, V: ExprVisitor<'a> + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<'a, V: ExprVisitor<'a> + ?Sized> Accept<'a, V> for Expr<'a> {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Literal(x) => v.visit_literal(x),
            Self::Variable(name) => v.visit_variable(*name),
            Self::Grouping(x) => v.visit_grouping(x),
            Self::Unary(op, x) => v.visit_unary(op, x),
            Self::Binary(l, op, r) => v.visit_binary(l, op, r),
        }
    }
}
