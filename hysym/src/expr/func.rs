//! Free-standing builders for the connectives without operator sugar.
use std::borrow::Borrow;

use crate::{
    backend::Backend,
    expr::Expr,
    ops::{BinaryOp, Quantifier, UnaryOp},
    symbol::Symbol,
};

/// `lhs => rhs`
pub fn implies<B: Backend>(lhs: impl Into<Expr<B>>, rhs: impl Into<Expr<B>>) -> Expr<B> {
    Expr::binary(BinaryOp::Implies, lhs, rhs)
}

/// `lhs <=> rhs`
pub fn iff<B: Backend>(lhs: impl Into<Expr<B>>, rhs: impl Into<Expr<B>>) -> Expr<B> {
    Expr::binary(BinaryOp::Iff, lhs, rhs)
}

pub fn xor<B: Backend>(lhs: impl Into<Expr<B>>, rhs: impl Into<Expr<B>>) -> Expr<B> {
    Expr::binary(BinaryOp::Xor, lhs, rhs)
}

/// Boolean negation.
pub fn neg<B: Backend>(operand: impl Into<Expr<B>>) -> Expr<B> {
    Expr::unary(UnaryOp::Not, operand)
}

/// `if condition then then else otherwise`. Never concrete.
pub fn ite<B: Backend>(
    condition: impl Into<Expr<B>>,
    then: impl Into<Expr<B>>,
    otherwise: impl Into<Expr<B>>,
) -> Expr<B> {
    Expr::ite(condition, then, otherwise)
}

pub fn forall<B, I>(bound: I, body: impl Into<Expr<B>>) -> Expr<B>
where
    B: Backend,
    I: IntoIterator,
    I::Item: Borrow<Symbol<B>>,
{
    Expr::quantifier(Quantifier::ForAll, bound, body)
}

pub fn exists<B, I>(bound: I, body: impl Into<Expr<B>>) -> Expr<B>
where
    B: Backend,
    I: IntoIterator,
    I::Item: Borrow<Symbol<B>>,
{
    Expr::quantifier(Quantifier::Exists, bound, body)
}

/// Conjunction of all items; `true` when empty.
pub fn all<B, I>(items: I) -> Expr<B>
where
    B: Backend,
    I: IntoIterator,
    I::Item: Into<Expr<B>>,
{
    items
        .into_iter()
        .map(Into::into)
        .reduce(|acc, item| acc & item)
        .unwrap_or_else(|| Expr::literal(true))
}

/// Disjunction of all items; `true` when empty.
pub fn any<B, I>(items: I) -> Expr<B>
where
    B: Backend,
    I: IntoIterator,
    I::Item: Into<Expr<B>>,
{
    items
        .into_iter()
        .map(Into::into)
        .reduce(|acc, item| acc | item)
        .unwrap_or_else(|| Expr::literal(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::bounded::BoundedBackend;

    type E = Expr<BoundedBackend>;

    #[test]
    fn empty_folds_are_vacuously_true() {
        assert!(all(Vec::<E>::new()).as_bool().unwrap());
        assert!(any(Vec::<E>::new()).as_bool().unwrap());
    }

    #[test]
    fn folds_over_literals() {
        assert!(!all::<BoundedBackend, _>([true, false, true]).as_bool().unwrap());
        assert!(any::<BoundedBackend, _>([false, false, true]).as_bool().unwrap());
    }

    #[test]
    fn implication_and_biconditional() {
        assert!(implies::<BoundedBackend>(false, false).as_bool().unwrap());
        assert!(!implies::<BoundedBackend>(true, false).as_bool().unwrap());
        assert!(iff::<BoundedBackend>(false, false).as_bool().unwrap());
        assert!(xor::<BoundedBackend>(true, false).as_bool().unwrap());
        assert!(neg::<BoundedBackend>(false).as_bool().unwrap());
    }
}
