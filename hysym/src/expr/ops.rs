//! Operator sugar for expressions and symbols.
//!
//! `+ - * / %` and unary `-` build arithmetic nodes, `& | ^ !` build boolean
//! connectives. Rust's comparison traits must return `bool`, so comparisons
//! and equality are the builder methods of [`Operand`] instead.
use crate::{
    backend::Backend,
    expr::Expr,
    ops::{BinaryOp, UnaryOp},
    symbol::Symbol,
};

macro_rules! define_binary_op {
    ($trait:ident, $method:ident, $op:expr; $($target:ty),+ $(,)?) => {
        $(
            impl<B: Backend, R: Into<Expr<B>>> std::ops::$trait<R> for $target {
                type Output = Expr<B>;

                fn $method(self, rhs: R) -> Self::Output {
                    Expr::binary($op, self, rhs)
                }
            }
        )+
    };
}

macro_rules! define_unary_op {
    ($trait:ident, $method:ident, $op:expr; $($target:ty),+ $(,)?) => {
        $(
            impl<B: Backend> std::ops::$trait for $target {
                type Output = Expr<B>;

                fn $method(self) -> Self::Output {
                    Expr::unary($op, self)
                }
            }
        )+
    };
}

/// Host integers on the left-hand side.
macro_rules! define_reverse_op {
    ($trait:ident, $method:ident, $op:expr; $($target:ty),+ $(,)?) => {
        $(
            impl<B: Backend> std::ops::$trait<$target> for i64 {
                type Output = Expr<B>;

                fn $method(self, rhs: $target) -> Self::Output {
                    Expr::binary($op, self, rhs)
                }
            }
        )+
    };
}

macro_rules! define_ops {
    ($($target:ty),+ $(,)?) => {
        define_binary_op!(Add, add, BinaryOp::Add; $($target),+);
        define_binary_op!(Sub, sub, BinaryOp::Sub; $($target),+);
        define_binary_op!(Mul, mul, BinaryOp::Mul; $($target),+);
        define_binary_op!(Div, div, BinaryOp::Div; $($target),+);
        define_binary_op!(Rem, rem, BinaryOp::Mod; $($target),+);
        define_binary_op!(BitAnd, bitand, BinaryOp::And; $($target),+);
        define_binary_op!(BitOr, bitor, BinaryOp::Or; $($target),+);
        define_binary_op!(BitXor, bitxor, BinaryOp::Xor; $($target),+);
        define_unary_op!(Neg, neg, UnaryOp::Neg; $($target),+);
        define_unary_op!(Not, not, UnaryOp::Not; $($target),+);
        define_reverse_op!(Add, add, BinaryOp::Add; $($target),+);
        define_reverse_op!(Sub, sub, BinaryOp::Sub; $($target),+);
        define_reverse_op!(Mul, mul, BinaryOp::Mul; $($target),+);
        define_reverse_op!(Div, div, BinaryOp::Div; $($target),+);
        define_reverse_op!(Rem, rem, BinaryOp::Mod; $($target),+);
    };
}

define_ops!(Expr<B>, &Expr<B>, Symbol<B>, &Symbol<B>);

/// Comparison and equality builders.
///
/// Every method follows the dual-mode dispatch of [`Expr::binary`]: concrete
/// operands fold into a boolean literal.
pub trait Operand<B: Backend> {
    fn to_expr(&self) -> Expr<B>;

    fn equals(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Eq, self.to_expr(), other)
    }

    fn not_equals(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Ne, self.to_expr(), other)
    }

    fn lt(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Lt, self.to_expr(), other)
    }

    fn le(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Le, self.to_expr(), other)
    }

    fn gt(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Gt, self.to_expr(), other)
    }

    fn ge(&self, other: impl Into<Expr<B>>) -> Expr<B> {
        Expr::binary(BinaryOp::Ge, self.to_expr(), other)
    }
}

impl<B: Backend> Operand<B> for Expr<B> {
    fn to_expr(&self) -> Expr<B> {
        self.clone()
    }
}

impl<B: Backend> Operand<B> for Symbol<B> {
    fn to_expr(&self) -> Expr<B> {
        Expr::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::bounded::BoundedBackend, expr::ExprNode};

    type E = Expr<BoundedBackend>;

    #[test]
    fn operators_fold_literals() {
        let e = (E::literal(7) - 2) * 3 % 4;
        assert_eq!(e.as_i64().unwrap(), 3);
        assert_eq!((-E::literal(5)).as_i64().unwrap(), -5);
        assert_eq!((10 - E::literal(4)).as_i64().unwrap(), 6);
        assert!((!E::literal(false)).as_bool().unwrap());
        assert!((E::literal(true) ^ false).as_bool().unwrap());
    }

    #[test]
    fn comparisons_fold_literals() {
        let two = E::literal(2);
        assert!(two.lt(3).as_bool().unwrap());
        assert!(two.ge(2).as_bool().unwrap());
        assert!(two.not_equals(3).as_bool().unwrap());
        assert!(!two.equals(3).as_bool().unwrap());
        assert!(matches!(
            two.equals(3).node(),
            ExprNode::Literal(_)
        ));
    }
}
