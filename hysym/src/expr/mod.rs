//! Expression trees with dual-mode evaluation.
//!
//! Every operator is dispatched at construction time: when all operands have
//! a concrete value, the operator is evaluated on the host and the result is
//! a literal node; otherwise a deferred node is built for the backend to
//! interpret. Both arms share the operator tables of [`crate::ops`], so a
//! deferred node and its eager counterpart agree on every assignment.
//!
//! Concreteness is structural and re-evaluated on demand: a deferred node
//! built before concretization becomes concrete once all the symbols below it
//! are bound. Conditional choice, quantifiers, applications and array
//! selections never claim a concrete value.
//!
//! ```
//! use hysym::prelude::*;
//!
//! let mut session = Session::new(BoundedBackend::new());
//! let x = session.int("x").unwrap();
//! let y = session.int("y").unwrap();
//!
//! // Deferred: `x` is still unbound.
//! let sum = &x + &y;
//! assert!(!sum.has_concrete_value());
//!
//! // Eager: literals fold immediately.
//! let folded = Expr::<BoundedBackend>::literal(2) * 21;
//! assert_eq!(folded.as_i64().unwrap(), 42);
//!
//! session.require(x.equals(12)).unwrap();
//! session.require(y.equals(2)).unwrap();
//! session.concretize().unwrap();
//! assert_eq!(sum.as_i64().unwrap(), 14);
//! ```
pub mod func;
pub mod ops;
pub mod pretty;

use std::{borrow::Borrow, fmt, rc::Rc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    array::SymbolicArray,
    backend::Backend,
    error::{Error, Result},
    function::Function,
    ops::{self as host, BinaryOp, Quantifier, UnaryOp},
    symbol::Symbol,
    value::{Kind, ObjectHandle, Value},
};

/// Node of an expression tree.
pub enum ExprNode<B: Backend> {
    Literal(Value),
    Symbol(Symbol<B>),
    Unary {
        op: UnaryOp,
        operand: Expr<B>,
        kind: Kind,
    },
    Binary {
        op: BinaryOp,
        lhs: Expr<B>,
        rhs: Expr<B>,
        kind: Kind,
    },
    Ite {
        condition: Expr<B>,
        then: Expr<B>,
        otherwise: Expr<B>,
        kind: Kind,
    },
    Quantifier {
        quantifier: Quantifier,
        bound: Vec<Symbol<B>>,
        body: Expr<B>,
    },
    Apply {
        func: Function<B>,
        args: Vec<Expr<B>>,
    },
    Select {
        array: SymbolicArray<B>,
        index: Expr<B>,
    },
}

/// Immutable, shared expression. Clones are cheap.
pub struct Expr<B: Backend> {
    node: Rc<ExprNode<B>>,
}

impl<B: Backend> Clone for Expr<B> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<B: Backend> Expr<B> {
    pub(crate) fn from_node(node: ExprNode<B>) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    /// Wrap a host value. Literals are always concrete.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_node(ExprNode::Literal(value.into()))
    }

    pub fn node(&self) -> &ExprNode<B> {
        &self.node
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.node(), ExprNode::Literal(_))
    }

    /// Static kind of the expression.
    pub fn kind(&self) -> Kind {
        match self.node() {
            ExprNode::Literal(value) => value.kind(),
            ExprNode::Symbol(symbol) => symbol.kind().clone(),
            ExprNode::Unary { kind, .. }
            | ExprNode::Binary { kind, .. }
            | ExprNode::Ite { kind, .. } => kind.clone(),
            ExprNode::Quantifier { .. } => Kind::Bool,
            ExprNode::Apply { func, .. } => func.range().clone(),
            ExprNode::Select { .. } => Kind::Int,
        }
    }

    /// Whether [`Expr::concrete_value`] can be computed without a solver.
    pub fn has_concrete_value(&self) -> bool {
        match self.node() {
            ExprNode::Literal(_) => true,
            ExprNode::Symbol(symbol) => symbol.is_bound(),
            ExprNode::Unary { operand, .. } => operand.has_concrete_value(),
            ExprNode::Binary { lhs, rhs, .. } => lhs.has_concrete_value() && rhs.has_concrete_value(),
            ExprNode::Ite { .. }
            | ExprNode::Quantifier { .. }
            | ExprNode::Apply { .. }
            | ExprNode::Select { .. } => false,
        }
    }

    /// Host value of a concrete expression.
    ///
    /// Bound symbols contribute their unrounded model value, so the result
    /// matches what the backend computes for the same node.
    pub fn concrete_value(&self) -> Result<Value> {
        if !self.has_concrete_value() {
            return Err(Error::NotConcrete {
                expr: self.to_string(),
            });
        }
        self.compute()
    }

    fn compute(&self) -> Result<Value> {
        match self.node() {
            ExprNode::Literal(value) => Ok(value.clone()),
            ExprNode::Symbol(symbol) => symbol.raw_value(),
            ExprNode::Unary { op, operand, .. } => host::apply_unary(*op, &operand.compute()?),
            ExprNode::Binary { op, lhs, rhs, .. } => {
                host::apply_binary(*op, &lhs.compute()?, &rhs.compute()?)
            }
            _ => Err(Error::NotConcrete {
                expr: self.to_string(),
            }),
        }
    }

    fn typed<T>(&self, accessor: &str, view: impl FnOnce(&Value) -> Option<T>) -> Result<T> {
        // A bare symbol reads like its own accessors: rounded.
        let value = match self.node() {
            ExprNode::Symbol(symbol) => symbol.value()?,
            _ => self.concrete_value()?,
        };
        view(&value).ok_or_else(|| Error::TypeMismatch {
            op: accessor.to_string(),
            operands: format!("`{value}` ({})", value.kind()),
        })
    }

    /// Boolean coercion of a concrete predicate.
    pub fn as_bool(&self) -> Result<bool> {
        self.typed("as_bool", Value::as_bool)
    }

    pub fn as_i64(&self) -> Result<i64> {
        self.typed("as_i64", Value::as_i64)
    }

    pub fn as_bigint(&self) -> Result<BigInt> {
        self.typed("as_bigint", |v| v.as_bigint().cloned())
    }

    pub fn as_f64(&self) -> Result<f64> {
        self.typed("as_f64", Value::as_f64)
    }

    pub fn as_decimal(&self) -> Result<BigDecimal> {
        self.typed("as_decimal", Value::as_decimal)
    }

    pub fn as_object(&self) -> Result<ObjectHandle> {
        self.typed("as_object", |v| v.as_object().cloned())
    }

    /// Build a unary node, folding it when the operand is concrete.
    pub fn unary(op: UnaryOp, operand: impl Into<Self>) -> Self {
        let operand = operand.into();
        if operand.has_concrete_value() {
            if let Ok(value) = operand.compute().and_then(|v| host::apply_unary(op, &v)) {
                return Self::literal(value);
            }
        }

        let kind = match op {
            UnaryOp::Not => Kind::Bool,
            UnaryOp::Neg => operand.kind(),
        };
        Self::from_node(ExprNode::Unary { op, operand, kind })
    }

    /// Build a binary node, folding it when both operands are concrete.
    ///
    /// Folding errors (such as a division by zero) leave the node deferred.
    pub fn binary(op: BinaryOp, lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let (lhs, rhs) = (lhs.into(), rhs.into());
        if lhs.has_concrete_value() && rhs.has_concrete_value() {
            let folded = lhs
                .compute()
                .and_then(|l| rhs.compute().and_then(|r| host::apply_binary(op, &l, &r)));
            if let Ok(value) = folded {
                return Self::literal(value);
            }
        }

        let kind = op.result_kind(&lhs.kind(), &rhs.kind());
        Self::from_node(ExprNode::Binary { op, lhs, rhs, kind })
    }

    /// Conditional choice. Always deferred.
    pub fn ite(condition: impl Into<Self>, then: impl Into<Self>, otherwise: impl Into<Self>) -> Self {
        let (condition, then, otherwise) = (condition.into(), then.into(), otherwise.into());
        let (then_kind, else_kind) = (then.kind(), otherwise.kind());
        let kind = if then_kind != else_kind && then_kind.is_numeric() && else_kind.is_numeric() {
            Kind::Real
        } else {
            then_kind
        };
        Self::from_node(ExprNode::Ite {
            condition,
            then,
            otherwise,
            kind,
        })
    }

    /// Quantify `body` over `bound`. Always deferred.
    pub fn quantifier<I>(quantifier: Quantifier, bound: I, body: impl Into<Self>) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<Symbol<B>>,
    {
        let bound = bound
            .into_iter()
            .map(|symbol| symbol.borrow().clone())
            .collect();
        Self::from_node(ExprNode::Quantifier {
            quantifier,
            bound,
            body: body.into(),
        })
    }

    /// Lower to a native term.
    ///
    /// Bound symbols lower to the literal of their unrounded model value,
    /// except where a quantifier rebinds them.
    pub(crate) fn lower(&self, backend: &mut B) -> Result<B::Term> {
        self.lower_in(backend, &mut Vec::new())
    }

    fn lower_in(&self, backend: &mut B, shadowed: &mut Vec<Symbol<B>>) -> Result<B::Term> {
        let term = match self.node() {
            ExprNode::Literal(value) => backend.literal(value)?,
            ExprNode::Symbol(symbol)
                if symbol.is_bound() && !shadowed.iter().any(|s| s.same(symbol)) =>
            {
                backend.literal(&symbol.raw_value()?)?
            }
            ExprNode::Symbol(symbol) => symbol.native_term(backend)?,
            ExprNode::Unary { op, operand, .. } => {
                let operand = operand.lower_in(backend, shadowed)?;
                backend.unary(*op, &operand)?
            }
            ExprNode::Binary { op, lhs, rhs, .. } => {
                let lhs = lhs.lower_in(backend, shadowed)?;
                let rhs = rhs.lower_in(backend, shadowed)?;
                backend.binary(*op, &lhs, &rhs)?
            }
            ExprNode::Ite {
                condition,
                then,
                otherwise,
                ..
            } => {
                let condition = condition.lower_in(backend, shadowed)?;
                let then = then.lower_in(backend, shadowed)?;
                let otherwise = otherwise.lower_in(backend, shadowed)?;
                backend.ite(&condition, &then, &otherwise)?
            }
            ExprNode::Quantifier {
                quantifier,
                bound: bound_symbols,
                body,
            } => {
                let bound = bound_symbols
                    .iter()
                    .map(|symbol| symbol.native_term(backend))
                    .collect::<Result<Vec<_>>>()?;
                let depth = shadowed.len();
                shadowed.extend(bound_symbols.iter().cloned());
                let body = body.lower_in(backend, shadowed);
                shadowed.truncate(depth);
                backend.quantifier(*quantifier, &bound, &body?)?
            }
            ExprNode::Apply { func, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.lower_in(backend, shadowed))
                    .collect::<Result<Vec<_>>>()?;
                backend.apply(func.native(), &args)?
            }
            ExprNode::Select { array, index } => {
                let index = index.lower_in(backend, shadowed)?;
                backend.select(array.native(), &index)?
            }
        };
        Ok(term)
    }
}

impl<B: Backend> From<Symbol<B>> for Expr<B> {
    fn from(symbol: Symbol<B>) -> Self {
        Self::from_node(ExprNode::Symbol(symbol))
    }
}

impl<B: Backend> From<&Symbol<B>> for Expr<B> {
    fn from(symbol: &Symbol<B>) -> Self {
        Self::from(symbol.clone())
    }
}

impl<B: Backend> From<&Expr<B>> for Expr<B> {
    fn from(expr: &Expr<B>) -> Self {
        expr.clone()
    }
}

macro_rules! literal_from {
    ($($t:ty),+ $(,)?) => {
        $(
            impl<B: Backend> From<$t> for Expr<B> {
                fn from(value: $t) -> Self {
                    Self::literal(value)
                }
            }
        )+
    };
}

literal_from!(Value, bool, i32, i64, u32, BigInt, BigDecimal, ObjectHandle);

impl<B: Backend> fmt::Debug for Expr<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}
