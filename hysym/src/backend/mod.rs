//! Backend adapter contract.
//!
//! A backend exposes the native primitives of a constraint-solving engine:
//! sorts, constants, function declarations, term constructors, one solving
//! context per scope and the models those contexts produce. The front-end is
//! generic over [`Backend`] and never inspects native terms; everything it knows
//! about a model comes back as a decoded [`Value`].
//!
//! The crate ships one adapter, [`bounded::BoundedBackend`], which decides
//! satisfiability by exhaustive search over small domains.
use std::fmt;

use strum::{Display, EnumIs};

use crate::{
    error::BackendError,
    ops::{BinaryOp, Quantifier, UnaryOp},
    value::Value,
};

pub mod bounded;

/// Result type of backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Flavor of a solving context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum ScopeKind {
    /// Plain satisfiability checking.
    Solver,
    /// Satisfiability checking with minimize/maximize objectives.
    Optimizer,
}

/// Status part of a [`SatResult`], without the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum SatStatus {
    Sat,
    Unsat,
    Unknown,
}

/// Answer of a satisfiability check.
#[derive(Debug, Clone, EnumIs)]
pub enum SatResult<M> {
    Sat(M),
    Unsat,
    Unknown,
}

impl<M> SatResult<M> {
    pub fn status(&self) -> SatStatus {
        match self {
            SatResult::Sat(_) => SatStatus::Sat,
            SatResult::Unsat => SatStatus::Unsat,
            SatResult::Unknown => SatStatus::Unknown,
        }
    }

    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> SatResult<N> {
        match self {
            SatResult::Sat(model) => SatResult::Sat(f(model)),
            SatResult::Unsat => SatResult::Unsat,
            SatResult::Unknown => SatResult::Unknown,
        }
    }

    pub fn model(self) -> Option<M> {
        match self {
            SatResult::Sat(model) => Some(model),
            _ => None,
        }
    }
}

/// Native primitives of a constraint-solving engine.
///
/// Constructors take `&mut self` so adapters are free to keep declaration
/// tables or a native context handle. Every fallible operation reports a
/// [`BackendError`], which the front-end forwards to the caller unchanged.
pub trait Backend: Sized {
    /// Native term (expression) handle.
    type Term: Clone + fmt::Debug;
    /// Native sort handle.
    type Sort: Clone + fmt::Debug;
    /// Native uninterpreted-function declaration.
    type Function: Clone + fmt::Debug;
    /// Model produced by a successful check.
    type Model: NativeModel<Self>;
    /// Per-scope solving context.
    type Solver: SolverContext<Self>;

    fn int_sort(&mut self) -> Self::Sort;
    fn real_sort(&mut self) -> Self::Sort;
    fn bool_sort(&mut self) -> Self::Sort;

    /// Declare an uninterpreted sort.
    fn declare_sort(&mut self, name: &str) -> BackendResult<Self::Sort>;

    /// Declare a fresh constant of the given sort.
    fn constant(&mut self, name: &str, sort: &Self::Sort) -> BackendResult<Self::Term>;

    /// Declare a fresh integer-indexed, integer-valued array constant.
    fn int_array(&mut self, name: &str) -> BackendResult<Self::Term>;

    /// Declare an uninterpreted function `domain -> range`.
    fn declare_function(
        &mut self,
        name: &str,
        domain: &[Self::Sort],
        range: &Self::Sort,
    ) -> BackendResult<Self::Function>;

    /// Lower a host value to a native literal.
    fn literal(&mut self, value: &Value) -> BackendResult<Self::Term>;

    fn unary(&mut self, op: UnaryOp, operand: &Self::Term) -> BackendResult<Self::Term>;

    fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &Self::Term,
        rhs: &Self::Term,
    ) -> BackendResult<Self::Term>;

    fn ite(
        &mut self,
        condition: &Self::Term,
        then: &Self::Term,
        otherwise: &Self::Term,
    ) -> BackendResult<Self::Term>;

    /// Quantify `body` over the given constants.
    fn quantifier(
        &mut self,
        kind: Quantifier,
        bound: &[Self::Term],
        body: &Self::Term,
    ) -> BackendResult<Self::Term>;

    fn apply(&mut self, func: &Self::Function, args: &[Self::Term]) -> BackendResult<Self::Term>;

    fn select(&mut self, array: &Self::Term, index: &Self::Term) -> BackendResult<Self::Term>;

    /// Create an independent solving context.
    fn solver(&mut self, kind: ScopeKind) -> Self::Solver;
}

/// Constraint store and solving entry points of a single scope.
pub trait SolverContext<B: Backend> {
    fn kind(&self) -> ScopeKind;

    /// Append an assertion.
    fn add(&mut self, constraint: &B::Term) -> BackendResult<()>;

    /// Record a checkpoint of the assertion set.
    fn push(&mut self);

    /// Roll back to the most recent checkpoint.
    fn pop(&mut self) -> BackendResult<()>;

    /// Drop every assertion, objective and checkpoint.
    fn reset(&mut self);

    /// Assertions currently in force, in insertion order.
    fn assertions(&self) -> Vec<B::Term>;

    fn check(&mut self) -> BackendResult<SatResult<B::Model>>;

    /// Register a minimization objective. Only optimizing contexts accept it.
    fn minimize(&mut self, objective: &B::Term) -> BackendResult<()>;

    /// Register a maximization objective. Only optimizing contexts accept it.
    fn maximize(&mut self, objective: &B::Term) -> BackendResult<()>;
}

/// Read access to a solved assignment.
///
/// Every lookup answers `None` when the model does not assign the requested
/// term, function point or array element.
pub trait NativeModel<B: Backend> {
    fn eval(&self, term: &B::Term) -> Option<Value>;
    fn apply(&self, func: &B::Function, args: &[Value]) -> Option<Value>;
    fn select(&self, array: &B::Term, index: &Value) -> Option<Value>;

    /// Whether the model carries an interpretation for `func`.
    fn interprets_function(&self, func: &B::Function) -> bool;

    /// Whether the model carries an interpretation for `array`.
    fn interprets_array(&self, array: &B::Term) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_print_lowercase() {
        assert_eq!(SatStatus::Unsat.to_string(), "unsat");
        assert_eq!(ScopeKind::Optimizer.to_string(), "optimizer");
    }

    #[test]
    fn sat_result_projections() {
        let sat: SatResult<u8> = SatResult::Sat(3);
        assert_eq!(sat.status(), SatStatus::Sat);
        assert_eq!(sat.map(|m| m + 1).model(), Some(4));
        assert!(SatResult::<u8>::Unknown.model().is_none());
    }
}
