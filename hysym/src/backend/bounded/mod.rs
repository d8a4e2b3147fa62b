//! Bounded enumeration backend.
//!
//! Decides satisfiability by exhaustive search over small finite domains:
//! integers in `[-int_bound, int_bound]`, reals on a `1 / real_denominator`
//! grid, both booleans, and universes of `1..=max_universe` opaque values for
//! each uninterpreted sort. Function points and array elements become unknowns
//! only when an assertion actually reads them.
//!
//! `unsat` therefore means "no model within the bounds", and a search that
//! visits more than `node_limit` nodes answers `unknown`. Quantifiers range
//! over the same finite domains.
//!
//! ```
//! use hysym::backend::bounded::BoundedBackend;
//! use hysym::backend::{Backend, SatResult, SolverContext, ScopeKind};
//! use hysym::ops::BinaryOp;
//! use hysym::value::Value;
//!
//! let mut backend = BoundedBackend::new();
//! let int = backend.int_sort();
//! let x = backend.constant("x", &int).unwrap();
//! let three = backend.literal(&Value::from(3)).unwrap();
//! let constraint = backend.binary(BinaryOp::Eq, &x, &three).unwrap();
//!
//! let mut solver = backend.solver(ScopeKind::Solver);
//! solver.add(&constraint).unwrap();
//! assert!(matches!(solver.check().unwrap(), SatResult::Sat(_)));
//! ```
mod model;
mod search;
mod term;

use std::rc::Rc;

use log::{debug, trace};

pub use self::{
    model::BoundedModel,
    term::{BoundedFunction, BoundedSort, BoundedTerm},
};
use self::{
    search::{Direction, Outcome},
    term::{ConstDecl, FuncDecl, TermNode},
};
use super::{Backend, BackendResult, SatResult, ScopeKind, SolverContext};
pub use crate::config::BoundedConfig;
use crate::{
    error::BackendError,
    ops::{BinaryOp, Quantifier, UnaryOp},
    value::Value,
};

/// Native context of the bounded backend: hands out declaration ids.
#[derive(Debug, Default)]
pub struct BoundedBackend {
    config: BoundedConfig,
    next_id: usize,
}

impl BoundedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BoundedConfig) -> Self {
        Self { config, next_id: 0 }
    }

    pub fn config(&self) -> &BoundedConfig {
        &self.config
    }

    fn fresh_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Backend for BoundedBackend {
    type Term = BoundedTerm;
    type Sort = BoundedSort;
    type Function = BoundedFunction;
    type Model = BoundedModel;
    type Solver = BoundedSolver;

    fn int_sort(&mut self) -> BoundedSort {
        BoundedSort::Int
    }

    fn real_sort(&mut self) -> BoundedSort {
        BoundedSort::Real
    }

    fn bool_sort(&mut self) -> BoundedSort {
        BoundedSort::Bool
    }

    fn declare_sort(&mut self, name: &str) -> BackendResult<BoundedSort> {
        if name.is_empty() {
            return Err(BackendError::new("sort names cannot be empty"));
        }
        Ok(BoundedSort::Custom(name.into()))
    }

    fn constant(&mut self, name: &str, sort: &BoundedSort) -> BackendResult<BoundedTerm> {
        let decl = ConstDecl {
            id: self.fresh_id(),
            name: name.to_string(),
            sort: sort.clone(),
        };
        trace!("bounded: declared `{name}` of sort {sort}");
        Ok(BoundedTerm::new(TermNode::Const(Rc::new(decl))))
    }

    fn int_array(&mut self, name: &str) -> BackendResult<BoundedTerm> {
        self.constant(name, &BoundedSort::IntArray)
    }

    fn declare_function(
        &mut self,
        name: &str,
        domain: &[BoundedSort],
        range: &BoundedSort,
    ) -> BackendResult<BoundedFunction> {
        if domain.iter().chain([range]).any(|s| *s == BoundedSort::IntArray) {
            return Err(BackendError::new(format!(
                "function `{name}`: array arguments and results are not supported"
            )));
        }
        Ok(BoundedFunction(Rc::new(FuncDecl {
            id: self.fresh_id(),
            name: name.to_string(),
            domain: domain.to_vec(),
            range: range.clone(),
        })))
    }

    fn literal(&mut self, value: &Value) -> BackendResult<BoundedTerm> {
        Ok(BoundedTerm::new(TermNode::Literal(value.clone())))
    }

    fn unary(&mut self, op: UnaryOp, operand: &BoundedTerm) -> BackendResult<BoundedTerm> {
        Ok(BoundedTerm::new(TermNode::Unary(op, operand.clone())))
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &BoundedTerm,
        rhs: &BoundedTerm,
    ) -> BackendResult<BoundedTerm> {
        Ok(BoundedTerm::new(TermNode::Binary(
            op,
            lhs.clone(),
            rhs.clone(),
        )))
    }

    fn ite(
        &mut self,
        condition: &BoundedTerm,
        then: &BoundedTerm,
        otherwise: &BoundedTerm,
    ) -> BackendResult<BoundedTerm> {
        Ok(BoundedTerm::new(TermNode::Ite(
            condition.clone(),
            then.clone(),
            otherwise.clone(),
        )))
    }

    fn quantifier(
        &mut self,
        kind: Quantifier,
        bound: &[BoundedTerm],
        body: &BoundedTerm,
    ) -> BackendResult<BoundedTerm> {
        let decls = bound
            .iter()
            .map(|term| match term.as_const() {
                Some(decl) if decl.sort != BoundedSort::IntArray => Ok(decl.clone()),
                _ => Err(BackendError::new(format!(
                    "`{term}` cannot be quantified: only scalar constants can be bound"
                ))),
            })
            .collect::<BackendResult<Vec<_>>>()?;
        Ok(BoundedTerm::new(TermNode::Quantifier(
            kind,
            decls,
            body.clone(),
        )))
    }

    fn apply(&mut self, func: &BoundedFunction, args: &[BoundedTerm]) -> BackendResult<BoundedTerm> {
        if args.len() != func.arity() {
            return Err(BackendError::new(format!(
                "function `{}` expects {} argument(s), got {}",
                func.name(),
                func.arity(),
                args.len()
            )));
        }
        Ok(BoundedTerm::new(TermNode::Apply(
            func.0.clone(),
            args.to_vec(),
        )))
    }

    fn select(&mut self, array: &BoundedTerm, index: &BoundedTerm) -> BackendResult<BoundedTerm> {
        match array.as_const() {
            Some(decl) if decl.sort == BoundedSort::IntArray => Ok(BoundedTerm::new(
                TermNode::Select(array.clone(), index.clone()),
            )),
            _ => Err(BackendError::new(format!("`{array}` is not an array"))),
        }
    }

    fn solver(&mut self, kind: ScopeKind) -> BoundedSolver {
        BoundedSolver {
            kind,
            config: self.config.clone(),
            assertions: Vec::new(),
            objectives: Vec::new(),
            checkpoints: Vec::new(),
        }
    }
}

/// Assertion stack of one scope.
#[derive(Debug)]
pub struct BoundedSolver {
    kind: ScopeKind,
    config: BoundedConfig,
    assertions: Vec<BoundedTerm>,
    objectives: Vec<(Direction, BoundedTerm)>,
    /// Lengths of `assertions` and `objectives` at each push.
    checkpoints: Vec<(usize, usize)>,
}

impl BoundedSolver {
    fn objective(&mut self, direction: Direction, term: &BoundedTerm) -> BackendResult<()> {
        if self.kind != ScopeKind::Optimizer {
            return Err(BackendError::new(
                "objectives require an optimizing solver context",
            ));
        }
        self.objectives.push((direction, term.clone()));
        Ok(())
    }
}

impl SolverContext<BoundedBackend> for BoundedSolver {
    fn kind(&self) -> ScopeKind {
        self.kind
    }

    fn add(&mut self, constraint: &BoundedTerm) -> BackendResult<()> {
        trace!("bounded: assert {constraint}");
        self.assertions.push(constraint.clone());
        Ok(())
    }

    fn push(&mut self) {
        self.checkpoints
            .push((self.assertions.len(), self.objectives.len()));
    }

    fn pop(&mut self) -> BackendResult<()> {
        let (assertions, objectives) = self
            .checkpoints
            .pop()
            .ok_or_else(|| BackendError::new("pop without a matching push"))?;
        self.assertions.truncate(assertions);
        self.objectives.truncate(objectives);
        Ok(())
    }

    fn reset(&mut self) {
        self.assertions.clear();
        self.objectives.clear();
        self.checkpoints.clear();
    }

    fn assertions(&self) -> Vec<BoundedTerm> {
        self.assertions.clone()
    }

    fn check(&mut self) -> BackendResult<SatResult<BoundedModel>> {
        debug!(
            "bounded: checking {} assertion(s), {} objective(s)",
            self.assertions.len(),
            self.objectives.len()
        );
        Ok(
            match search::solve(&self.assertions, &self.objectives, &self.config) {
                Outcome::Sat { cells, domains } => SatResult::Sat(BoundedModel::new(cells, domains)),
                Outcome::Unsat => SatResult::Unsat,
                Outcome::Unknown => SatResult::Unknown,
            },
        )
    }

    fn minimize(&mut self, objective: &BoundedTerm) -> BackendResult<()> {
        self.objective(Direction::Minimize, objective)
    }

    fn maximize(&mut self, objective: &BoundedTerm) -> BackendResult<()> {
        self.objective(Direction::Maximize, objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NativeModel;

    fn int_const(backend: &mut BoundedBackend, name: &str) -> BoundedTerm {
        let sort = backend.int_sort();
        backend.constant(name, &sort).unwrap()
    }

    fn lit(backend: &mut BoundedBackend, value: impl Into<Value>) -> BoundedTerm {
        backend.literal(&value.into()).unwrap()
    }

    #[test]
    fn finds_a_model_for_linear_constraints() {
        let mut backend = BoundedBackend::new();
        let x = int_const(&mut backend, "x");
        let y = int_const(&mut backend, "y");
        let three = lit(&mut backend, 3);
        let eq = backend.binary(BinaryOp::Eq, &x, &three).unwrap();
        let gt = backend.binary(BinaryOp::Gt, &x, &y).unwrap();

        let mut solver = backend.solver(ScopeKind::Solver);
        solver.add(&eq).unwrap();
        solver.add(&gt).unwrap();
        let SatResult::Sat(model) = solver.check().unwrap() else {
            panic!("expected a model");
        };
        assert_eq!(model.eval(&x), Some(Value::from(3)));
        let y = model.eval(&y).and_then(|v| v.as_i64()).unwrap();
        assert!(y < 3);
    }

    #[test]
    fn contradictions_are_unsat() {
        let mut backend = BoundedBackend::new();
        let x = int_const(&mut backend, "x");
        let gt = backend.binary(BinaryOp::Gt, &x, &x).unwrap();
        let mut solver = backend.solver(ScopeKind::Solver);
        solver.add(&gt).unwrap();
        assert!(solver.check().unwrap().is_unsat());
    }

    #[test]
    fn push_and_pop_roll_back_assertions() {
        let mut backend = BoundedBackend::new();
        let x = int_const(&mut backend, "x");
        let f = lit(&mut backend, false);
        let mut solver = backend.solver(ScopeKind::Solver);
        solver.push();
        solver.add(&f).unwrap();
        assert!(solver.check().unwrap().is_unsat());
        solver.pop().unwrap();
        assert!(solver.assertions().is_empty());
        assert!(solver.check().unwrap().is_sat());
        assert!(solver.pop().is_err());
        assert!(solver.minimize(&x).is_err());
    }

    #[test]
    fn node_budget_answers_unknown() {
        let mut backend = BoundedBackend::with_config(BoundedConfig {
            node_limit: 3,
            ..BoundedConfig::default()
        });
        let x = int_const(&mut backend, "x");
        let big = lit(&mut backend, 15);
        let eq = backend.binary(BinaryOp::Eq, &x, &big).unwrap();
        let mut solver = backend.solver(ScopeKind::Solver);
        solver.add(&eq).unwrap();
        assert!(solver.check().unwrap().is_unknown());
    }

    #[test]
    fn maximize_picks_the_largest_value() {
        let mut backend = BoundedBackend::with_config(BoundedConfig {
            int_bound: 5,
            ..BoundedConfig::default()
        });
        let x = int_const(&mut backend, "x");
        let four = lit(&mut backend, 4);
        let le = backend.binary(BinaryOp::Le, &x, &four).unwrap();
        let mut solver = backend.solver(ScopeKind::Optimizer);
        solver.add(&le).unwrap();
        solver.maximize(&x).unwrap();
        let model = solver.check().unwrap().model().unwrap();
        assert_eq!(model.eval(&x), Some(Value::from(4)));
    }

    #[test]
    fn quantifiers_only_bind_scalar_constants() {
        let mut backend = BoundedBackend::new();
        let array = backend.int_array("a").unwrap();
        let t = lit(&mut backend, true);
        assert!(backend.quantifier(Quantifier::ForAll, &[array], &t).is_err());
    }
}
