//! Lazy three-valued evaluation and depth-first model search.
//!
//! Unknowns are *cells*: constants, function points `f(v1, .., vn)` and array
//! elements `a[i]`. Evaluating an assertion under a partial assignment either
//! yields a value, reports the first unassigned cell it needs, or fails
//! (type errors, division by zero). The search branches on the needed cell,
//! so only cells that actually influence the assertions are ever enumerated.
//! Conjunction, disjunction, implication and quantifiers short-circuit, which
//! prunes whole subtrees as soon as one conjunct is decided false.
use std::{cmp::Ordering, collections::BTreeMap, rc::Rc};

use bigdecimal::BigDecimal;
use log::{debug, info, trace};
use num_bigint::BigInt;

use super::term::{BoundedSort, BoundedTerm, ConstDecl, TermNode};
use crate::{
    config::BoundedConfig,
    ops::{self, BinaryOp, Quantifier},
    value::{ObjectHandle, Value},
};

/// An unknown of the search.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum CellKey {
    Const(usize),
    Apply(usize, Vec<Value>),
    Select(usize, BigInt),
}

pub(crate) type Cells = BTreeMap<CellKey, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Minimize,
    Maximize,
}

/// Finite value domains for one search round.
#[derive(Debug, Clone)]
pub(crate) struct Domains {
    int_bound: i64,
    real_denominator: u32,
    universe: usize,
}

impl Domains {
    pub(crate) fn new(config: &BoundedConfig, universe: usize) -> Self {
        Self {
            int_bound: config.int_bound.max(0),
            real_denominator: config.real_denominator.max(1),
            universe,
        }
    }

    /// Grid points on each side of zero in the real domain.
    fn real_steps(&self) -> i64 {
        self.int_bound
            .saturating_mul(i64::from(self.real_denominator))
    }

    /// Candidate values of `sort`, smallest magnitude first. `None` for arrays.
    pub(crate) fn values(&self, sort: &BoundedSort) -> Option<Vec<Value>> {
        let values = match sort {
            BoundedSort::Bool => vec![Value::Bool(false), Value::Bool(true)],
            BoundedSort::Int => centered(self.int_bound).map(Value::from).collect(),
            BoundedSort::Real => {
                let denominator = BigDecimal::from(self.real_denominator);
                centered(self.real_steps())
                    .map(|k| Value::Real(BigDecimal::from(k) / &denominator))
                    .collect()
            }
            BoundedSort::Custom(name) => (0..self.universe)
                .map(|i| Value::Object(ObjectHandle::new(name.clone(), format!("{name}!val!{i}"))))
                .collect(),
            BoundedSort::IntArray => return None,
        };
        Some(values)
    }
}

/// `0, 1, -1, 2, -2, .., bound, -bound`
fn centered(bound: i64) -> impl Iterator<Item = i64> {
    std::iter::once(0).chain((1..=bound).flat_map(|k| [k, -k]))
}

/// Outcome of evaluating a term under a partial assignment.
#[derive(Debug)]
pub(crate) enum Eval {
    Known(Value),
    Need(CellKey, BoundedSort),
    Invalid,
}

impl Eval {
    fn from_result(result: crate::error::Result<Value>) -> Self {
        result.map_or(Eval::Invalid, Eval::Known)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn short_circuit(op: BinaryOp, side: Side, operand: &Eval) -> Option<bool> {
    let Eval::Known(Value::Bool(b)) = operand else {
        return None;
    };
    match (op, side, *b) {
        (BinaryOp::And, _, false) => Some(false),
        (BinaryOp::Or, _, true) => Some(true),
        (BinaryOp::Implies, Side::Left, false) => Some(true),
        (BinaryOp::Implies, Side::Right, true) => Some(true),
        _ => None,
    }
}

pub(crate) struct Evaluator<'a> {
    cells: &'a Cells,
    domains: &'a Domains,
    locals: Vec<(usize, Value)>,
    pub(crate) used_custom: bool,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(cells: &'a Cells, domains: &'a Domains) -> Self {
        Self {
            cells,
            domains,
            locals: Vec::new(),
            used_custom: false,
        }
    }

    fn lookup(&self, cell: CellKey, sort: &BoundedSort) -> Eval {
        match self.cells.get(&cell) {
            Some(value) => Eval::Known(value.clone()),
            None => Eval::Need(cell, sort.clone()),
        }
    }

    pub(crate) fn eval(&mut self, term: &BoundedTerm) -> Eval {
        match term.node() {
            TermNode::Const(decl) => {
                if let Some((_, value)) = self.locals.iter().rev().find(|(id, _)| *id == decl.id)
                {
                    return Eval::Known(value.clone());
                }
                if decl.sort == BoundedSort::IntArray {
                    return Eval::Invalid;
                }
                self.lookup(CellKey::Const(decl.id), &decl.sort)
            }
            TermNode::Literal(value) => Eval::Known(value.clone()),
            TermNode::Unary(op, operand) => match self.eval(operand) {
                Eval::Known(value) => Eval::from_result(ops::apply_unary(*op, &value)),
                other => other,
            },
            TermNode::Binary(op, lhs, rhs) => self.binary(*op, lhs, rhs),
            TermNode::Ite(condition, then, otherwise) => match self.eval(condition) {
                Eval::Known(Value::Bool(true)) => self.eval(then),
                Eval::Known(Value::Bool(false)) => self.eval(otherwise),
                Eval::Known(_) => Eval::Invalid,
                other => other,
            },
            TermNode::Quantifier(kind, bound, body) => self.quantifier(*kind, bound, body),
            TermNode::Apply(func, args) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    match self.eval(arg) {
                        Eval::Known(value) => values.push(value),
                        other => return other,
                    }
                }
                self.lookup(CellKey::Apply(func.id, values), &func.range)
            }
            TermNode::Select(array, index) => {
                let Some(decl) = array.as_const().filter(|d| d.sort == BoundedSort::IntArray)
                else {
                    return Eval::Invalid;
                };
                match self.eval(index) {
                    Eval::Known(Value::Int(i)) => {
                        self.lookup(CellKey::Select(decl.id, i), &BoundedSort::Int)
                    }
                    Eval::Known(_) => Eval::Invalid,
                    other => other,
                }
            }
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &BoundedTerm, rhs: &BoundedTerm) -> Eval {
        let lhs = self.eval(lhs);
        if let Some(b) = short_circuit(op, Side::Left, &lhs) {
            return Eval::Known(Value::Bool(b));
        }
        let rhs = self.eval(rhs);
        if let Some(b) = short_circuit(op, Side::Right, &rhs) {
            return Eval::Known(Value::Bool(b));
        }
        match (lhs, rhs) {
            (Eval::Known(l), Eval::Known(r)) => Eval::from_result(ops::apply_binary(op, &l, &r)),
            (need @ Eval::Need(..), _) | (_, need @ Eval::Need(..)) => need,
            _ => Eval::Invalid,
        }
    }

    /// Instances whose body fails to evaluate count as false.
    fn quantifier(&mut self, kind: Quantifier, bound: &[Rc<ConstDecl>], body: &BoundedTerm) -> Eval {
        let mut domains = Vec::with_capacity(bound.len());
        for decl in bound {
            if matches!(decl.sort, BoundedSort::Custom(_)) {
                self.used_custom = true;
            }
            match self.domains.values(&decl.sort) {
                Some(values) => domains.push(values),
                None => return Eval::Invalid,
            }
        }

        let vacuous = Eval::Known(Value::Bool(kind.is_for_all()));
        if domains.iter().any(Vec::is_empty) {
            return vacuous;
        }

        let base = self.locals.len();
        let mut cursor = vec![0usize; bound.len()];
        let outcome = loop {
            self.locals.truncate(base);
            for ((decl, values), &i) in bound.iter().zip(&domains).zip(&cursor) {
                self.locals.push((decl.id, values[i].clone()));
            }

            match (kind, self.eval(body)) {
                (_, need @ Eval::Need(..)) => break need,
                (Quantifier::ForAll, Eval::Known(Value::Bool(true))) => {}
                (Quantifier::ForAll, _) => break Eval::Known(Value::Bool(false)),
                (Quantifier::Exists, Eval::Known(Value::Bool(true))) => {
                    break Eval::Known(Value::Bool(true));
                }
                (Quantifier::Exists, _) => {}
            }

            if !advance(&mut cursor, &domains) {
                break Eval::Known(Value::Bool(kind.is_for_all()));
            }
        };
        self.locals.truncate(base);
        outcome
    }
}

/// Odometer step over the cartesian product. Returns `false` once wrapped.
fn advance(cursor: &mut [usize], domains: &[Vec<Value>]) -> bool {
    for (slot, domain) in cursor.iter_mut().zip(domains).rev() {
        *slot += 1;
        if *slot < domain.len() {
            return true;
        }
        *slot = 0;
    }
    false
}

enum Decision {
    Conflict,
    Complete,
    Branch(CellKey, BoundedSort),
}

enum Step {
    Found,
    Fail,
    Exhausted,
}

/// Answer of [`solve`].
#[derive(Debug)]
pub(crate) enum Outcome {
    Sat { cells: Cells, domains: Domains },
    Unsat,
    Unknown,
}

struct Search<'a> {
    assertions: &'a [BoundedTerm],
    objectives: &'a [(Direction, BoundedTerm)],
    domains: Domains,
    cells: Cells,
    nodes: usize,
    node_limit: usize,
    used_custom: bool,
    best: Option<(Vec<Value>, Cells)>,
}

impl<'a> Search<'a> {
    fn decide(&mut self) -> Decision {
        let mut evaluator = Evaluator::new(&self.cells, &self.domains);
        let mut decision = Decision::Complete;
        for assertion in self.assertions {
            match evaluator.eval(assertion) {
                Eval::Known(Value::Bool(true)) => {}
                Eval::Need(cell, sort) => {
                    decision = Decision::Branch(cell, sort);
                    break;
                }
                _ => {
                    decision = Decision::Conflict;
                    break;
                }
            }
        }
        if matches!(decision, Decision::Complete) {
            for (_, objective) in self.objectives {
                match evaluator.eval(objective) {
                    Eval::Known(_) => {}
                    Eval::Need(cell, sort) => {
                        decision = Decision::Branch(cell, sort);
                        break;
                    }
                    Eval::Invalid => {
                        decision = Decision::Conflict;
                        break;
                    }
                }
            }
        }
        self.used_custom |= evaluator.used_custom;
        decision
    }

    fn dfs(&mut self) -> Step {
        self.nodes += 1;
        if self.nodes > self.node_limit {
            return Step::Exhausted;
        }

        let (cell, sort) = match self.decide() {
            Decision::Conflict => return Step::Fail,
            Decision::Complete => return self.complete(),
            Decision::Branch(cell, sort) => (cell, sort),
        };
        if matches!(sort, BoundedSort::Custom(_)) {
            self.used_custom = true;
        }
        let Some(domain) = self.domains.values(&sort) else {
            return Step::Fail;
        };

        for value in domain {
            self.cells.insert(cell.clone(), value);
            match self.dfs() {
                Step::Fail => {}
                step => return step,
            }
        }
        self.cells.remove(&cell);
        Step::Fail
    }

    /// Every assertion holds under the current cells.
    fn complete(&mut self) -> Step {
        if self.objectives.is_empty() {
            return Step::Found;
        }

        let mut evaluator = Evaluator::new(&self.cells, &self.domains);
        let mut scores = Vec::with_capacity(self.objectives.len());
        for (_, objective) in self.objectives {
            match evaluator.eval(objective) {
                Eval::Known(value) => scores.push(value),
                _ => return Step::Fail,
            }
        }

        if self.improves(&scores) {
            trace!("bounded: new best objective values {scores:?}");
            self.best = Some((scores, self.cells.clone()));
        }
        // Keep enumerating: optimization needs every model.
        Step::Fail
    }

    fn improves(&self, scores: &[Value]) -> bool {
        let Some((best, _)) = &self.best else {
            return true;
        };
        for ((direction, _), (candidate, incumbent)) in
            self.objectives.iter().zip(scores.iter().zip(best))
        {
            match ops::compare(BinaryOp::Lt, candidate, incumbent) {
                Ok(Ordering::Less) => return *direction == Direction::Minimize,
                Ok(Ordering::Greater) => return *direction == Direction::Maximize,
                Ok(Ordering::Equal) => {}
                Err(_) => return false,
            }
        }
        false
    }
}

/// Search for a model of `assertions`, optimizing `objectives` in order.
///
/// Uninterpreted sorts are tried with universes of growing size; the first
/// size admitting a model wins. Sizes beyond one are only tried when the
/// search actually touched an uninterpreted sort.
pub(crate) fn solve(
    assertions: &[BoundedTerm],
    objectives: &[(Direction, BoundedTerm)],
    config: &BoundedConfig,
) -> Outcome {
    let mut nodes = 0;
    for universe in 1..=config.max_universe.max(1) {
        let mut search = Search {
            assertions,
            objectives,
            domains: Domains::new(config, universe),
            cells: Cells::new(),
            nodes,
            node_limit: config.node_limit,
            used_custom: false,
            best: None,
        };

        let step = search.dfs();
        nodes = search.nodes;
        match step {
            Step::Found => {
                debug!("bounded: model found (universe {universe}, {nodes} nodes)");
                return Outcome::Sat {
                    cells: search.cells,
                    domains: search.domains,
                };
            }
            Step::Exhausted => {
                info!(
                    "bounded: node budget of {} exhausted, answering unknown",
                    config.node_limit
                );
                return Outcome::Unknown;
            }
            Step::Fail => {
                if let Some((scores, cells)) = search.best.take() {
                    debug!(
                        "bounded: optimum {scores:?} found (universe {universe}, {nodes} nodes)"
                    );
                    return Outcome::Sat {
                        cells,
                        domains: search.domains,
                    };
                }
            }
        }

        if !search.used_custom {
            break;
        }
    }

    debug!("bounded: no model within bounds ({nodes} nodes)");
    Outcome::Unsat
}
