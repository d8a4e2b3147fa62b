use std::fmt;

use num_bigint::BigInt;

use super::{
    BoundedBackend,
    search::{CellKey, Cells, Domains, Eval, Evaluator},
    term::{BoundedFunction, BoundedSort, BoundedTerm},
};
use crate::{backend::NativeModel, value::Value};

/// Satisfying assignment found by the bounded search.
///
/// Only cells the search had to decide are assigned; every other lookup
/// answers `None`.
#[derive(Debug, Clone)]
pub struct BoundedModel {
    cells: Cells,
    domains: Domains,
}

impl BoundedModel {
    pub(crate) fn new(cells: Cells, domains: Domains) -> Self {
        Self { cells, domains }
    }

    /// Number of assigned cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl NativeModel<BoundedBackend> for BoundedModel {
    fn eval(&self, term: &BoundedTerm) -> Option<Value> {
        match Evaluator::new(&self.cells, &self.domains).eval(term) {
            Eval::Known(value) => Some(value),
            Eval::Need(..) | Eval::Invalid => None,
        }
    }

    fn apply(&self, func: &BoundedFunction, args: &[Value]) -> Option<Value> {
        self.cells
            .get(&CellKey::Apply(func.0.id, args.to_vec()))
            .cloned()
    }

    fn select(&self, array: &BoundedTerm, index: &Value) -> Option<Value> {
        let decl = array.as_const().filter(|d| d.sort == BoundedSort::IntArray)?;
        let index: BigInt = index.as_bigint()?.clone();
        self.cells.get(&CellKey::Select(decl.id, index)).cloned()
    }

    fn interprets_function(&self, func: &BoundedFunction) -> bool {
        self.cells
            .keys()
            .any(|cell| matches!(cell, CellKey::Apply(id, _) if *id == func.0.id))
    }

    fn interprets_array(&self, array: &BoundedTerm) -> bool {
        let Some(decl) = array.as_const() else {
            return false;
        };
        self.cells
            .keys()
            .any(|cell| matches!(cell, CellKey::Select(id, _) if *id == decl.id))
    }
}

impl fmt::Display for BoundedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (cell, value)) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match cell {
                CellKey::Const(id) => write!(f, "#{id}")?,
                CellKey::Apply(id, args) => {
                    write!(f, "#{id}(")?;
                    for (j, arg) in args.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")?;
                }
                CellKey::Select(id, index) => write!(f, "#{id}[{index}]")?,
            }
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}
