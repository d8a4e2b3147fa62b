//! Integer-indexed symbolic arrays.
use std::{
    cell::{OnceCell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::Rc,
};

use log::trace;
use num_bigint::BigInt;

use crate::{
    backend::Backend,
    expr::{Expr, ExprNode},
    model::Assignment,
    symbol::{Origin, Symbol},
    value::{Kind, Value},
};

struct ArrayState<B: Backend> {
    name: Rc<str>,
    native: B::Term,
    precision: i64,
    elements: RefCell<BTreeMap<BigInt, Symbol<B>>>,
    binding: OnceCell<Assignment<B>>,
}

/// Symbolic `Int -> Int` array.
///
/// Elements read at host indices are exposed as element symbols, cached per
/// index so that every `at(i)` for the same `i` returns the same symbol.
/// Concretizing the array binds every element symbol handed out so far.
pub struct SymbolicArray<B: Backend> {
    state: Rc<ArrayState<B>>,
}

impl<B: Backend> Clone for SymbolicArray<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: Backend> SymbolicArray<B> {
    pub(crate) fn new(name: impl Into<Rc<str>>, native: B::Term, precision: i64) -> Self {
        Self {
            state: Rc::new(ArrayState {
                name: name.into(),
                native,
                precision,
                elements: RefCell::new(BTreeMap::new()),
                binding: OnceCell::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn native(&self) -> &B::Term {
        &self.state.native
    }

    pub fn is_bound(&self) -> bool {
        self.state.binding.get().is_some()
    }

    /// Element symbol at a host index.
    pub fn at(&self, index: impl Into<BigInt>) -> Symbol<B> {
        let index = index.into();
        if let Some(element) = self.state.elements.borrow().get(&index) {
            return element.clone();
        }

        let element = Symbol::new(
            format!("{}[{index}]", self.name()),
            Kind::Int,
            Origin::Element {
                array: self.state.native.clone(),
                index: index.clone(),
            },
            self.state.precision,
        );
        if let Some(model) = self.state.binding.get() {
            element.bind(model);
        }
        self.state
            .elements
            .borrow_mut()
            .insert(index, element.clone());
        element
    }

    /// Element at an arbitrary index expression.
    ///
    /// Concrete integer indices go through [`SymbolicArray::at`]; anything
    /// else builds a deferred selection.
    pub fn select(&self, index: impl Into<Expr<B>>) -> Expr<B> {
        let index = index.into();
        if index.has_concrete_value() {
            if let Ok(Value::Int(i)) = index.concrete_value() {
                return self.at(i).into();
            }
        }
        Expr::from_node(ExprNode::Select {
            array: self.clone(),
            index,
        })
    }

    /// Number of element symbols handed out so far.
    pub fn accessed(&self) -> usize {
        self.state.elements.borrow().len()
    }

    /// Bind the array and its element symbols to `model`.
    ///
    /// Returns the newly bound elements, or `None` when `model` has no
    /// interpretation for the array.
    pub(crate) fn bind(&self, model: &Assignment<B>) -> Option<Vec<Symbol<B>>> {
        if self.is_bound() || !model.interprets_array(self.native()) {
            return None;
        }
        self.state.binding.set(model.clone()).ok()?;
        let bound: Vec<_> = self
            .state
            .elements
            .borrow()
            .values()
            .filter(|element| element.bind(model))
            .cloned()
            .collect();
        trace!("binding array `{}` ({} element(s))", self.name(), bound.len());
        Some(bound)
    }
}

impl<B: Backend> fmt::Debug for SymbolicArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolicArray")
            .field("name", &self.name())
            .field("accessed", &self.accessed())
            .field("bound", &self.is_bound())
            .finish()
    }
}
