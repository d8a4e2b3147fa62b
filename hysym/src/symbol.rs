//! Symbolic leaves and their concretization state.
//!
//! A [`Symbol`] starts *unbound*: it lowers to its native handle and every
//! expression mentioning it stays deferred. Concretization binds it to an
//! [`Assignment`] exactly once; from then on it behaves like the literal the
//! assignment gives it.
use std::{
    cell::OnceCell,
    fmt,
    rc::Rc,
};

use bigdecimal::BigDecimal;
use log::trace;
use num_bigint::BigInt;

use crate::{
    backend::Backend,
    error::{Error, Result},
    model::Assignment,
    ops::BinaryOp,
    value::{Kind, ObjectHandle, Value},
};

/// Where the native handle of a symbol comes from.
pub(crate) enum Origin<B: Backend> {
    /// A declared constant.
    Constant(B::Term),
    /// Element `index` of an integer array.
    Element { array: B::Term, index: BigInt },
}

struct SymbolState<B: Backend> {
    name: Rc<str>,
    kind: Kind,
    origin: Origin<B>,
    precision: i64,
    binding: OnceCell<Assignment<B>>,
    decoded: OnceCell<Value>,
}

/// Leaf of the expression language bound to a backend handle.
///
/// Clones share state: binding one clone binds them all.
pub struct Symbol<B: Backend> {
    state: Rc<SymbolState<B>>,
}

impl<B: Backend> Clone for Symbol<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: Backend> Symbol<B> {
    pub(crate) fn new(name: impl Into<Rc<str>>, kind: Kind, origin: Origin<B>, precision: i64) -> Self {
        Self {
            state: Rc::new(SymbolState {
                name: name.into(),
                kind,
                origin,
                precision,
                binding: OnceCell::new(),
                decoded: OnceCell::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn kind(&self) -> &Kind {
        &self.state.kind
    }

    /// Decimal places kept when decoding a real value.
    pub fn precision(&self) -> i64 {
        self.state.precision
    }

    pub fn is_bound(&self) -> bool {
        self.state.binding.get().is_some()
    }

    /// The assignment this symbol was bound to, if any.
    pub fn assignment(&self) -> Option<&Assignment<B>> {
        self.state.binding.get()
    }

    /// Two handles on the same symbol.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Concrete value of a bound symbol.
    ///
    /// Reals are rounded to [`Symbol::precision`] decimal places. The decoded
    /// value is cached.
    pub fn value(&self) -> Result<Value> {
        if let Some(value) = self.state.decoded.get() {
            return Ok(value.clone());
        }

        let unbound = || Error::UnboundValueAccess {
            name: self.name().to_string(),
        };
        let model = self.state.binding.get().ok_or_else(unbound)?;
        let value = self.project(model).ok_or_else(unbound)?.rounded(self.precision());
        Ok(self.state.decoded.get_or_init(|| value).clone())
    }

    fn typed<T>(&self, accessor: &str, view: impl FnOnce(&Value) -> Option<T>) -> Result<T> {
        let value = self.value()?;
        view(&value).ok_or_else(|| Error::TypeMismatch {
            op: accessor.to_string(),
            operands: format!("`{value}` ({})", value.kind()),
        })
    }

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

    /// Decoded decimal, rounded to [`Symbol::precision`] places.
    pub fn as_decimal(&self) -> Result<BigDecimal> {
        self.typed("as_decimal", Value::as_decimal)
    }

    pub fn as_object(&self) -> Result<ObjectHandle> {
        self.typed("as_object", |v| v.as_object().cloned())
    }

    /// Raw value `model` gives to this symbol.
    pub(crate) fn project(&self, model: &Assignment<B>) -> Option<Value> {
        match &self.state.origin {
            Origin::Constant(term) => model.eval(term),
            Origin::Element { array, index } => model.select(array, &Value::Int(index.clone())),
        }
    }

    /// Bind to `model` if it assigns this symbol. Returns whether a new
    /// binding was made.
    pub(crate) fn bind(&self, model: &Assignment<B>) -> bool {
        if self.is_bound() || self.project(model).is_none() {
            return false;
        }
        trace!("binding `{}`", self.name());
        self.state.binding.set(model.clone()).is_ok()
    }

    /// Native handle, ignoring any binding.
    pub(crate) fn native_term(&self, backend: &mut B) -> Result<B::Term> {
        match &self.state.origin {
            Origin::Constant(term) => Ok(term.clone()),
            Origin::Element { array, index } => {
                let index = backend.literal(&Value::Int(index.clone()))?;
                Ok(backend.select(array, &index)?)
            }
        }
    }

    /// Unrounded value of a bound symbol, as the model gives it.
    pub(crate) fn raw_value(&self) -> Result<Value> {
        self.assignment()
            .and_then(|model| self.project(model))
            .ok_or_else(|| Error::UnboundValueAccess {
                name: self.name().to_string(),
            })
    }

    /// Equality pinning the native handle to the raw bound value.
    pub(crate) fn pin(&self, backend: &mut B) -> Result<B::Term> {
        let value = self.raw_value()?;
        let handle = self.native_term(backend)?;
        let literal = backend.literal(&value)?;
        trace!("pinning `{}` to {value}", self.name());
        Ok(backend.binary(BinaryOp::Eq, &handle, &literal)?)
    }
}

impl<B: Backend> fmt::Display for Symbol<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl<B: Backend> fmt::Debug for Symbol<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name())
            .field("kind", self.kind())
            .field("bound", &self.is_bound())
            .finish()
    }
}
