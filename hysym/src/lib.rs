//! Symbolic values over a pluggable constraint-solving backend.
//!
//! Build expressions over symbols with ordinary operators, constrain them,
//! then *concretize*: the active scope is solved and every tracked symbol is
//! bound to its value in the model. Expressions built before concretization
//! become concrete once the symbols below them are bound.
//!
//! ```
//! use hysym::prelude::*;
//!
//! # fn main() -> hysym::Result<()> {
//! let mut session = Session::new(BoundedBackend::new());
//! let x = session.int("x")?;
//! let y = session.int("y")?;
//! session.require((&x + &y).equals(10))?;
//! session.require((&x - &y).equals(4))?;
//! session.concretize()?;
//!
//! assert_eq!(x.value()?, Value::from(7));
//! assert_eq!((&x * &y).as_i64()?, 21);
//! # Ok(())
//! # }
//! ```
pub mod array;
pub mod backend;
pub mod config;
pub mod error;
pub mod evaluable;
pub mod expr;
pub mod function;
pub mod model;
pub mod ops;
pub mod scope;
pub mod session;
pub mod sort;
pub mod symbol;
pub mod value;

pub use error::{Error, Result};
pub use session::{ScopeGuard, Session};

pub mod prelude {
    pub use crate::{
        array::SymbolicArray,
        backend::{
            Backend, SatResult, SatStatus, ScopeKind,
            bounded::{BoundedBackend, BoundedConfig},
        },
        config::SessionConfig,
        error::Error,
        evaluable::Evaluable,
        expr::{
            Expr,
            func::{all, any, exists, forall, iff, implies, ite, neg, xor},
            ops::Operand,
            pretty::PrettyExpr,
        },
        function::Function,
        model::Assignment,
        scope::Objective,
        session::{ScopeGuard, Session},
        sort::Sort,
        symbol::Symbol,
        value::{Kind, ObjectHandle, Value},
    };
}
