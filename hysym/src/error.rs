use strum::EnumIs;
use thiserror::Error;

use crate::backend::SatStatus;

/// Failure reported by a backend adapter.
///
/// The front-end never wraps or rewrites these: they surface to the caller
/// unchanged through [`Error::Backend`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// `require` was given something that is not a boolean constraint.
    #[error(
        "`require` expects a boolean constraint or the literal `true`, but was given `{found}` of kind {kind}."
    )]
    InvalidConstraint { found: String, kind: String },

    /// The concrete value of a symbol was read before it was bound to a model.
    #[error("Symbol `{name}` has no concrete value: it was never bound to a model.")]
    UnboundValueAccess { name: String },

    /// Concretization was requested while symbol tracking is disabled.
    #[error("Cannot concretize: concretization was disabled for this session.")]
    ConcretizationDisabled,

    /// A model was requested but the solver did not find one.
    #[error("No model available: the solver answered `{status}`.")]
    NoModel { status: SatStatus },

    /// A host value was requested from an expression that is still symbolic.
    #[error("Expression `{expr}` has no concrete value yet.")]
    NotConcrete { expr: String },

    /// An operator was applied to values of incompatible kinds.
    #[error("Operator `{op}` cannot be applied to {operands}.")]
    TypeMismatch { op: String, operands: String },

    /// Concrete division or remainder by zero.
    #[error("Division by zero in concrete arithmetic.")]
    DivisionByZero,

    /// A function was applied to the wrong number of arguments.
    #[error("Function `{name}` expects {expected} argument(s), but {found} were given.")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Objectives are only accepted by optimizer scopes.
    #[error("Objectives can only be registered in a scope created with `optimizer()`.")]
    OptimizationUnsupported,

    /// `pop` was called without a matching `push` in the active scope.
    #[error("Cannot pop: the active scope has no pending checkpoint.")]
    NoCheckpoint,

    /// A configuration document could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Failure reported by the backend adapter, forwarded unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, Error>;
