//! Session and backend settings.
//!
//! Both structs are plain data with sensible defaults. With the `serde`
//! feature they can be loaded from TOML documents such as:
//!
//! ```toml
//! real_precision = 4
//! track_symbols = true
//! ```
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::{Error, Result};

/// Default number of decimal places kept when decoding real values.
pub const DEFAULT_REAL_PRECISION: i64 = 6;

/// Front-end settings of a [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Decimal places kept when decoding real symbols, unless a symbol
    /// overrides it.
    pub real_precision: i64,
    /// Whether new symbols are tracked for concretization when the session
    /// starts.
    pub track_symbols: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            real_precision: DEFAULT_REAL_PRECISION,
            track_symbols: true,
        }
    }
}

/// Search bounds of the [`crate::backend::bounded::BoundedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundedConfig {
    /// Integers range over `[-int_bound, int_bound]`.
    pub int_bound: i64,
    /// Reals range over multiples of `1 / real_denominator` within the
    /// integer bounds. Denominators made of factors 2 and 5 keep the grid exact.
    pub real_denominator: u32,
    /// Largest universe tried for uninterpreted sorts.
    pub max_universe: usize,
    /// Search nodes visited before answering `unknown`.
    pub node_limit: usize,
}

impl Default for BoundedConfig {
    fn default() -> Self {
        Self {
            int_bound: 16,
            real_denominator: 2,
            max_universe: 4,
            node_limit: 2_000_000,
        }
    }
}

#[cfg(feature = "serde")]
fn from_toml<T: serde::de::DeserializeOwned>(source: &str) -> Result<T> {
    toml::from_str(source).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
    })
}

#[cfg(feature = "serde")]
impl SessionConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        from_toml(source)
    }
}

#[cfg(feature = "serde")]
impl BoundedConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        from_toml(source)
    }
}
