//! Dispatch Configuration
//!
//! Policy knobs for specificity ranking and method combination. Loaded from
//! TOML, e.g.
//!
//! ```toml
//! primitive-specificity = "exact"
//! after-order = "least-specific-first"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a generic function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DispatchConfig {
    /// How an exact primitive-kind match ranks.
    pub primitive_specificity: PrimitiveSpecificity,

    /// Order in which applicable after methods run.
    pub after_order: AfterOrder,
}

/// Ranking policy for primitive-kind matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveSpecificity {
    /// Rank like a wildcard.
    #[default]
    LeastSpecific,
    /// Rank like an exact nominal match (depth 0).
    Exact,
}

/// After-method ordering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AfterOrder {
    /// Least specific first, equal scores in registration order.
    #[default]
    LeastSpecificFirst,
    /// Same order as the before methods.
    MostSpecificFirst,
}

impl DispatchConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
