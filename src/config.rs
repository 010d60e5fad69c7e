//! Configuration for the context assembly core.
//!
//! Split the way `wintermute`'s own config is split: small,
//! serde-deserializable structs with `#[serde(default)]` fallbacks, loaded
//! from a TOML file with a hard-coded default when the file is absent.

use std::path::Path;

use serde::Deserialize;

/// Top-level configuration for the bus, budget, and provider shares.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    /// Event bus tuning.
    pub bus: BusConfig,
    /// Token budget tuning.
    pub budget: BudgetConfig,
    /// Provider budget shares.
    pub shares: SharesConfig,
}

impl CoreConfig {
    /// Load configuration from a TOML file, falling back to
    /// [`CoreConfig::default`] when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Event bus tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Per-topic bounded queue capacity. Clamped to a minimum of 1 by
    /// [`crate::bus::Bus`].
    pub queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            queue_capacity: crate::bus::DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Token budget tuning, feeding [`crate::token::context_budget`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Explicit token budget override. `0` (or negative) means "derive the
    /// budget from the model's context window and `ratio`".
    pub explicit_tokens: i64,
    /// Fraction of the model's context window usable for context parts.
    /// Replaced by the default (0.7) when `<= 0.0` or `> 1.0`.
    pub ratio: f32,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            explicit_tokens: 0,
            ratio: crate::token::DEFAULT_RATIO,
        }
    }
}

/// Default budget shares for the four built-in providers, handed to
/// [`crate::registry::Registry::register`] by the caller that wires up a
/// [`crate::manager::ContextManager`]. Sums to `1.0`, but the registry
/// normalizes shares at assembly time regardless.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SharesConfig {
    /// Share for the chat provider.
    pub chat: f64,
    /// Share for the project provider.
    pub project: f64,
    /// Share for the files provider.
    pub files: f64,
    /// Share for the todo provider.
    pub todo: f64,
}

impl Default for SharesConfig {
    fn default() -> Self {
        Self {
            chat: 0.4,
            project: 0.2,
            files: 0.3,
            todo: 0.1,
        }
    }
}
