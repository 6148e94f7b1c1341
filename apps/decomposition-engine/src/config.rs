//! Configuration for the decomposition engine.
//!
//! All knobs have conservative defaults; `EngineConfig::default()` is
//! valid as-is. Configuration is validated once at engine construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Round cap factor must be at least 1.
    #[error("round cap factor must be >= 1, got {value}")]
    InvalidRoundCapFactor {
        /// Rejected value.
        value: usize,
    },

    /// Thread pool initialization failed.
    #[error("failed to initialize thread pool: {message}")]
    ThreadPool {
        /// Error message.
        message: String,
    },
}

/// Configuration for parallel unit processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Maximum number of threads to use (0 = use all available).
    pub max_threads: usize,

    /// Minimum parallelization threshold (unit counts below this run
    /// sequentially).
    pub min_parallel_units: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_units: 4,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Multiplier for the driver round cap. The cap for a unit is
    /// `legs * matchers * round_cap_factor`; converging runs stay far
    /// below it.
    pub round_cap_factor: usize,

    /// Parallel processing settings.
    pub parallel: ParallelConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_cap_factor: 4,
            parallel: ParallelConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any knob is outside its accepted range.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap_factor == 0 {
            return Err(ConfigError::InvalidRoundCapFactor { value: 0 });
        }
        Ok(())
    }
}

/// Configure the global rayon thread pool from a [`ParallelConfig`].
///
/// Call at most once per process, before the first decomposition run.
/// With `max_threads == 0` the pool is left at its default size.
///
/// # Errors
///
/// Returns an error if the global pool was already initialized.
pub fn configure_thread_pool(config: &ParallelConfig) -> Result<(), ConfigError> {
    if config.max_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_threads)
            .build_global()
            .map_err(|e| ConfigError::ThreadPool {
                message: e.to_string(),
            })?;
    }
    Ok(())
}
