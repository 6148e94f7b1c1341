//! Tracing subscriber setup.
//!
//! The engine itself only emits `tracing` events; installing a
//! subscriber is the embedder's job. This module provides the standard
//! setup used by binaries and integration harnesses.
//!
//! # Example
//!
//! ```ignore
//! decomposition_engine::observability::init_tracing()?;
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors from subscriber installation.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A subscriber was already installed for this process.
    #[error("failed to install tracing subscriber: {message}")]
    Init {
        /// Error message.
        message: String,
    },
}

/// Install the default fmt subscriber with env-filter support.
///
/// Honors `RUST_LOG` when set; defaults to `decomposition_engine=info`
/// otherwise.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("decomposition_engine=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ObservabilityError::Init {
            message: e.to_string(),
        })
}
