//! Internal consistency errors.
//!
//! Every variant here signals a programming-level defect, not bad
//! input data. Invalid input records never raise an error; they are
//! diverted to the rejected-leg table instead.

use thiserror::Error;

use crate::decomposition::LegId;

/// Errors raised by the decomposition engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A matcher attempted to consume more than a leg's remaining
    /// quantity. Breaks the conservation invariant and must never be
    /// recovered from silently.
    #[error("quantity violation on leg {leg_id}: requested {requested}, remaining {remaining}")]
    QuantityViolation {
        /// Leg whose quantity was over-consumed.
        leg_id: LegId,
        /// Requested consumption amount (absolute).
        requested: i64,
        /// Remaining signed quantity at the time of the attempt.
        remaining: i64,
    },

    /// The box matcher attempted to absorb more quantity than a
    /// pending synthetic match still holds.
    #[error("synthetic pool violation: requested {requested}, remaining {remaining}")]
    SyntheticPoolViolation {
        /// Requested absorption amount.
        requested: i64,
        /// Remaining pool quantity.
        remaining: i64,
    },

    /// The driver exceeded its round cap without converging. Can only
    /// happen if a matcher violates the quantity-strictly-decreases
    /// contract; the affected unit's results are discarded.
    #[error("round cap exceeded for {client}/{ticker}: {rounds} rounds (cap {cap})")]
    RoundCapExceeded {
        /// Client whose unit failed to converge.
        client: String,
        /// Ticker whose unit failed to converge.
        ticker: String,
        /// Rounds executed before giving up.
        rounds: usize,
        /// The computed round cap.
        cap: usize,
    },

    /// Post-convergence audit found a leg whose consumption plus
    /// residual does not reproduce its original quantity.
    #[error(
        "conservation violation on leg {leg_id}: original {original} != consumed {consumed} + residual {residual}"
    )]
    ConservationViolation {
        /// Leg that failed the audit.
        leg_id: LegId,
        /// Original signed quantity.
        original: i64,
        /// Total signed consumption across all match records.
        consumed: i64,
        /// Residual signed quantity.
        residual: i64,
    },
}
