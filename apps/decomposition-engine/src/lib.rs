// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Decomposition Engine - Rust Core Library
//!
//! Deterministic position decomposition engine for options portfolios.
//!
//! Given a snapshot of held option legs (one record per leg: client,
//! ticker, maturity, strike, option type, signed quantity, underlying
//! price), the engine identifies which subsets of legs jointly form
//! recognized multi-leg strategies:
//!
//! - Straddles and strangles
//! - Synthetic long/short positions
//! - Box spreads (composed from offsetting synthetics)
//! - Risk reversals
//! - Call and put vertical spreads
//! - Calendar spreads
//! - Iron condors
//!
//! Leg quantities are partially consumable: a single leg can
//! participate in several strategies across multiple matching rounds.
//! The engine guarantees two invariants regardless of match order:
//!
//! - **Conservation**: for every leg, original quantity equals the sum
//!   of signed match consumption plus the residual quantity.
//! - **Determinism**: identical input yields byte-identical output,
//!   enforced by a fixed matcher priority order and an explicit
//!   ascending-strike tie-break before every scan.
//!
//! Whatever quantity cannot be classified is reported as residual
//! (naked) position. Pricing, feed ingestion, and any CLI surface are
//! external to this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Engine configuration and thread pool setup.
pub mod config;

/// Core decomposition machinery: leg store, grouping, matchers, driver,
/// and report assembly.
pub mod decomposition;

/// Internal consistency error types.
pub mod error;

/// Tracing subscriber setup for embedders.
pub mod observability;

pub use config::{ConfigError, EngineConfig, ParallelConfig, configure_thread_pool};
pub use decomposition::{
    DecompositionEngine, DecompositionReport, LegConsumption, LegId, LegRecord, MatchObserver,
    MatchRecord, NoOpObserver, OptionType, RejectReason, RejectedLeg, ResidualRow, StrategyKind,
    StrategyLabel, StrategyRow, TracingObserver, UnitFailure,
};
pub use error::EngineError;
