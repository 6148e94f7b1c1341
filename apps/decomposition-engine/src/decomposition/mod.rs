//! Position decomposition core.
//!
//! Pipeline: raw leg records → validation and unit partitioning →
//! per-unit leg store and matcher rounds to a fixed point → report
//! assembly. Everything below the [`DecompositionEngine`] facade is
//! crate-private; embedders see input records, the report, and the
//! observer hook.

mod driver;
mod engine;
mod grouping;
mod leg;
mod matchers;
mod observer;
mod record;
mod report;
mod state;
mod store;

pub use engine::DecompositionEngine;
pub use leg::{LegRecord, OptionType, RejectReason, RejectedLeg};
pub use observer::{MatchObserver, NoOpObserver, TracingObserver};
pub use record::{LegConsumption, MatchRecord, StrategyKind, StrategyLabel};
pub use report::{DecompositionReport, ResidualRow, StrategyRow, UnitFailure};
pub use store::LegId;
