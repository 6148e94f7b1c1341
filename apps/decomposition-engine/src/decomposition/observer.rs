//! Observability hook for match events.
//!
//! The matching algorithm itself contains no logging; the driver
//! reports every emitted match to an observer supplied by the caller.
//! Note that a box spread event overlaps with the synthetic events it
//! absorbed: the event stream describes consumption at match time,
//! while the final report tables partition quantities exactly.

use tracing::debug;

use crate::decomposition::record::MatchRecord;

/// Receives one event per emitted strategy match.
pub trait MatchObserver: Send + Sync {
    /// Called after a matcher consumes quantity and emits a record.
    fn on_match(&self, record: &MatchRecord);
}

/// Default observer: one structured `tracing` debug event per match.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_match(&self, record: &MatchRecord) {
        let legs: Vec<String> = record
            .legs
            .iter()
            .map(|l| format!("{}:{:+}", l.leg_id, l.consumed))
            .collect();
        debug!(
            strategy = %record.label,
            client = %record.client,
            ticker = %record.ticker,
            maturity = %record.maturity,
            quantity = record.quantity,
            legs = ?legs,
            "matched"
        );
    }
}

/// Observer that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl MatchObserver for NoOpObserver {
    fn on_match(&self, _record: &MatchRecord) {}
}
