//! Mutable matching state for one (client, ticker) unit.
//!
//! Wraps the leg store together with the append-only match list and
//! the pending synthetic pool. Matchers read candidates through
//! [`GroupState::candidates`] and mutate quantities only through
//! [`GroupState::consume`].

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decomposition::leg::{LegRecord, OptionType};
use crate::decomposition::observer::MatchObserver;
use crate::decomposition::record::{MatchRecord, StrategyLabel};
use crate::decomposition::store::{LegId, LegStore};
use crate::error::EngineError;

/// Copyable snapshot of one candidate leg, taken at scan time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) id: LegId,
    pub(crate) strike: Decimal,
    pub(crate) option_type: OptionType,
    pub(crate) maturity: NaiveDate,
    /// Remaining signed quantity; never zero for a candidate.
    pub(crate) remaining: i64,
    pub(crate) underlying_price: Decimal,
}

impl Candidate {
    pub(crate) const fn is_long(&self) -> bool {
        self.remaining > 0
    }

    pub(crate) const fn abs_remaining(&self) -> i64 {
        self.remaining.abs()
    }
}

/// A synthetic match that box spreads may still absorb. Finalized as a
/// synthetic record only for whatever quantity no box claims.
#[derive(Debug, Clone)]
pub(crate) struct PendingSynthetic {
    pub(crate) record: MatchRecord,
    pub(crate) strike: Decimal,
    pub(crate) remaining: i64,
}

/// Matching state for one unit.
pub(crate) struct GroupState {
    client: String,
    ticker: String,
    store: LegStore,
    matches: Vec<MatchRecord>,
    pending_synthetics: Vec<PendingSynthetic>,
    observer: Arc<dyn MatchObserver>,
}

impl GroupState {
    pub(crate) fn new(
        client: impl Into<String>,
        ticker: impl Into<String>,
        records: &[LegRecord],
        observer: Arc<dyn MatchObserver>,
    ) -> Self {
        let mut store = LegStore::new();
        for record in records {
            store.insert(record);
        }
        Self {
            client: client.into(),
            ticker: ticker.into(),
            store,
            matches: Vec::new(),
            pending_synthetics: Vec::new(),
            observer,
        }
    }

    pub(crate) fn client(&self) -> &str {
        &self.client
    }

    pub(crate) fn ticker(&self) -> &str {
        &self.ticker
    }

    pub(crate) fn leg_count(&self) -> usize {
        self.store.len()
    }

    /// Distinct maturities present in the unit, ascending.
    pub(crate) fn maturities(&self) -> Vec<NaiveDate> {
        let mut out: Vec<NaiveDate> = self.store.iter().map(|l| l.maturity()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Unexhausted legs, optionally scoped to one maturity, sorted by
    /// ascending strike then ascending leg id. This ordering is the
    /// tie-break rule for every matcher scan.
    pub(crate) fn candidates(&self, maturity: Option<NaiveDate>) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self
            .store
            .iter()
            .filter(|leg| !leg.is_exhausted())
            .filter(|leg| maturity.is_none_or(|m| leg.maturity() == m))
            .map(|leg| Candidate {
                id: leg.id(),
                strike: leg.strike(),
                option_type: leg.option_type(),
                maturity: leg.maturity(),
                remaining: leg.remaining(),
                underlying_price: leg.underlying_price(),
            })
            .collect();
        out.sort_by(|a, b| a.strike.cmp(&b.strike).then(a.id.cmp(&b.id)));
        out
    }

    /// Consume quantity from a leg, toward zero.
    pub(crate) fn consume(&mut self, id: LegId, amount: i64) -> Result<(), EngineError> {
        self.store.consume(id, amount)
    }

    /// Record a finalized match.
    pub(crate) fn push_match(&mut self, record: MatchRecord) {
        self.observer.on_match(&record);
        self.matches.push(record);
    }

    /// Record a synthetic match into the pending pool.
    pub(crate) fn push_pending_synthetic(&mut self, record: MatchRecord, strike: Decimal) {
        self.observer.on_match(&record);
        let remaining = record.quantity;
        self.pending_synthetics.push(PendingSynthetic {
            record,
            strike,
            remaining,
        });
    }

    pub(crate) fn pending_synthetics(&self) -> &[PendingSynthetic] {
        &self.pending_synthetics
    }

    /// Absorb quantity from a pending synthetic (box matching).
    pub(crate) fn consume_pending(&mut self, index: usize, amount: i64) -> Result<(), EngineError> {
        let pending = &mut self.pending_synthetics[index];
        if amount <= 0 || amount > pending.remaining {
            return Err(EngineError::SyntheticPoolViolation {
                requested: amount,
                remaining: pending.remaining,
            });
        }
        pending.remaining -= amount;
        Ok(())
    }

    /// Finalize pool remainders as synthetic records, scaled down to
    /// whatever quantity no box spread absorbed.
    pub(crate) fn finalize_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending_synthetics);
        for entry in pending {
            if entry.remaining == 0 {
                continue;
            }
            let mut record = entry.record;
            record.quantity = entry.remaining;
            for leg in &mut record.legs {
                leg.consumed = entry.remaining * leg.consumed.signum();
            }
            self.matches.push(record);
        }
    }

    pub(crate) fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub(crate) fn into_matches(self) -> Vec<MatchRecord> {
        self.matches
    }

    /// Legs with nonzero remaining quantity, in leg id order, as
    /// (id, residual signed quantity) pairs with snapshot attributes.
    pub(crate) fn residuals(&self) -> Vec<ResidualLeg> {
        self.store
            .iter()
            .filter(|leg| !leg.is_exhausted())
            .map(|leg| ResidualLeg {
                maturity: leg.maturity(),
                strike: leg.strike(),
                option_type: leg.option_type(),
                quantity: leg.remaining(),
            })
            .collect()
    }

    /// Audit the conservation law: for every leg, original quantity
    /// equals total signed consumption plus residual. Must be called
    /// after [`Self::finalize_pending`].
    pub(crate) fn verify_conservation(&self) -> Result<(), EngineError> {
        for leg in self.store.iter() {
            let consumed: i64 = self
                .matches
                .iter()
                .flat_map(|m| &m.legs)
                .filter(|c| c.leg_id == leg.id())
                .map(|c| c.consumed)
                .sum();
            if leg.original_quantity() != consumed + leg.remaining() {
                return Err(EngineError::ConservationViolation {
                    leg_id: leg.id(),
                    original: leg.original_quantity(),
                    consumed,
                    residual: leg.remaining(),
                });
            }
        }
        Ok(())
    }
}

/// Snapshot of one unexhausted leg after convergence.
#[derive(Debug, Clone)]
pub(crate) struct ResidualLeg {
    pub(crate) maturity: NaiveDate,
    pub(crate) strike: Decimal,
    pub(crate) option_type: OptionType,
    pub(crate) quantity: i64,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::decomposition::observer::NoOpObserver;

    fn make_test_state(legs: &[(OptionType, i64, Decimal)]) -> GroupState {
        let records: Vec<LegRecord> = legs
            .iter()
            .map(|(option_type, quantity, strike)| LegRecord {
                client: "ClientA".to_string(),
                ticker: "ABC".to_string(),
                maturity: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                strike: *strike,
                option_type: *option_type,
                quantity: *quantity,
                underlying_price: dec!(100),
            })
            .collect();
        GroupState::new("ClientA", "ABC", &records, Arc::new(NoOpObserver))
    }

    #[test]
    fn test_candidates_sorted_by_strike_then_id() {
        let state = make_test_state(&[
            (OptionType::Call, 5, dec!(110)),
            (OptionType::Put, -3, dec!(95)),
            (OptionType::Call, 2, dec!(95)),
        ]);

        let cands = state.candidates(None);
        assert_eq!(cands.len(), 3);
        assert_eq!(cands[0].strike, dec!(95));
        assert_eq!(cands[0].id, LegId::new(1));
        assert_eq!(cands[1].strike, dec!(95));
        assert_eq!(cands[1].id, LegId::new(2));
        assert_eq!(cands[2].strike, dec!(110));
    }

    #[test]
    fn test_candidates_exclude_exhausted_legs() {
        let mut state = make_test_state(&[
            (OptionType::Call, 5, dec!(100)),
            (OptionType::Put, 5, dec!(100)),
        ]);
        state.consume(LegId::new(0), 5).unwrap();

        let cands = state.candidates(None);
        assert_eq!(cands.len(), 1);
        assert_eq!(cands[0].id, LegId::new(1));
    }

    #[test]
    fn test_finalize_pending_scales_leg_consumption() {
        let mut state = make_test_state(&[
            (OptionType::Call, 6, dec!(100)),
            (OptionType::Put, -6, dec!(100)),
        ]);
        state.consume(LegId::new(0), 6).unwrap();
        state.consume(LegId::new(1), 6).unwrap();

        let record = MatchRecord::new(
            StrategyLabel::SyntheticLong,
            "ClientA",
            "ABC",
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            dec!(100),
            6,
        )
        .with_buy_call(dec!(100))
        .with_sell_put(dec!(100))
        .with_leg(LegId::new(0), 6)
        .with_leg(LegId::new(1), -6);
        state.push_pending_synthetic(record, dec!(100));

        // A box absorbs 4 of the 6
        state.consume_pending(0, 4).unwrap();
        state.finalize_pending();

        assert_eq!(state.matches().len(), 1);
        let finalized = &state.matches()[0];
        assert_eq!(finalized.quantity, 2);
        assert_eq!(finalized.legs[0].consumed, 2);
        assert_eq!(finalized.legs[1].consumed, -2);
    }

    #[test]
    fn test_consume_pending_rejects_over_absorption() {
        let mut state = make_test_state(&[(OptionType::Call, 3, dec!(100))]);
        let record = MatchRecord::new(
            StrategyLabel::SyntheticLong,
            "ClientA",
            "ABC",
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            dec!(100),
            3,
        );
        state.push_pending_synthetic(record, dec!(100));

        assert_eq!(
            state.consume_pending(0, 4),
            Err(EngineError::SyntheticPoolViolation {
                requested: 4,
                remaining: 3,
            })
        );
    }

    #[test]
    fn test_verify_conservation_detects_gaps() {
        let mut state = make_test_state(&[(OptionType::Call, 5, dec!(100))]);
        // Consume without recording any match
        state.consume(LegId::new(0), 2).unwrap();

        let err = state.verify_conservation().unwrap_err();
        assert_eq!(
            err,
            EngineError::ConservationViolation {
                leg_id: LegId::new(0),
                original: 5,
                consumed: 0,
                residual: 3,
            }
        );
    }
}
