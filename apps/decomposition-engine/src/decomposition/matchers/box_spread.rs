//! Box spread matcher: one synthetic long + one synthetic short,
//! same maturity, different strikes.
//!
//! Boxes are composed from pending synthetic matches rather than
//! detected directly from four legs; this keeps the scan quadratic in
//! the synthetic pool instead of quartic in the leg count. Direction
//! follows the long call: a long box carries its long call at the
//! lower strike.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches offsetting pending synthetics into a long or short box.
pub(crate) struct BoxSpreadMatcher;

/// Pool entry snapshot: (pool index, strike, remaining quantity).
type PoolEntry = (usize, Decimal, i64);

impl StrategyMatcher for BoxSpreadMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BoxSpread
    }

    fn scope(&self) -> MatcherScope {
        MatcherScope::Maturity
    }

    fn try_match(
        &self,
        state: &mut GroupState,
        maturity: Option<NaiveDate>,
    ) -> Result<bool, EngineError> {
        let Some(maturity) = maturity else {
            return Ok(false);
        };

        let mut longs: Vec<PoolEntry> = Vec::new();
        let mut shorts: Vec<PoolEntry> = Vec::new();
        for (index, pending) in state.pending_synthetics().iter().enumerate() {
            if pending.remaining == 0 || pending.record.maturity != maturity {
                continue;
            }
            match pending.record.label {
                StrategyLabel::SyntheticLong => longs.push((index, pending.strike, pending.remaining)),
                StrategyLabel::SyntheticShort => {
                    shorts.push((index, pending.strike, pending.remaining));
                }
                _ => {}
            }
        }
        longs.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        shorts.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        for &(long_index, long_strike, long_remaining) in &longs {
            for &(short_index, short_strike, short_remaining) in &shorts {
                if long_strike == short_strike {
                    continue;
                }

                let quantity = long_remaining.min(short_remaining);
                let long_record = state.pending_synthetics()[long_index].record.clone();
                let short_record = state.pending_synthetics()[short_index].record.clone();

                let label = if long_strike < short_strike {
                    StrategyLabel::LongBoxSpread
                } else {
                    StrategyLabel::ShortBoxSpread
                };
                let mut record = MatchRecord::new(
                    label,
                    state.client(),
                    state.ticker(),
                    maturity,
                    long_record.underlying_price,
                    quantity,
                )
                .with_buy_call(long_strike)
                .with_sell_put(long_strike)
                .with_buy_put(short_strike)
                .with_sell_call(short_strike);
                for leg in long_record.legs.iter().chain(short_record.legs.iter()) {
                    record = record.with_leg(leg.leg_id, quantity * leg.consumed.signum());
                }

                state.consume_pending(long_index, quantity)?;
                state.consume_pending(short_index, quantity)?;
                state.push_match(record);
                return Ok(true);
            }
        }

        Ok(false)
    }
}
