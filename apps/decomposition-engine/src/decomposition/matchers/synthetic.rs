//! Synthetic position matcher: call + put, same strike, opposite signs.
//!
//! Matches go into the pending synthetic pool rather than straight to
//! the match list, so the box spread matcher can absorb offsetting
//! pairs before they are finalized.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches a long call + short put (synthetic long) or long put +
/// short call (synthetic short) at the same strike.
pub(crate) struct SyntheticMatcher;

impl StrategyMatcher for SyntheticMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Synthetic
    }

    fn scope(&self) -> MatcherScope {
        MatcherScope::Maturity
    }

    fn try_match(
        &self,
        state: &mut GroupState,
        maturity: Option<NaiveDate>,
    ) -> Result<bool, EngineError> {
        let cands = state.candidates(maturity);

        // The long leg drives the scan; the short leg completes it.
        for long in cands.iter().filter(|c| c.is_long()) {
            let counter_type = match long.option_type {
                OptionType::Call => OptionType::Put,
                OptionType::Put => OptionType::Call,
            };
            let short = cands.iter().find(|s| {
                s.option_type == counter_type && s.strike == long.strike && !s.is_long()
            });
            let Some(short) = short else { continue };

            let quantity = long.abs_remaining().min(short.abs_remaining());
            state.consume(long.id, quantity)?;
            state.consume(short.id, quantity)?;

            let label = match long.option_type {
                OptionType::Call => StrategyLabel::SyntheticLong,
                OptionType::Put => StrategyLabel::SyntheticShort,
            };
            let record = MatchRecord::new(
                label,
                state.client(),
                state.ticker(),
                long.maturity,
                long.underlying_price,
                quantity,
            );
            let record = match long.option_type {
                OptionType::Call => record.with_buy_call(long.strike).with_sell_put(short.strike),
                OptionType::Put => record.with_buy_put(long.strike).with_sell_call(short.strike),
            };
            let record = record
                .with_leg(long.id, quantity)
                .with_leg(short.id, -quantity);

            state.push_pending_synthetic(record, long.strike);
            return Ok(true);
        }

        Ok(false)
    }
}
