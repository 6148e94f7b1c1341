//! Straddle matcher: call + put, same strike, same direction.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches a call and a put at the same strike with same-sign
/// quantities into a long or short straddle.
pub(crate) struct StraddleMatcher;

impl StrategyMatcher for StraddleMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Straddle
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

        for call in cands.iter().filter(|c| c.option_type == OptionType::Call) {
            let put = cands.iter().find(|p| {
                p.option_type == OptionType::Put
                    && p.strike == call.strike
                    && p.is_long() == call.is_long()
            });
            let Some(put) = put else { continue };

            let quantity = call.abs_remaining().min(put.abs_remaining());
            state.consume(call.id, quantity)?;
            state.consume(put.id, quantity)?;

            let label = if call.is_long() {
                StrategyLabel::LongStraddle
            } else {
                StrategyLabel::ShortStraddle
            };
            let record = MatchRecord::new(
                label,
                state.client(),
                state.ticker(),
                call.maturity,
                call.underlying_price,
                quantity,
            );
            let record = if call.is_long() {
                record.with_buy_call(call.strike).with_buy_put(put.strike)
            } else {
                record.with_sell_call(call.strike).with_sell_put(put.strike)
            };
            let record = record
                .with_leg(call.id, quantity * call.remaining.signum())
                .with_leg(put.id, quantity * put.remaining.signum());

            state.push_match(record);
            return Ok(true);
        }

        Ok(false)
    }
}
