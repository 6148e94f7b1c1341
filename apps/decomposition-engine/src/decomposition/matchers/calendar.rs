//! Calendar spread matcher: same type and strike, two maturities,
//! opposite signs.
//!
//! The only unit-scoped matcher; it runs after every maturity group
//! in the unit has converged, reading whatever quantity the
//! single-maturity matchers left behind.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches a long and a short leg of the same type and strike across
/// two maturities. Long the far maturity is a long calendar spread.
pub(crate) struct CalendarSpreadMatcher;

impl StrategyMatcher for CalendarSpreadMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CalendarSpread
    }

    fn scope(&self) -> MatcherScope {
        MatcherScope::Unit
    }

    fn try_match(
        &self,
        state: &mut GroupState,
        _maturity: Option<NaiveDate>,
    ) -> Result<bool, EngineError> {
        let cands = state.candidates(None);

        for long in cands.iter().filter(|c| c.is_long()) {
            let short = cands.iter().find(|s| {
                s.option_type == long.option_type
                    && s.strike == long.strike
                    && s.maturity != long.maturity
                    && !s.is_long()
            });
            let Some(short) = short else { continue };

            let quantity = long.abs_remaining().min(short.abs_remaining());
            state.consume(long.id, quantity)?;
            state.consume(short.id, quantity)?;

            let near = long.maturity.min(short.maturity);
            let far = long.maturity.max(short.maturity);
            let label = if long.maturity == far {
                StrategyLabel::LongCalendarSpread
            } else {
                StrategyLabel::ShortCalendarSpread
            };
            let record = MatchRecord::new(
                label,
                state.client(),
                state.ticker(),
                near,
                long.underlying_price,
                quantity,
            )
            .with_far_maturity(far);
            let record = match long.option_type {
                OptionType::Call => record.with_buy_call(long.strike).with_sell_call(short.strike),
                OptionType::Put => record.with_buy_put(long.strike).with_sell_put(short.strike),
            };
            let record = record
                .with_leg(long.id, quantity)
                .with_leg(short.id, -quantity);

            state.push_match(record);
            return Ok(true);
        }

        Ok(false)
    }
}
