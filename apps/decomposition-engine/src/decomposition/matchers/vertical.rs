//! Vertical spread matcher: same option type, same maturity, two
//! strikes, opposite signs.
//!
//! One matcher type covers both families; the call and put instances
//! sit at separate slots in the priority order and emit into separate
//! report tables.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches two same-type legs at different strikes with opposite
/// signs. The label follows the long leg: below the short strike is a
/// debit call spread or bull put spread, above it the credit/bear
/// counterpart.
pub(crate) struct VerticalSpreadMatcher {
    option_type: OptionType,
}

impl VerticalSpreadMatcher {
    pub(crate) const fn calls() -> Self {
        Self {
            option_type: OptionType::Call,
        }
    }

    pub(crate) const fn puts() -> Self {
        Self {
            option_type: OptionType::Put,
        }
    }

    const fn label(&self, long_below_short: bool) -> StrategyLabel {
        match (self.option_type, long_below_short) {
            (OptionType::Call, true) => StrategyLabel::DebitCallSpread,
            (OptionType::Call, false) => StrategyLabel::CreditCallSpread,
            (OptionType::Put, true) => StrategyLabel::BullPutSpread,
            (OptionType::Put, false) => StrategyLabel::BearPutSpread,
        }
    }
}

impl StrategyMatcher for VerticalSpreadMatcher {
    fn kind(&self) -> StrategyKind {
        match self.option_type {
            OptionType::Call => StrategyKind::CallVertical,
            OptionType::Put => StrategyKind::PutVertical,
        }
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

        for long in cands
            .iter()
            .filter(|c| c.option_type == self.option_type && c.is_long())
        {
            let short = cands.iter().find(|s| {
                s.option_type == self.option_type && s.strike != long.strike && !s.is_long()
            });
            let Some(short) = short else { continue };

            let quantity = long.abs_remaining().min(short.abs_remaining());
            state.consume(long.id, quantity)?;
            state.consume(short.id, quantity)?;

            let label = self.label(long.strike < short.strike);
            let record = MatchRecord::new(
                label,
                state.client(),
                state.ticker(),
                long.maturity,
                long.underlying_price,
                quantity,
            );
            let record = match self.option_type {
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
