//! Risk reversal matcher: call and put at different strikes, opposite
//! signs, put below the call.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches a long call + short put below it (long risk reversal) or a
/// short call + long put below it (short risk reversal).
pub(crate) struct RiskReversalMatcher;

impl StrategyMatcher for RiskReversalMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RiskReversal
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
                    && p.strike < call.strike
                    && p.is_long() != call.is_long()
            });
            let Some(put) = put else { continue };

            let quantity = call.abs_remaining().min(put.abs_remaining());
            state.consume(call.id, quantity)?;
            state.consume(put.id, quantity)?;

            let label = if call.is_long() {
                StrategyLabel::LongRiskReversal
            } else {
                StrategyLabel::ShortRiskReversal
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
                record.with_buy_call(call.strike).with_sell_put(put.strike)
            } else {
                record.with_sell_call(call.strike).with_buy_put(put.strike)
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::decomposition::leg::LegRecord;
    use crate::decomposition::observer::NoOpObserver;

    fn make_test_state(legs: &[(OptionType, i64, Decimal)]) -> (GroupState, NaiveDate) {
        let maturity = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let records: Vec<LegRecord> = legs
            .iter()
            .map(|(option_type, quantity, strike)| LegRecord {
                client: "ClientA".to_string(),
                ticker: "ABC".to_string(),
                maturity,
                strike: *strike,
                option_type: *option_type,
                quantity: *quantity,
                underlying_price: dec!(100),
            })
            .collect();
        (
            GroupState::new("ClientA", "ABC", &records, Arc::new(NoOpObserver)),
            maturity,
        )
    }

    #[test]
    fn test_long_risk_reversal() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Call, 5, dec!(110)),
            (OptionType::Put, -5, dec!(90)),
        ]);

        let matched = RiskReversalMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(matched);

        let record = &state.matches()[0];
        assert_eq!(record.label, StrategyLabel::LongRiskReversal);
        assert_eq!(record.buy_call_strike, Some(dec!(110)));
        assert_eq!(record.sell_put_strike, Some(dec!(90)));
        assert_eq!(record.legs[0].consumed, 5);
        assert_eq!(record.legs[1].consumed, -5);
    }

    #[test]
    fn test_short_risk_reversal() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Call, -4, dec!(110)),
            (OptionType::Put, 7, dec!(90)),
        ]);

        let matched = RiskReversalMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(matched);

        let record = &state.matches()[0];
        assert_eq!(record.label, StrategyLabel::ShortRiskReversal);
        assert_eq!(record.sell_call_strike, Some(dec!(110)));
        assert_eq!(record.buy_put_strike, Some(dec!(90)));
        assert_eq!(record.quantity, 4);

        // Put keeps 3 long contracts
        let residuals = state.residuals();
        assert_eq!(residuals.len(), 1);
        assert_eq!(residuals[0].quantity, 3);
    }

    #[test]
    fn test_no_match_when_put_above_call() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Call, 5, dec!(90)),
            (OptionType::Put, -5, dec!(110)),
        ]);

        let matched = RiskReversalMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(!matched);
    }

    #[test]
    fn test_no_match_on_same_strike() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Call, 5, dec!(100)),
            (OptionType::Put, -5, dec!(100)),
        ]);

        let matched = RiskReversalMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(!matched);
    }
}
