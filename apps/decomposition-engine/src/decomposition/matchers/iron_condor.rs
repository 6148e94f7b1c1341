//! Iron condor matcher: short call + long call above it, short put +
//! long put below it, all at one maturity.
//!
//! The condor is emitted as a single composite record, not as two
//! vertical spreads, because its margin and risk meaning differs from
//! the sum of its sides.

use chrono::NaiveDate;

use crate::decomposition::leg::OptionType;
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::{Candidate, GroupState};
use crate::error::EngineError;

use super::{MatcherScope, StrategyMatcher};

/// Matches the four-leg condor structure: short body (call + put),
/// long wings outside it.
pub(crate) struct IronCondorMatcher;

impl StrategyMatcher for IronCondorMatcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::IronCondor
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

        fn select(cands: &[Candidate], option_type: OptionType, long: bool) -> Vec<Candidate> {
            cands
                .iter()
                .filter(|c| c.option_type == option_type && c.is_long() == long)
                .copied()
                .collect()
        }
        let short_calls = select(&cands, OptionType::Call, false);
        let long_calls = select(&cands, OptionType::Call, true);
        let short_puts = select(&cands, OptionType::Put, false);
        let long_puts = select(&cands, OptionType::Put, true);

        for short_call in &short_calls {
            for long_call in long_calls.iter().filter(|c| c.strike > short_call.strike) {
                for short_put in short_puts.iter().filter(|p| p.strike < short_call.strike) {
                    for long_put in long_puts.iter().filter(|p| p.strike < short_put.strike) {
                        let quantity = short_call
                            .abs_remaining()
                            .min(long_call.abs_remaining())
                            .min(short_put.abs_remaining())
                            .min(long_put.abs_remaining());

                        state.consume(short_call.id, quantity)?;
                        state.consume(long_call.id, quantity)?;
                        state.consume(short_put.id, quantity)?;
                        state.consume(long_put.id, quantity)?;

                        let record = MatchRecord::new(
                            StrategyLabel::IronCondor,
                            state.client(),
                            state.ticker(),
                            short_call.maturity,
                            short_call.underlying_price,
                            quantity,
                        )
                        .with_sell_call(short_call.strike)
                        .with_buy_call(long_call.strike)
                        .with_sell_put(short_put.strike)
                        .with_buy_put(long_put.strike)
                        .with_leg(short_call.id, -quantity)
                        .with_leg(long_call.id, quantity)
                        .with_leg(short_put.id, -quantity)
                        .with_leg(long_put.id, quantity);

                        state.push_match(record);
                        return Ok(true);
                    }
                }
            }
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
    fn test_iron_condor_full_match() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Put, 3, dec!(85)),
            (OptionType::Put, -3, dec!(90)),
            (OptionType::Call, -3, dec!(110)),
            (OptionType::Call, 3, dec!(115)),
        ]);

        let matched = IronCondorMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(matched);

        let record = &state.matches()[0];
        assert_eq!(record.label, StrategyLabel::IronCondor);
        assert_eq!(record.quantity, 3);
        assert_eq!(record.sell_call_strike, Some(dec!(110)));
        assert_eq!(record.buy_call_strike, Some(dec!(115)));
        assert_eq!(record.sell_put_strike, Some(dec!(90)));
        assert_eq!(record.buy_put_strike, Some(dec!(85)));
        assert!(state.residuals().is_empty());
    }

    #[test]
    fn test_condor_quantity_is_minimum_across_legs() {
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Put, 5, dec!(85)),
            (OptionType::Put, -2, dec!(90)),
            (OptionType::Call, -5, dec!(110)),
            (OptionType::Call, 5, dec!(115)),
        ]);

        let matched = IronCondorMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(matched);
        assert_eq!(state.matches()[0].quantity, 2);
        assert_eq!(state.residuals().len(), 3);
    }

    #[test]
    fn test_no_condor_when_wings_inside_body() {
        // Long put above the short put: not a condor shape
        let (mut state, maturity) = make_test_state(&[
            (OptionType::Put, 3, dec!(95)),
            (OptionType::Put, -3, dec!(90)),
            (OptionType::Call, -3, dec!(110)),
            (OptionType::Call, 3, dec!(115)),
        ]);

        let matched = IronCondorMatcher
            .try_match(&mut state, Some(maturity))
            .unwrap();
        assert!(!matched);
    }
}
