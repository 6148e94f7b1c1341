//! Strategy matchers.
//!
//! Each matcher is an independent rule that, given the current group
//! state, produces at most one match per invocation:
//!
//! 1. Filter candidate legs by the matcher's structural predicate.
//! 2. Scan in the fixed tie-break order (ascending strike, then
//!    ascending leg id) supplied by [`GroupState::candidates`].
//! 3. Take the first eligible combination; match quantity is the
//!    minimum absolute remaining quantity across its legs.
//! 4. Consume that quantity from every leg and emit one record.
//!
//! The priority order matters: matchers that close exact pairs
//! (straddle, synthetic) and composite structures built from them
//! (box spread, iron condor) claim quantity before looser two-leg
//! shapes (strangle, risk reversal, verticals) can consume the same
//! legs differently. A four-leg condor decomposed by the strangle or
//! vertical matchers first would never be recognized as the single
//! defined-risk structure its margin treatment requires.

mod box_spread;
mod calendar;
mod iron_condor;
mod risk_reversal;
mod straddle;
mod strangle;
mod synthetic;
mod vertical;

use chrono::NaiveDate;

use crate::decomposition::record::StrategyKind;
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

pub(crate) use box_spread::BoxSpreadMatcher;
pub(crate) use calendar::CalendarSpreadMatcher;
pub(crate) use iron_condor::IronCondorMatcher;
pub(crate) use risk_reversal::RiskReversalMatcher;
pub(crate) use straddle::StraddleMatcher;
pub(crate) use strangle::StrangleMatcher;
pub(crate) use synthetic::SyntheticMatcher;
pub(crate) use vertical::VerticalSpreadMatcher;

/// Which slice of the unit a matcher scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatcherScope {
    /// One (client, ticker, maturity) group at a time.
    Maturity,
    /// The whole unit; legs across maturities (calendar spreads).
    Unit,
}

/// Shared matcher contract.
pub(crate) trait StrategyMatcher: Send + Sync {
    /// Strategy family this matcher emits.
    fn kind(&self) -> StrategyKind;

    /// Scan scope.
    fn scope(&self) -> MatcherScope;

    /// Attempt one match. `maturity` is `Some` for maturity-scoped
    /// invocations and `None` for unit-scoped ones. Returns whether a
    /// match was emitted.
    fn try_match(
        &self,
        state: &mut GroupState,
        maturity: Option<NaiveDate>,
    ) -> Result<bool, EngineError>;
}

/// The canonical matcher priority order.
pub(crate) fn priority_order() -> Vec<Box<dyn StrategyMatcher>> {
    vec![
        Box::new(StraddleMatcher),
        Box::new(SyntheticMatcher),
        Box::new(BoxSpreadMatcher),
        Box::new(IronCondorMatcher),
        Box::new(StrangleMatcher),
        Box::new(RiskReversalMatcher),
        Box::new(VerticalSpreadMatcher::calls()),
        Box::new(VerticalSpreadMatcher::puts()),
        Box::new(CalendarSpreadMatcher),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_covers_all_kinds() {
        let kinds: Vec<StrategyKind> = priority_order().iter().map(|m| m.kind()).collect();
        assert_eq!(kinds.len(), 9);
        assert_eq!(kinds[0], StrategyKind::Straddle);
        assert_eq!(kinds[1], StrategyKind::Synthetic);
        assert_eq!(kinds[2], StrategyKind::BoxSpread);
        assert_eq!(kinds[8], StrategyKind::CalendarSpread);
    }

    #[test]
    fn test_only_calendar_is_unit_scoped() {
        for matcher in priority_order() {
            let expected = if matcher.kind() == StrategyKind::CalendarSpread {
                MatcherScope::Unit
            } else {
                MatcherScope::Maturity
            };
            assert_eq!(matcher.scope(), expected);
        }
    }
}
