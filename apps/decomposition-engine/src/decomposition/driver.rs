//! Fixed-point decomposition driver.
//!
//! Runs the matcher priority order over one unit until no matcher
//! produces a new match. Two phases: every maturity group converges
//! first, then the unit-scoped calendar pass runs over whatever the
//! single-maturity matchers left behind. Consumption only moves
//! quantities toward zero, so a converged maturity group can never be
//! re-opened by the calendar pass.

use chrono::NaiveDate;
use tracing::debug;

use crate::decomposition::matchers::{MatcherScope, StrategyMatcher, priority_order};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

/// Drives one unit to its matching fixed point.
pub(crate) struct DecompositionDriver {
    matchers: Vec<Box<dyn StrategyMatcher>>,
    round_cap_factor: usize,
}

impl DecompositionDriver {
    pub(crate) fn new(round_cap_factor: usize) -> Self {
        Self {
            matchers: priority_order(),
            round_cap_factor,
        }
    }

    /// Run both phases to convergence, then finalize pending
    /// synthetics and audit conservation.
    pub(crate) fn run(&self, state: &mut GroupState) -> Result<(), EngineError> {
        // Each round consumes at least one contract from at least one
        // leg, so converging runs stay far below this cap. Exceeding
        // it means a matcher broke the strictly-decreasing contract.
        let cap = state.leg_count().max(1) * self.matchers.len() * self.round_cap_factor;

        for maturity in state.maturities() {
            self.run_to_convergence(state, Some(maturity), cap)?;
        }
        self.run_to_convergence(state, None, cap)?;

        state.finalize_pending();
        state.verify_conservation()
    }

    /// One scanning loop: invoke each in-scope matcher once per round,
    /// repeat while any of them matched.
    fn run_to_convergence(
        &self,
        state: &mut GroupState,
        maturity: Option<NaiveDate>,
        cap: usize,
    ) -> Result<(), EngineError> {
        let mut rounds = 0_usize;
        loop {
            rounds += 1;
            if rounds > cap {
                return Err(EngineError::RoundCapExceeded {
                    client: state.client().to_string(),
                    ticker: state.ticker().to_string(),
                    rounds,
                    cap,
                });
            }

            let mut matched = false;
            for matcher in &self.matchers {
                let in_scope = match matcher.scope() {
                    MatcherScope::Maturity => maturity.is_some(),
                    MatcherScope::Unit => maturity.is_none(),
                };
                if in_scope && matcher.try_match(state, maturity)? {
                    matched = true;
                }
            }
            if !matched {
                break;
            }
        }

        debug!(
            client = state.client(),
            ticker = state.ticker(),
            maturity = ?maturity,
            rounds,
            "scan converged"
        );
        Ok(())
    }
}
