//! Engine facade: validation, unit fan-out, and report assembly.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{error, info};

use crate::config::{ConfigError, EngineConfig};
use crate::decomposition::driver::DecompositionDriver;
use crate::decomposition::grouping::{UnitKey, partition};
use crate::decomposition::leg::LegRecord;
use crate::decomposition::observer::{MatchObserver, NoOpObserver};
use crate::decomposition::report::{DecompositionReport, UnitFailure, UnitOutcome};
use crate::decomposition::state::GroupState;
use crate::error::EngineError;

/// Result of one unit's run: converged output or a discarded failure.
enum UnitResult {
    Converged(UnitOutcome),
    Failed(UnitFailure),
}

/// Deterministic options position decomposition engine.
///
/// Stateless between runs; one instance can decompose any number of
/// snapshots. Units (one per client + ticker pair) are independent and
/// run in parallel when the snapshot is large enough.
pub struct DecompositionEngine {
    config: EngineConfig,
    observer: Arc<dyn MatchObserver>,
}

impl Default for DecompositionEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            observer: Arc::new(NoOpObserver),
        }
    }
}

impl DecompositionEngine {
    /// Create an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            observer: Arc::new(NoOpObserver),
        })
    }

    /// Attach a match observer notified of every emitted match.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Decompose one portfolio snapshot.
    ///
    /// Invalid input records land in the report's rejected table.
    /// Units that hit the round cap land in the failures table with
    /// their results discarded. Identical input yields an identical
    /// report regardless of thread count.
    ///
    /// # Errors
    ///
    /// Returns an error only on internal consistency violations
    /// (over-consumption or a failed conservation audit), which
    /// indicate a defect rather than bad input.
    pub fn decompose(
        &self,
        records: Vec<LegRecord>,
    ) -> Result<DecompositionReport, EngineError> {
        let total = records.len();
        let (units, rejected) = partition(records);
        info!(
            legs = total,
            units = units.len(),
            rejected = rejected.len(),
            "starting decomposition"
        );

        let units: Vec<(UnitKey, Vec<LegRecord>)> = units.into_iter().collect();
        let results: Vec<UnitResult> =
            if units.len() >= self.config.parallel.min_parallel_units {
                units
                    .par_iter()
                    .map(|(key, legs)| self.run_unit(key, legs))
                    .collect::<Result<_, _>>()?
            } else {
                units
                    .iter()
                    .map(|(key, legs)| self.run_unit(key, legs))
                    .collect::<Result<_, _>>()?
            };

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                UnitResult::Converged(outcome) => outcomes.push(outcome),
                UnitResult::Failed(failure) => failures.push(failure),
            }
        }

        Ok(DecompositionReport::assemble(outcomes, rejected, failures))
    }

    /// Run one unit to convergence. A round cap breach discards the
    /// unit; any other engine error propagates as fatal.
    fn run_unit(&self, key: &UnitKey, legs: &[LegRecord]) -> Result<UnitResult, EngineError> {
        let mut state = GroupState::new(
            key.client.clone(),
            key.ticker.clone(),
            legs,
            Arc::clone(&self.observer),
        );
        let driver = DecompositionDriver::new(self.config.round_cap_factor);

        match driver.run(&mut state) {
            Ok(()) => {
                info!(
                    client = %key.client,
                    ticker = %key.ticker,
                    matches = state.matches().len(),
                    residuals = state.residuals().len(),
                    "unit converged"
                );
                let residuals = state.residuals();
                Ok(UnitResult::Converged(UnitOutcome {
                    client: key.client.clone(),
                    ticker: key.ticker.clone(),
                    matches: state.into_matches(),
                    residuals,
                }))
            }
            Err(err @ EngineError::RoundCapExceeded { .. }) => {
                error!(
                    client = %key.client,
                    ticker = %key.ticker,
                    %err,
                    "unit discarded"
                );
                Ok(UnitResult::Failed(UnitFailure {
                    client: key.client.clone(),
                    ticker: key.ticker.clone(),
                    message: err.to_string(),
                }))
            }
            Err(err) => Err(err),
        }
    }
}
