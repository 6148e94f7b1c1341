//! Report assembly.
//!
//! Pure formatting: collects match records across all units into one
//! table per strategy kind, plus the residual, rejected, and failure
//! tables. No matching logic lives here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decomposition::leg::{OptionType, RejectedLeg};
use crate::decomposition::record::{MatchRecord, StrategyKind, StrategyLabel};
use crate::decomposition::state::ResidualLeg;

/// One row in a strategy output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRow {
    /// Sub-variant label.
    pub label: StrategyLabel,
    /// Client identifier.
    pub client: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Maturity (the near maturity for calendar spreads).
    pub maturity: NaiveDate,
    /// Far maturity, calendar spreads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub far_maturity: Option<NaiveDate>,
    /// Strike of the bought call leg, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_call_strike: Option<Decimal>,
    /// Strike of the sold call leg, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_call_strike: Option<Decimal>,
    /// Strike of the bought put leg, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_put_strike: Option<Decimal>,
    /// Strike of the sold put leg, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_put_strike: Option<Decimal>,
    /// Underlying price at snapshot time.
    pub underlying_price: Decimal,
    /// Matched quantity.
    pub quantity: i64,
}

impl From<&MatchRecord> for StrategyRow {
    fn from(record: &MatchRecord) -> Self {
        Self {
            label: record.label,
            client: record.client.clone(),
            ticker: record.ticker.clone(),
            maturity: record.maturity,
            far_maturity: record.far_maturity,
            buy_call_strike: record.buy_call_strike,
            sell_call_strike: record.sell_call_strike,
            buy_put_strike: record.buy_put_strike,
            sell_put_strike: record.sell_put_strike,
            underlying_price: record.underlying_price,
            quantity: record.quantity,
        }
    }
}

/// One row in the residual table: unclassified quantity left on a leg
/// after convergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidualRow {
    /// Client identifier.
    pub client: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Leg maturity.
    pub maturity: NaiveDate,
    /// Leg strike.
    pub strike: Decimal,
    /// Leg option type.
    pub option_type: OptionType,
    /// Residual signed quantity.
    pub quantity: i64,
}

/// A unit whose driver hit the round cap. Its results are discarded
/// rather than partially reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    /// Client identifier.
    pub client: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Converged output of one unit, ready for assembly.
#[derive(Debug)]
pub(crate) struct UnitOutcome {
    pub(crate) client: String,
    pub(crate) ticker: String,
    pub(crate) matches: Vec<MatchRecord>,
    pub(crate) residuals: Vec<ResidualLeg>,
}

/// Full decomposition output: one table per strategy kind, plus
/// residuals, rejected input legs, and failed units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompositionReport {
    /// Matched straddles.
    pub straddles: Vec<StrategyRow>,
    /// Matched strangles.
    pub strangles: Vec<StrategyRow>,
    /// Matched synthetic positions.
    pub synthetics: Vec<StrategyRow>,
    /// Matched box spreads.
    pub box_spreads: Vec<StrategyRow>,
    /// Matched risk reversals.
    pub risk_reversals: Vec<StrategyRow>,
    /// Matched call vertical spreads.
    pub call_spreads: Vec<StrategyRow>,
    /// Matched put vertical spreads.
    pub put_spreads: Vec<StrategyRow>,
    /// Matched calendar spreads.
    pub calendar_spreads: Vec<StrategyRow>,
    /// Matched iron condors.
    pub iron_condors: Vec<StrategyRow>,
    /// Unclassified quantity per leg.
    pub residuals: Vec<ResidualRow>,
    /// Input records that failed validation.
    pub rejected: Vec<RejectedLeg>,
    /// Units whose driver failed to converge.
    pub failures: Vec<UnitFailure>,
}

impl DecompositionReport {
    /// Assemble the report from per-unit outcomes, in the order given
    /// (the engine supplies units in key order, which makes the report
    /// deterministic).
    pub(crate) fn assemble(
        outcomes: Vec<UnitOutcome>,
        rejected: Vec<RejectedLeg>,
        failures: Vec<UnitFailure>,
    ) -> Self {
        let mut report = Self {
            rejected,
            failures,
            ..Self::default()
        };

        for outcome in outcomes {
            for record in &outcome.matches {
                let row = StrategyRow::from(record);
                report.table_mut(record.label.kind()).push(row);
            }
            for residual in outcome.residuals {
                report.residuals.push(ResidualRow {
                    client: outcome.client.clone(),
                    ticker: outcome.ticker.clone(),
                    maturity: residual.maturity,
                    strike: residual.strike,
                    option_type: residual.option_type,
                    quantity: residual.quantity,
                });
            }
        }

        report
    }

    fn table_mut(&mut self, kind: StrategyKind) -> &mut Vec<StrategyRow> {
        match kind {
            StrategyKind::Straddle => &mut self.straddles,
            StrategyKind::Strangle => &mut self.strangles,
            StrategyKind::Synthetic => &mut self.synthetics,
            StrategyKind::BoxSpread => &mut self.box_spreads,
            StrategyKind::RiskReversal => &mut self.risk_reversals,
            StrategyKind::CallVertical => &mut self.call_spreads,
            StrategyKind::PutVertical => &mut self.put_spreads,
            StrategyKind::CalendarSpread => &mut self.calendar_spreads,
            StrategyKind::IronCondor => &mut self.iron_condors,
        }
    }

    /// Total number of matched strategy rows across all tables.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.straddles.len()
            + self.strangles.len()
            + self.synthetics.len()
            + self.box_spreads.len()
            + self.risk_reversals.len()
            + self.call_spreads.len()
            + self.put_spreads.len()
            + self.calendar_spreads.len()
            + self.iron_condors.len()
    }
}
