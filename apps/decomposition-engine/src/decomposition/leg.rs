//! Input leg records and snapshot validation.
//!
//! A [`LegRecord`] is one held option position line from the portfolio
//! snapshot. Records are validated before matching; a record that
//! fails validation is diverted to the rejected table and excluded
//! from both matching and the conservation audit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

/// One held option position line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegRecord {
    /// Client identifier.
    pub client: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Maturity date.
    pub maturity: NaiveDate,
    /// Strike price.
    pub strike: Decimal,
    /// Option type (call/put).
    pub option_type: OptionType,
    /// Signed quantity (positive = net long, negative = net short).
    pub quantity: i64,
    /// Underlying price at snapshot time.
    pub underlying_price: Decimal,
}

impl LegRecord {
    /// Check the record against the input contract.
    ///
    /// # Errors
    ///
    /// Returns the reason this record cannot participate in matching.
    pub fn validate(&self) -> Result<(), RejectReason> {
        if self.client.trim().is_empty() {
            return Err(RejectReason::EmptyClient);
        }
        if self.ticker.trim().is_empty() {
            return Err(RejectReason::EmptyTicker);
        }
        if self.strike <= Decimal::ZERO {
            return Err(RejectReason::NonPositiveStrike);
        }
        if self.underlying_price <= Decimal::ZERO {
            return Err(RejectReason::NonPositiveUnderlyingPrice);
        }
        if self.quantity == 0 {
            return Err(RejectReason::ZeroQuantity);
        }
        Ok(())
    }
}

/// Reason an input record was excluded from matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Client identifier is empty or blank.
    EmptyClient,
    /// Ticker is empty or blank.
    EmptyTicker,
    /// Strike must be strictly positive.
    NonPositiveStrike,
    /// Underlying price must be strictly positive.
    NonPositiveUnderlyingPrice,
    /// A zero-quantity line holds no position.
    ZeroQuantity,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyClient => write!(f, "empty client"),
            Self::EmptyTicker => write!(f, "empty ticker"),
            Self::NonPositiveStrike => write!(f, "non-positive strike"),
            Self::NonPositiveUnderlyingPrice => write!(f, "non-positive underlying price"),
            Self::ZeroQuantity => write!(f, "zero quantity"),
        }
    }
}

/// An input record that failed validation, carried to the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLeg {
    /// The raw input record.
    pub record: LegRecord,
    /// Why it was rejected.
    pub reason: RejectReason,
}
