//! Leg store: the single source of truth for remaining quantities.
//!
//! Legs live in an arena addressed by stable [`LegId`]s. All quantity
//! mutation goes through [`LegStore::consume`], which moves a leg's
//! remaining quantity toward zero and fails loudly on over-consumption.
//! No other component mutates quantities.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decomposition::leg::{LegRecord, OptionType};
use crate::error::EngineError;

/// Stable identifier of a leg within one unit's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LegId(usize);

impl LegId {
    /// Create a leg id from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index into the store.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LegId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A leg held in the store: immutable snapshot attributes plus the
/// mutable remaining quantity.
#[derive(Debug, Clone)]
pub(crate) struct StoredLeg {
    id: LegId,
    maturity: NaiveDate,
    strike: Decimal,
    option_type: OptionType,
    underlying_price: Decimal,
    original_quantity: i64,
    remaining: i64,
}

impl StoredLeg {
    pub(crate) const fn id(&self) -> LegId {
        self.id
    }

    pub(crate) const fn maturity(&self) -> NaiveDate {
        self.maturity
    }

    pub(crate) const fn strike(&self) -> Decimal {
        self.strike
    }

    pub(crate) const fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub(crate) const fn underlying_price(&self) -> Decimal {
        self.underlying_price
    }

    pub(crate) const fn original_quantity(&self) -> i64 {
        self.original_quantity
    }

    /// Remaining signed quantity. Same sign as the original quantity
    /// until the leg is exhausted.
    pub(crate) const fn remaining(&self) -> i64 {
        self.remaining
    }

    pub(crate) const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Arena of legs for one (client, ticker) unit.
#[derive(Debug, Default)]
pub(crate) struct LegStore {
    legs: Vec<StoredLeg>,
}

impl LegStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a validated record, returning its stable id.
    pub(crate) fn insert(&mut self, record: &LegRecord) -> LegId {
        let id = LegId::new(self.legs.len());
        self.legs.push(StoredLeg {
            id,
            maturity: record.maturity,
            strike: record.strike,
            option_type: record.option_type,
            underlying_price: record.underlying_price,
            original_quantity: record.quantity,
            remaining: record.quantity,
        });
        id
    }

    pub(crate) fn get(&self, id: LegId) -> &StoredLeg {
        &self.legs[id.index()]
    }

    pub(crate) fn remaining(&self, id: LegId) -> i64 {
        self.legs[id.index()].remaining
    }

    /// Decrease the absolute remaining quantity of a leg by `amount`,
    /// in the direction that moves it toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::QuantityViolation`] if `amount` is not
    /// positive or exceeds the leg's absolute remaining quantity.
    pub(crate) fn consume(&mut self, id: LegId, amount: i64) -> Result<(), EngineError> {
        let leg = &mut self.legs[id.index()];
        if amount <= 0 || amount > leg.remaining.abs() {
            return Err(EngineError::QuantityViolation {
                leg_id: id,
                requested: amount,
                remaining: leg.remaining,
            });
        }
        leg.remaining -= amount * leg.remaining.signum();
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.legs.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StoredLeg> {
        self.legs.iter()
    }
}
