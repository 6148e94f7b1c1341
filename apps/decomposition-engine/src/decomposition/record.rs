//! Strategy match records.
//!
//! A [`MatchRecord`] is created once at match time and never mutated
//! afterward. It carries everything reporting needs: the sub-variant
//! label, role-labeled strikes, the constituent legs, and the quantity
//! consumed from each.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decomposition::store::LegId;

/// Strategy family; one output table per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Same-strike call + put, same direction.
    Straddle,
    /// Differing-strike call + put, same direction.
    Strangle,
    /// Call + put replicating a position in the underlying.
    Synthetic,
    /// Bull call vertical + bear put vertical at the same two strikes.
    BoxSpread,
    /// Long call + short put (or mirror) at different strikes.
    RiskReversal,
    /// Two calls, two strikes, opposite directions.
    CallVertical,
    /// Two puts, two strikes, opposite directions.
    PutVertical,
    /// Same strike/type, two maturities, opposite directions.
    CalendarSpread,
    /// Four-leg composite of a call-side and put-side vertical.
    IronCondor,
}

/// Sub-variant label attached to each match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyLabel {
    /// Long call + long put, same strike.
    LongStraddle,
    /// Short call + short put, same strike.
    ShortStraddle,
    /// Long call + long put, different strikes.
    LongStrangle,
    /// Short call + short put, different strikes.
    ShortStrangle,
    /// Long call + short put, same strike.
    SyntheticLong,
    /// Long put + short call, same strike.
    SyntheticShort,
    /// Long call leg at the lower strike.
    LongBoxSpread,
    /// Long call leg at the higher strike.
    ShortBoxSpread,
    /// Long call + short put at a lower strike.
    LongRiskReversal,
    /// Long put + short call at a higher strike.
    ShortRiskReversal,
    /// Long call below the short call strike.
    DebitCallSpread,
    /// Long call above the short call strike.
    CreditCallSpread,
    /// Long put below the short put strike.
    BullPutSpread,
    /// Long put above the short put strike.
    BearPutSpread,
    /// Long the far maturity, short the near.
    LongCalendarSpread,
    /// Short the far maturity, long the near.
    ShortCalendarSpread,
    /// Short body, long wings, all same maturity.
    IronCondor,
}

impl StrategyLabel {
    /// The strategy family this label belongs to.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::LongStraddle | Self::ShortStraddle => StrategyKind::Straddle,
            Self::LongStrangle | Self::ShortStrangle => StrategyKind::Strangle,
            Self::SyntheticLong | Self::SyntheticShort => StrategyKind::Synthetic,
            Self::LongBoxSpread | Self::ShortBoxSpread => StrategyKind::BoxSpread,
            Self::LongRiskReversal | Self::ShortRiskReversal => StrategyKind::RiskReversal,
            Self::DebitCallSpread | Self::CreditCallSpread => StrategyKind::CallVertical,
            Self::BullPutSpread | Self::BearPutSpread => StrategyKind::PutVertical,
            Self::LongCalendarSpread | Self::ShortCalendarSpread => StrategyKind::CalendarSpread,
            Self::IronCondor => StrategyKind::IronCondor,
        }
    }

    /// Number of option legs this strategy consumes per match.
    #[must_use]
    pub const fn leg_count(&self) -> usize {
        match self.kind() {
            StrategyKind::BoxSpread | StrategyKind::IronCondor => 4,
            _ => 2,
        }
    }
}

impl std::fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LongStraddle => "Long Straddle",
            Self::ShortStraddle => "Short Straddle",
            Self::LongStrangle => "Long Strangle",
            Self::ShortStrangle => "Short Strangle",
            Self::SyntheticLong => "Synthetic Long",
            Self::SyntheticShort => "Synthetic Short",
            Self::LongBoxSpread => "Long Box Spread",
            Self::ShortBoxSpread => "Short Box Spread",
            Self::LongRiskReversal => "Long Risk Reversal",
            Self::ShortRiskReversal => "Short Risk Reversal",
            Self::DebitCallSpread => "Debit Call Spread",
            Self::CreditCallSpread => "Credit Call Spread",
            Self::BullPutSpread => "Bull Put Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::LongCalendarSpread => "Long Calendar Spread",
            Self::ShortCalendarSpread => "Short Calendar Spread",
            Self::IronCondor => "Iron Condor",
        };
        write!(f, "{name}")
    }
}

/// Quantity consumed from one constituent leg, signed consistently
/// with the leg's direction (positive for long legs, negative for
/// short legs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegConsumption {
    /// The consumed leg.
    pub leg_id: LegId,
    /// Signed consumption amount.
    pub consumed: i64,
}

/// One emitted decomposition result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Sub-variant label.
    pub label: StrategyLabel,
    /// Client identifier.
    pub client: String,
    /// Underlying ticker.
    pub ticker: String,
    /// Maturity (the near maturity for calendar spreads).
    pub maturity: NaiveDate,
    /// Far maturity, calendar spreads only.
    pub far_maturity: Option<NaiveDate>,
    /// Strike of the bought call leg, if the strategy has one.
    pub buy_call_strike: Option<Decimal>,
    /// Strike of the sold call leg, if the strategy has one.
    pub sell_call_strike: Option<Decimal>,
    /// Strike of the bought put leg, if the strategy has one.
    pub buy_put_strike: Option<Decimal>,
    /// Strike of the sold put leg, if the strategy has one.
    pub sell_put_strike: Option<Decimal>,
    /// Underlying price at snapshot time.
    pub underlying_price: Decimal,
    /// Match quantity (equal absolute consumption across all legs).
    pub quantity: i64,
    /// Constituent legs and their signed consumption.
    pub legs: Vec<LegConsumption>,
}

impl MatchRecord {
    /// Start a record with no strike roles or legs attached.
    #[must_use]
    pub fn new(
        label: StrategyLabel,
        client: impl Into<String>,
        ticker: impl Into<String>,
        maturity: NaiveDate,
        underlying_price: Decimal,
        quantity: i64,
    ) -> Self {
        Self {
            label,
            client: client.into(),
            ticker: ticker.into(),
            maturity,
            far_maturity: None,
            buy_call_strike: None,
            sell_call_strike: None,
            buy_put_strike: None,
            sell_put_strike: None,
            underlying_price,
            quantity,
            legs: Vec::new(),
        }
    }

    /// Attach the bought call strike.
    #[must_use]
    pub const fn with_buy_call(mut self, strike: Decimal) -> Self {
        self.buy_call_strike = Some(strike);
        self
    }

    /// Attach the sold call strike.
    #[must_use]
    pub const fn with_sell_call(mut self, strike: Decimal) -> Self {
        self.sell_call_strike = Some(strike);
        self
    }

    /// Attach the bought put strike.
    #[must_use]
    pub const fn with_buy_put(mut self, strike: Decimal) -> Self {
        self.buy_put_strike = Some(strike);
        self
    }

    /// Attach the sold put strike.
    #[must_use]
    pub const fn with_sell_put(mut self, strike: Decimal) -> Self {
        self.sell_put_strike = Some(strike);
        self
    }

    /// Attach the far maturity (calendar spreads).
    #[must_use]
    pub const fn with_far_maturity(mut self, maturity: NaiveDate) -> Self {
        self.far_maturity = Some(maturity);
        self
    }

    /// Attach one constituent leg with its signed consumption.
    #[must_use]
    pub fn with_leg(mut self, leg_id: LegId, consumed: i64) -> Self {
        self.legs.push(LegConsumption { leg_id, consumed });
        self
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_label_kind_mapping() {
        assert_eq!(StrategyLabel::LongStraddle.kind(), StrategyKind::Straddle);
        assert_eq!(StrategyLabel::ShortBoxSpread.kind(), StrategyKind::BoxSpread);
        assert_eq!(StrategyLabel::BullPutSpread.kind(), StrategyKind::PutVertical);
        assert_eq!(StrategyLabel::IronCondor.kind(), StrategyKind::IronCondor);
    }

    #[test]
    fn test_label_leg_count() {
        assert_eq!(StrategyLabel::LongStraddle.leg_count(), 2);
        assert_eq!(StrategyLabel::LongBoxSpread.leg_count(), 4);
        assert_eq!(StrategyLabel::IronCondor.leg_count(), 4);
        assert_eq!(StrategyLabel::LongCalendarSpread.leg_count(), 2);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(StrategyLabel::LongBoxSpread.to_string(), "Long Box Spread");
        assert_eq!(StrategyLabel::SyntheticShort.to_string(), "Synthetic Short");
        assert_eq!(StrategyLabel::IronCondor.to_string(), "Iron Condor");
    }

    #[test]
    fn test_record_builder_roles() {
        let record = MatchRecord::new(
            StrategyLabel::SyntheticLong,
            "ClientA",
            "ABC",
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            dec!(100),
            6,
        )
        .with_buy_call(dec!(100))
        .with_sell_put(dec!(100))
        .with_leg(LegId::new(0), 6)
        .with_leg(LegId::new(1), -6);

        assert_eq!(record.buy_call_strike, Some(dec!(100)));
        assert_eq!(record.sell_put_strike, Some(dec!(100)));
        assert_eq!(record.buy_put_strike, None);
        assert_eq!(record.legs.len(), 2);
    }

    #[test]
    fn test_label_serde() {
        let json = serde_json::to_string(&StrategyLabel::LongBoxSpread).unwrap();
        assert_eq!(json, "\"long_box_spread\"");
        let parsed: StrategyLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StrategyLabel::LongBoxSpread);
    }
}
