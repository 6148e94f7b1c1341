//! End-to-end decomposition scenarios through the public engine API.

use chrono::NaiveDate;
use decomposition_engine::{
    DecompositionEngine, DecompositionReport, LegRecord, OptionType, StrategyLabel,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn make_leg(option_type: OptionType, quantity: i64, strike: Decimal) -> LegRecord {
    LegRecord {
        client: "ClientA".to_string(),
        ticker: "ABC".to_string(),
        maturity: NaiveDate::from_ymd_opt(2024, 12, 20).unwrap(),
        strike,
        option_type,
        quantity,
        underlying_price: dec!(100),
    }
}

fn decompose(legs: Vec<LegRecord>) -> DecompositionReport {
    DecompositionEngine::default()
        .decompose(legs)
        .expect("decomposition must not fail")
}

#[test]
fn test_long_box_spread_scenario() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 5, dec!(95)),
        make_leg(OptionType::Call, -5, dec!(105)),
        make_leg(OptionType::Put, -5, dec!(95)),
        make_leg(OptionType::Put, 5, dec!(105)),
    ]);

    assert_eq!(report.match_count(), 1);
    let row = &report.box_spreads[0];
    assert_eq!(row.label, StrategyLabel::LongBoxSpread);
    assert_eq!(row.quantity, 5);
    assert_eq!(row.buy_call_strike, Some(dec!(95)));
    assert_eq!(row.sell_put_strike, Some(dec!(95)));
    assert_eq!(row.buy_put_strike, Some(dec!(105)));
    assert_eq!(row.sell_call_strike, Some(dec!(105)));
    assert!(report.residuals.is_empty());
}

#[test]
fn test_long_straddle_scenario() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 5, dec!(100)),
        make_leg(OptionType::Put, 5, dec!(100)),
    ]);

    assert_eq!(report.match_count(), 1);
    let row = &report.straddles[0];
    assert_eq!(row.label, StrategyLabel::LongStraddle);
    assert_eq!(row.quantity, 5);
    assert!(report.residuals.is_empty());
}

#[test]
fn test_synthetic_long_with_residual_scenario() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 10, dec!(100)),
        make_leg(OptionType::Put, -6, dec!(100)),
    ]);

    assert_eq!(report.match_count(), 1);
    let row = &report.synthetics[0];
    assert_eq!(row.label, StrategyLabel::SyntheticLong);
    assert_eq!(row.quantity, 6);

    assert_eq!(report.residuals.len(), 1);
    let residual = &report.residuals[0];
    assert_eq!(residual.option_type, OptionType::Call);
    assert_eq!(residual.strike, dec!(100));
    assert_eq!(residual.quantity, 4);
}

#[test]
fn test_call_verticals_pair_by_ascending_strike() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 5, dec!(90)),
        make_leg(OptionType::Call, -5, dec!(110)),
        make_leg(OptionType::Call, -5, dec!(95)),
        make_leg(OptionType::Call, 5, dec!(105)),
    ]);

    // Lowest-strike long pairs with lowest-strike short first
    assert_eq!(report.call_spreads.len(), 2);
    assert_eq!(report.call_spreads[0].label, StrategyLabel::DebitCallSpread);
    assert_eq!(report.call_spreads[0].buy_call_strike, Some(dec!(90)));
    assert_eq!(report.call_spreads[0].sell_call_strike, Some(dec!(95)));
    assert_eq!(report.call_spreads[1].label, StrategyLabel::DebitCallSpread);
    assert_eq!(report.call_spreads[1].buy_call_strike, Some(dec!(105)));
    assert_eq!(report.call_spreads[1].sell_call_strike, Some(dec!(110)));
    assert!(report.residuals.is_empty());
}

#[test]
fn test_lone_leg_becomes_residual() {
    let report = decompose(vec![make_leg(OptionType::Put, 3, dec!(120))]);

    assert_eq!(report.match_count(), 0);
    assert_eq!(report.residuals.len(), 1);
    assert_eq!(report.residuals[0].strike, dec!(120));
    assert_eq!(report.residuals[0].quantity, 3);
}

#[test]
fn test_iron_condor_scenario() {
    let report = decompose(vec![
        make_leg(OptionType::Put, 2, dec!(85)),
        make_leg(OptionType::Put, -2, dec!(90)),
        make_leg(OptionType::Call, -2, dec!(110)),
        make_leg(OptionType::Call, 2, dec!(115)),
    ]);

    assert_eq!(report.match_count(), 1);
    let row = &report.iron_condors[0];
    assert_eq!(row.label, StrategyLabel::IronCondor);
    assert_eq!(row.quantity, 2);
    assert!(report.residuals.is_empty());
}

#[test]
fn test_risk_reversal_scenario() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 4, dec!(110)),
        make_leg(OptionType::Put, -4, dec!(90)),
    ]);

    assert_eq!(report.match_count(), 1);
    assert_eq!(
        report.risk_reversals[0].label,
        StrategyLabel::LongRiskReversal
    );
}

#[test]
fn test_calendar_spread_across_maturities() {
    let near = NaiveDate::from_ymd_opt(2024, 9, 20).unwrap();
    let far = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();
    let legs = vec![
        LegRecord {
            maturity: far,
            ..make_leg(OptionType::Call, 5, dec!(100))
        },
        LegRecord {
            maturity: near,
            ..make_leg(OptionType::Call, -5, dec!(100))
        },
    ];

    let report = decompose(legs);

    assert_eq!(report.match_count(), 1);
    let row = &report.calendar_spreads[0];
    assert_eq!(row.label, StrategyLabel::LongCalendarSpread);
    assert_eq!(row.maturity, near);
    assert_eq!(row.far_maturity, Some(far));
    assert!(report.residuals.is_empty());
}

#[test]
fn test_deterministic_output_across_runs() {
    let legs = vec![
        make_leg(OptionType::Call, 7, dec!(95)),
        make_leg(OptionType::Call, -5, dec!(105)),
        make_leg(OptionType::Put, -5, dec!(95)),
        make_leg(OptionType::Put, 5, dec!(105)),
        make_leg(OptionType::Put, 3, dec!(90)),
        make_leg(OptionType::Call, -4, dec!(110)),
    ];

    let first = decompose(legs.clone());
    let second = decompose(legs);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_rerun_on_residuals_yields_no_matches() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 10, dec!(100)),
        make_leg(OptionType::Put, -6, dec!(100)),
        make_leg(OptionType::Put, 3, dec!(80)),
    ]);
    assert!(!report.residuals.is_empty());

    let rerun_input: Vec<LegRecord> = report
        .residuals
        .iter()
        .map(|residual| LegRecord {
            client: residual.client.clone(),
            ticker: residual.ticker.clone(),
            maturity: residual.maturity,
            strike: residual.strike,
            option_type: residual.option_type,
            quantity: residual.quantity,
            underlying_price: dec!(100),
        })
        .collect();

    let rerun = decompose(rerun_input);
    assert_eq!(rerun.match_count(), 0);
    assert_eq!(rerun.residuals.len(), report.residuals.len());
}

#[test]
fn test_multiple_units_report_in_key_order() {
    let mut legs = Vec::new();
    for (client, ticker) in [("ClientB", "XYZ"), ("ClientA", "ABC"), ("ClientA", "XYZ")] {
        for leg in [
            make_leg(OptionType::Call, 5, dec!(100)),
            make_leg(OptionType::Put, 5, dec!(100)),
        ] {
            legs.push(LegRecord {
                client: client.to_string(),
                ticker: ticker.to_string(),
                ..leg
            });
        }
    }

    let report = decompose(legs);

    assert_eq!(report.straddles.len(), 3);
    let keys: Vec<(&str, &str)> = report
        .straddles
        .iter()
        .map(|row| (row.client.as_str(), row.ticker.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("ClientA", "ABC"),
            ("ClientA", "XYZ"),
            ("ClientB", "XYZ"),
        ]
    );
}

#[test]
fn test_partial_box_leaves_synthetic_remainder() {
    let report = decompose(vec![
        make_leg(OptionType::Call, 9, dec!(95)),
        make_leg(OptionType::Put, -9, dec!(95)),
        make_leg(OptionType::Put, 5, dec!(105)),
        make_leg(OptionType::Call, -5, dec!(105)),
    ]);

    assert_eq!(report.box_spreads.len(), 1);
    assert_eq!(report.box_spreads[0].quantity, 5);
    assert_eq!(report.synthetics.len(), 1);
    assert_eq!(report.synthetics[0].label, StrategyLabel::SyntheticLong);
    assert_eq!(report.synthetics[0].quantity, 4);
    assert!(report.residuals.is_empty());
}
