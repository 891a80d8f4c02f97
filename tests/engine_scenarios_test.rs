use chrono::NaiveDateTime;
use commute_cost::core::allocator::allocate;
use commute_cost::core::grouping::group_records;
use commute_cost::core::zone::classify_zone;
use commute_cost::domain::report::{GroupingMode, PricingOption, ZoneKpi};
use commute_cost::{
    CommuteRecord, CostError, CostingEngine, Settings, VehicleCatalog, VehicleClass, ZonePrices,
};
use std::sync::Arc;

fn at(stamp: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M").unwrap()
}

fn scenario_settings(min_rows: usize) -> Settings {
    Settings {
        flat_prices: ZonePrices::new()
            .with_price(1, 45000.0)
            .with_price(2, 55000.0)
            .with_price(3, 65000.0),
        min_rows,
        ..Settings::default()
    }
}

fn scenario_records() -> Vec<CommuteRecord> {
    vec![
        CommuteRecord::new("E1", at("2024-03-04 07:00"), "1", "L1"),
        CommuteRecord::new("E1", at("2024-03-04 17:00"), "1", "L1"),
        CommuteRecord::new("E2", at("2024-03-04 07:05"), "2", "L1"),
        CommuteRecord::new("E2", at("2024-03-05 07:05"), "2", "L1"),
        CommuteRecord::new("E2", at("2024-03-05 17:05"), "3", "L1"),
    ]
}

#[test]
fn test_five_record_scenario_succeeds_at_threshold() {
    let engine = CostingEngine::new(Arc::new(scenario_settings(5))).unwrap();

    let breakdown = engine.run(&scenario_records()).unwrap();

    // E1 max zone 1, E2 max zone 3
    assert_eq!(breakdown.comparison.flat.total, 45000.0 + 65000.0);
    assert_eq!(breakdown.record_count, 5);
    assert_eq!(breakdown.employee_count, 2);
    assert!(!breakdown.comparison.validity.binding);
    assert!(breakdown.comparison.validity.extrapolated);
}

#[test]
fn test_five_record_scenario_fails_with_large_threshold() {
    let engine = CostingEngine::new(Arc::new(scenario_settings(10000))).unwrap();

    let result = engine.run(&scenario_records());

    match result {
        Err(CostError::InsufficientDataError { observed, required }) => {
            assert_eq!((observed, required), (5, 10000));
        }
        other => panic!("expected InsufficientDataError, got {:?}", other),
    }
}

#[test]
fn test_fourteen_passengers_replicate_berline() {
    let catalog = VehicleCatalog::new(vec![
        VehicleClass::new("Berline", 4, 10000.0).with_zone_price(2, 7500.0),
        VehicleClass::new("Hiace", 13, 25000.0).with_zone_price(2, 35000.0),
    ])
    .unwrap();

    let result = allocate(14, 2, &catalog).unwrap();

    assert_eq!(result.vehicle_count, 4);
    assert_eq!(result.vehicle_name, "Berline");
    assert_eq!(result.cost, 30000.0);
}

#[test]
fn test_twenty_minute_window_scenario() {
    let catalog = Settings::default().catalog().unwrap();
    let records = vec![
        CommuteRecord::new("E1", at("2024-03-04 08:00"), "1", "L1"),
        CommuteRecord::new("E2", at("2024-03-04 08:10"), "1", "L1"),
        CommuteRecord::new("E3", at("2024-03-04 08:25"), "1", "L1"),
    ];

    let groups = group_records(&records, GroupingMode::Window { minutes: 20 }, &catalog).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].employee_ids(), vec!["E1", "E2"]);
    assert_eq!(groups[1].employee_ids(), vec!["E3"]);
}

#[test]
fn test_zone_tokens_resolve_to_positive_tiers() {
    for token in ["3", "Zone 2", "b", "", "???", "0", "C-12"] {
        let tier = classify_zone(token);
        assert!(tier >= 1);
        assert_eq!(tier, classify_zone(token));
    }
    assert_eq!(classify_zone("C-12"), 12);
}

fn zone_sum(zones: &[ZoneKpi]) -> f64 {
    zones.iter().map(|zone| zone.total_cost).sum()
}

#[test]
fn test_attributed_costs_sum_to_totals() {
    let engine = CostingEngine::new(Arc::new(scenario_settings(1))).unwrap();
    let breakdown = engine.run(&scenario_records()).unwrap();

    let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
    let comparison = &breakdown.comparison;

    assert!(close(zone_sum(&comparison.flat.zones), comparison.flat.total));
    assert!(close(zone_sum(&comparison.metered.zones), comparison.metered.total));
    assert!(close(zone_sum(&breakdown.fleet.zones), breakdown.fleet.total_cost));
    assert!(close(zone_sum(&breakdown.baseline.zones), breakdown.baseline.total_cost));
}

#[test]
fn test_cheaper_metered_option_wins() {
    let settings = Settings {
        default_metered_price: 10.0,
        ..scenario_settings(1)
    };
    let engine = CostingEngine::new(Arc::new(settings)).unwrap();

    let comparison = engine.compare(&scenario_records()).unwrap();

    assert_eq!(comparison.recommendation.best, PricingOption::Metered);
    assert!(!comparison.recommendation.binding);
    let expected = comparison.flat.total - comparison.metered.total;
    assert!((comparison.recommendation.savings - expected).abs() < 1e-9);
}
