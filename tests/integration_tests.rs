use anyhow::Result;
use commute_cost::adapters::load_planning;
use commute_cost::domain::ports::Storage;
use commute_cost::domain::report::{CostBreakdown, GroupingMode, PricingOption};
use commute_cost::{CostingEngine, LocalStorage, SettingsStore, TomlConfig};
use std::fmt::Write as _;
use tempfile::TempDir;

const SETTINGS_TOML: &str = r#"
[grouping]
window_minutes = 20

[[vehicles]]
name = "Hiace"
capacity = 13
base_price = 25000

[[vehicles]]
name = "Berline"
capacity = 4
base_price = 10000

[vehicles.zone_prices]
2 = 7500

[pricing]
default_metered_price = 900
flat_prices = { 1 = 45000, 2 = 55000, 3 = 65000 }

[pricing.line_prices]
L1 = 1000

[sampling]
min_rows = 4
reference_month_days = 22

[report]
detail_row_limit = 50
"#;

/// 22 working days, two employees, both directions every day
fn full_month_planning() -> String {
    let mut csv = String::from("Employee ID,Date,Time,Zone,Line\n");
    for day in 1..=22 {
        let date = format!("2024-03-{:02}", day);
        writeln!(csv, "E1,{},07:30,1,L1", date).unwrap();
        writeln!(csv, "E2,{},07:40,Zone 2,L1", date).unwrap();
        writeln!(csv, "E1,{},17:30,1,L1", date).unwrap();
        writeln!(csv, "E2,{},17:35,B,unknown-line", date).unwrap();
    }
    csv
}

#[tokio::test]
async fn test_end_to_end_from_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let storage = LocalStorage::new(temp_dir.path());

    storage
        .write_file("settings.toml", SETTINGS_TOML.as_bytes())
        .await?;
    storage
        .write_file("planning.csv", full_month_planning().as_bytes())
        .await?;

    let settings = TomlConfig::from_file(temp_dir.path().join("settings.toml"))?.into_settings();
    let store = SettingsStore::new(settings)?;
    let engine = CostingEngine::new(store.snapshot())?;

    let import = load_planning(&storage, "planning.csv").await?;
    assert_eq!(import.records.len(), 88);
    assert!(import.skipped.is_empty());

    let breakdown = engine.run(&import.records)?;
    let comparison = &breakdown.comparison;

    // E1 zone 1, E2 zone 2
    assert_eq!(comparison.flat.total, 45000.0 + 55000.0);
    // 66 trips on L1 + 22 trips on an unknown line
    assert_eq!(comparison.metered.total, 66.0 * 1000.0 + 22.0 * 900.0);
    assert!(comparison.validity.binding);
    assert!(!comparison.validity.extrapolated);
    assert_eq!(comparison.recommendation.best, PricingOption::Metered);

    // morning and evening pairs share a Berline every day
    assert_eq!(
        breakdown.fleet.mode,
        GroupingMode::Window { minutes: 20 }
    );
    assert_eq!(breakdown.fleet.group_count, 44);
    assert_eq!(breakdown.fleet.total_vehicles, 44);
    assert_eq!(breakdown.fleet.total_cost, 44.0 * 7500.0);
    assert_eq!(breakdown.baseline.group_count, 88);
    assert!(breakdown.regrouping_savings > 0.0);
    assert_eq!(breakdown.fleet.details.len(), 44);

    let json = serde_json::to_vec_pretty(&breakdown)?;
    storage.write_file("out/breakdown.json", &json).await?;
    let restored: CostBreakdown =
        serde_json::from_slice(&storage.read_file("out/breakdown.json").await?)?;
    assert_eq!(restored.fleet.total_cost, breakdown.fleet.total_cost);

    Ok(())
}

#[tokio::test]
async fn test_invalid_settings_file_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("settings.toml");
    tokio::fs::write(&path, "[grouping]\nwindow_minutes = -5\n").await?;

    let settings = TomlConfig::from_file(&path)?.into_settings();
    assert!(SettingsStore::new(settings).is_err());

    Ok(())
}
