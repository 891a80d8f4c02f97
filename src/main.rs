use clap::Parser;
use commute_cost::adapters::load_planning;
use commute_cost::domain::ports::Storage;
use commute_cost::domain::report::PricingOption;
use commute_cost::utils::error::ErrorSeverity;
use commute_cost::utils::{logger, validation::Validate};
use commute_cost::{
    CliConfig, CostBreakdown, CostError, CostingEngine, LocalStorage, Settings, SettingsStore,
    TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting commute-cost CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    match run(&config).await {
        Ok(breakdown) => {
            if config.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print_summary(&breakdown);
            }
            if let Some(output) = &config.output {
                tracing::info!("📁 Breakdown saved to: {}", output);
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<CostBreakdown, CostError> {
    let storage = LocalStorage::current_dir();

    // 載入設定檔，未指定時使用預設值
    let settings = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let data = storage.read_file(path).await?;
            TomlConfig::from_toml_bytes(&data)?.into_settings()
        }
        None => Settings::default(),
    };

    let store = SettingsStore::new(config.apply_overrides(settings))?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let engine = CostingEngine::new(store.snapshot())?;
    let import = load_planning(&storage, &config.planning).await?;
    if !import.skipped.is_empty() {
        tracing::warn!(
            "{} planning row(s) could not be read and were ignored",
            import.skipped.len()
        );
    }

    let breakdown = engine.run(&import.records)?;

    if let Some(output) = &config.output {
        let json = serde_json::to_vec_pretty(&breakdown)?;
        storage.write_file(output, &json).await?;
    }

    Ok(breakdown)
}

fn print_summary(breakdown: &CostBreakdown) {
    let comparison = &breakdown.comparison;
    let best = match comparison.recommendation.best {
        PricingOption::FlatSubscription => "Option A (flat zone subscription)",
        PricingOption::Metered => "Option B (metered per trip)",
    };

    println!(
        "📋 {} rows, {} employees",
        breakdown.record_count, breakdown.employee_count
    );
    println!("Option A (flat):    {:>14.2}", comparison.flat.total);
    println!(
        "Option B (metered): {:>14.2}  (observed {:.2}, x{:.3})",
        comparison.metered.total,
        comparison.metered.observed_total,
        comparison.metered.extrapolation.factor()
    );
    println!(
        "✅ Recommended: {}, saves {:.2}",
        best, comparison.recommendation.savings
    );
    if !comparison.validity.binding {
        println!("⚠️  Advisory only: {:?}", comparison.validity.reasons);
    }

    let fleet = &breakdown.fleet;
    println!(
        "🚐 Fleet plan: {} vehicle(s), {} group(s), {:.2} total, {:.1}% average occupancy",
        fleet.total_vehicles,
        fleet.group_count,
        fleet.total_cost,
        fleet.average_occupancy * 100.0
    );
    println!(
        "   As scheduled: {:.2} ({:.2} saved by regrouping)",
        breakdown.baseline.total_cost, breakdown.regrouping_savings
    );
    for zone in &fleet.zones {
        println!(
            "   Zone {}: {} passenger(s), {:.2} total, {:.2} per person",
            zone.zone, zone.occupants, zone.total_cost, zone.cost_per_person
        );
    }
}

fn exit_with(e: &CostError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Cost analysis failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
