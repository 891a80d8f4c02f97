use crate::config::settings::Settings;
use crate::utils::validation::{validate_non_empty_string, Validate};
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "commute-cost")]
#[command(about = "Compare commute pricing options and plan a cost-minimal fleet")]
pub struct CliConfig {
    /// Planning file (CSV with Employee ID, Date, Time, Zone, Line columns)
    #[arg(long, short)]
    pub planning: String,

    /// TOML settings file; built-in defaults are used when omitted
    #[arg(long, short)]
    pub config: Option<String>,

    /// Override the grouping window (minutes)
    #[arg(long)]
    pub window: Option<i64>,

    /// Override the minimum number of planning rows
    #[arg(long)]
    pub min_rows: Option<usize>,

    /// Write the full breakdown as JSON to this file
    #[arg(long)]
    pub output: Option<String>,

    /// Print the full breakdown as JSON instead of the summary
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 命令列參數覆寫設定檔的值
    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(window) = self.window {
            tracing::info!("🔧 Grouping window overridden to: {} min", window);
            settings.grouping_window_minutes = window;
        }
        if let Some(min_rows) = self.min_rows {
            tracing::info!("🔧 Minimum rows overridden to: {}", min_rows);
            settings.min_rows = min_rows;
        }
        settings
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("planning", &self.planning)?;
        if let Some(output) = &self.output {
            validate_non_empty_string("output", output)?;
        }
        Ok(())
    }
}
