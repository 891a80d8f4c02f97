use crate::config::settings::Settings;
use crate::domain::fleet::{VehicleClass, ZonePrices};
use crate::utils::error::{CostError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 設定檔格式。所有區段皆為選填，未填的欄位沿用 [`Settings::default`]。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub grouping: Option<GroupingConfig>,
    pub vehicles: Option<Vec<VehicleClass>>,
    pub pricing: Option<PricingConfig>,
    pub sampling: Option<SamplingConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub window_minutes: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub flat_prices: Option<ZonePrices>,
    pub line_prices: Option<BTreeMap<String, f64>>,
    pub default_metered_price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub min_rows: Option<usize>,
    pub reference_month_days: Option<u32>,
    pub evening_cutoff_hour: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub detail_row_limit: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從儲存層讀回的原始位元組解析配置，非 UTF-8 內容視為設定錯誤
    pub fn from_toml_bytes(data: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(data)
            .map_err(|e| CostError::config("config", format!("file is not valid UTF-8: {}", e)))?;
        Self::from_toml_str(content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${LINE_PRICE})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CostError::config("environment", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 套用到預設設定上，產生完整的設定快照
    pub fn into_settings(self) -> Settings {
        let mut settings = Settings::default();

        if let Some(window) = self.grouping.and_then(|g| g.window_minutes) {
            settings.grouping_window_minutes = window;
        }
        if let Some(vehicles) = self.vehicles {
            settings.vehicle_types = vehicles;
        }
        if let Some(pricing) = self.pricing {
            if let Some(flat_prices) = pricing.flat_prices {
                settings.flat_prices = flat_prices;
            }
            if let Some(line_prices) = pricing.line_prices {
                settings.line_prices = line_prices;
            }
            if let Some(price) = pricing.default_metered_price {
                settings.default_metered_price = price;
            }
        }
        if let Some(sampling) = self.sampling {
            if let Some(min_rows) = sampling.min_rows {
                settings.min_rows = min_rows;
            }
            if let Some(days) = sampling.reference_month_days {
                settings.reference_month_days = days;
            }
            if let Some(hour) = sampling.evening_cutoff_hour {
                settings.evening_cutoff_hour = hour;
            }
        }
        if let Some(limit) = self.report.and_then(|r| r.detail_row_limit) {
            settings.detail_row_limit = limit;
        }

        settings
    }

    pub fn validate_config(&self) -> Result<()> {
        self.clone().into_settings().validate()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
