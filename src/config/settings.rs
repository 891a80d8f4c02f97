use crate::domain::fleet::{VehicleCatalog, VehicleClass, ZonePrices};
use crate::domain::report::GroupingMode;
use crate::utils::error::{CostError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative_price, validate_positive_number,
    validate_range, validate_unique_names, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_GROUPING_WINDOW_MINUTES: i64 = 20;
pub const DEFAULT_REFERENCE_MONTH_DAYS: u32 = 22;
pub const DEFAULT_DETAIL_ROW_LIMIT: usize = 50;
pub const DEFAULT_MIN_ROWS: usize = 10;
pub const DEFAULT_EVENING_CUTOFF_HOUR: u32 = 12;

/// 一次計算所使用的完整設定快照。
///
/// 計算期間不可變；更新時整個物件替換（見 [`crate::config::store::SettingsStore`]）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grouping_window_minutes: i64,
    pub vehicle_types: Vec<VehicleClass>,
    /// 方案 A：各區域月費
    pub flat_prices: ZonePrices,
    /// 方案 B：各路線單趟價格
    pub line_prices: BTreeMap<String, f64>,
    pub default_metered_price: f64,
    pub min_rows: usize,
    pub reference_month_days: u32,
    pub evening_cutoff_hour: u32,
    pub detail_row_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grouping_window_minutes: DEFAULT_GROUPING_WINDOW_MINUTES,
            vehicle_types: vec![
                VehicleClass::new("Berline", 4, 10000.0)
                    .with_zone_price(1, 10000.0)
                    .with_zone_price(2, 12500.0)
                    .with_zone_price(3, 15000.0),
                VehicleClass::new("Hiace", 13, 25000.0)
                    .with_zone_price(1, 25000.0)
                    .with_zone_price(2, 30000.0)
                    .with_zone_price(3, 35000.0),
            ],
            flat_prices: ZonePrices::new()
                .with_price(1, 45000.0)
                .with_price(2, 55000.0)
                .with_price(3, 65000.0),
            line_prices: BTreeMap::new(),
            default_metered_price: 2500.0,
            min_rows: DEFAULT_MIN_ROWS,
            reference_month_days: DEFAULT_REFERENCE_MONTH_DAYS,
            evening_cutoff_hour: DEFAULT_EVENING_CUTOFF_HOUR,
            detail_row_limit: DEFAULT_DETAIL_ROW_LIMIT,
        }
    }
}

impl Settings {
    pub fn catalog(&self) -> Result<VehicleCatalog> {
        VehicleCatalog::new(self.vehicle_types.clone())
    }

    pub fn grouping_mode(&self) -> Result<GroupingMode> {
        Self::window_mode(self.grouping_window_minutes)
    }

    pub fn window_mode(minutes: i64) -> Result<GroupingMode> {
        validate_positive_number("grouping_window_minutes", minutes, 1)?;
        let minutes = u32::try_from(minutes).map_err(|_| {
            CostError::config("grouping_window_minutes", "window is too large")
        })?;
        Ok(GroupingMode::Window { minutes })
    }

    /// 未定價的區域退回第 1 區的價格
    pub fn flat_price(&self, tier: u32) -> f64 {
        self.flat_prices
            .get(tier)
            .or_else(|| self.flat_prices.get(1))
            .unwrap_or_default()
    }

    /// 未知路線使用預設單價；路線名稱比對不分大小寫與前後空白
    pub fn metered_price(&self, line: &str) -> f64 {
        let line = line.trim();
        self.line_prices
            .get(line)
            .copied()
            .or_else(|| {
                self.line_prices
                    .iter()
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case(line))
                    .map(|(_, price)| *price)
            })
            .unwrap_or(self.default_metered_price)
    }

    pub fn validate_settings(&self) -> Result<()> {
        self.grouping_mode()?;
        self.catalog()?;

        if self.flat_prices.get(1).is_none() {
            return Err(CostError::config(
                "flat_prices",
                "a price for zone 1 is required as the fallback tier",
            ));
        }
        self.flat_prices.validate("flat_prices")?;

        for (line, price) in &self.line_prices {
            validate_non_empty_string("line_prices", line)?;
            validate_non_negative_price(&format!("line_prices.{}", line), *price)?;
        }
        validate_unique_names("line_prices", self.line_prices.keys().map(String::as_str))?;
        validate_non_negative_price("default_metered_price", self.default_metered_price)?;

        validate_positive_number("reference_month_days", self.reference_month_days, 1)?;
        validate_range("evening_cutoff_hour", self.evening_cutoff_hour, 1, 23)?;
        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(
            settings.grouping_mode().unwrap(),
            GroupingMode::Window { minutes: 20 }
        );
    }

    #[test]
    fn test_non_positive_window_rejected() {
        for window in [0, -20] {
            let settings = Settings {
                grouping_window_minutes: window,
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(CostError::ConfigurationError { .. })
            ));
        }
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let settings = Settings {
            vehicle_types: vec![],
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_flat_price_falls_back_to_zone_one() {
        let settings = Settings::default();
        assert_eq!(settings.flat_price(3), 65000.0);
        assert_eq!(settings.flat_price(9), 45000.0);
    }

    #[test]
    fn test_flat_prices_require_zone_one() {
        let settings = Settings {
            flat_prices: ZonePrices::new().with_price(2, 55000.0),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_metered_price_lookup_and_default() {
        let mut settings = Settings::default();
        settings.line_prices.insert("L1".to_string(), 1800.0);

        assert_eq!(settings.metered_price("L1"), 1800.0);
        assert_eq!(settings.metered_price(" l1 "), 1800.0);
        assert_eq!(settings.metered_price("L404"), 2500.0);
        assert_eq!(settings.metered_price(""), 2500.0);
    }
}
