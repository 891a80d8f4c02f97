use crate::utils::error::{CostError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative_price, validate_positive_number,
    validate_unique_names,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 區域等級 → 價格表
///
/// TOML 的 key 一定是字串，所以序列化時以字串 key 表示，載入時轉成 `u32`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ZonePrices(BTreeMap<u32, f64>);

impl ZonePrices {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_price(mut self, tier: u32, price: f64) -> Self {
        self.0.insert(tier, price);
        self
    }

    pub fn get(&self, tier: u32) -> Option<f64> {
        self.0.get(&tier).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.0.iter().map(|(tier, price)| (*tier, *price))
    }

    pub(crate) fn validate(&self, field_name: &str) -> Result<()> {
        for (tier, price) in self.iter() {
            validate_non_negative_price(&format!("{}.{}", field_name, tier), price)?;
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, f64>> for ZonePrices {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> std::result::Result<Self, Self::Error> {
        let mut prices = BTreeMap::new();
        for (key, price) in raw {
            let tier: u32 = key
                .trim()
                .parse()
                .map_err(|_| format!("zone tier `{}` is not a positive integer", key))?;
            if tier == 0 {
                return Err("zone tier 0 is not allowed, tiers start at 1".to_string());
            }
            prices.insert(tier, price);
        }
        Ok(Self(prices))
    }
}

impl From<ZonePrices> for BTreeMap<String, f64> {
    fn from(prices: ZonePrices) -> Self {
        prices
            .0
            .into_iter()
            .map(|(tier, price)| (tier.to_string(), price))
            .collect()
    }
}

impl FromIterator<(u32, f64)> for ZonePrices {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleClass {
    pub name: String,
    pub capacity: u32,
    pub base_price: f64,
    #[serde(default)]
    pub zone_prices: ZonePrices,
}

impl VehicleClass {
    pub fn new(name: impl Into<String>, capacity: u32, base_price: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            base_price,
            zone_prices: ZonePrices::new(),
        }
    }

    pub fn with_zone_price(mut self, tier: u32, price: f64) -> Self {
        self.zone_prices = self.zone_prices.with_price(tier, price);
        self
    }

    /// 區域有覆寫價就用覆寫價，否則用基本價
    pub fn price_for_zone(&self, tier: u32) -> f64 {
        self.zone_prices.get(tier).unwrap_or(self.base_price)
    }
}

/// 依容量由小到大排序的車型清單，建立時即完成驗證，因此永遠不會是空的。
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleCatalog {
    classes: Vec<VehicleClass>,
}

impl VehicleCatalog {
    pub fn new(mut classes: Vec<VehicleClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(CostError::config(
                "vehicle_types",
                "the vehicle catalog must contain at least one vehicle class",
            ));
        }

        for (index, class) in classes.iter().enumerate() {
            let field = format!("vehicle_types[{}]", index);
            validate_non_empty_string(&format!("{}.name", field), &class.name)?;
            validate_positive_number(&format!("{}.capacity", field), class.capacity, 1)?;
            validate_non_negative_price(&format!("{}.base_price", field), class.base_price)?;
            class
                .zone_prices
                .validate(&format!("{}.zone_prices", field))?;
        }
        validate_unique_names("vehicle_types", classes.iter().map(|c| c.name.as_str()))?;

        // 穩定排序：容量相同時保留設定檔中的順序
        classes.sort_by_key(|class| class.capacity);
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[VehicleClass] {
        &self.classes
    }

    pub fn smallest(&self) -> &VehicleClass {
        &self.classes[0]
    }

    pub fn largest_capacity(&self) -> u32 {
        self.classes
            .last()
            .map(|class| class.capacity)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
