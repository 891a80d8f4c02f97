use crate::domain::model::Direction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneKpi {
    pub zone: u32,
    pub occupants: usize,
    pub total_cost: f64,
    pub cost_per_person: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GroupingMode {
    Window { minutes: u32 },
    ExactSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDetail {
    pub start_time: NaiveDateTime,
    pub size: usize,
    pub max_zone: u32,
    pub vehicle: String,
    pub vehicle_count: u32,
    pub capacity: u32,
    pub cost: f64,
    pub occupancy: f64,
    pub employees: Vec<String>,
}

/// 分組與派車的結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetPlan {
    pub mode: GroupingMode,
    pub group_count: usize,
    pub total_vehicles: u32,
    pub total_passengers: usize,
    pub total_cost: f64,
    /// 各組乘載率（人數 / 容量）的平均，0.0 – 1.0
    pub average_occupancy: f64,
    pub zones: Vec<ZoneKpi>,
    /// 最多 `detail_row_limit` 筆
    pub details: Vec<GroupDetail>,
    pub details_truncated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingOption {
    FlatSubscription,
    Metered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatOptionSummary {
    pub total: f64,
    pub employees: usize,
    pub zones: Vec<ZoneKpi>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrapolation {
    pub observed_days: usize,
    pub reference_days: u32,
    pub day_factor: f64,
    pub direction_factor: f64,
    pub morning_observed: bool,
    pub evening_observed: bool,
}

impl Extrapolation {
    pub fn factor(&self) -> f64 {
        self.day_factor * self.direction_factor
    }

    pub fn is_applied(&self) -> bool {
        self.day_factor != 1.0 || self.direction_factor != 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteredOptionSummary {
    /// 未外推前的實際觀測金額
    pub observed_total: f64,
    pub total: f64,
    pub trips: usize,
    pub extrapolation: Extrapolation,
    pub zones: Vec<ZoneKpi>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AdvisoryReason {
    InsufficientDays { observed: usize, required: u32 },
    MissingDirection { missing: Direction },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validity {
    /// 觀測天數足夠且兩個方向都有資料時，建議才具約束力
    pub binding: bool,
    pub extrapolated: bool,
    pub reasons: Vec<AdvisoryReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub best: PricingOption,
    pub savings: f64,
    pub binding: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub flat: FlatOptionSummary,
    pub metered: MeteredOptionSummary,
    pub recommendation: Recommendation,
    pub validity: Validity,
}

impl Comparison {
    pub fn total_for(&self, option: PricingOption) -> f64 {
        match option {
            PricingOption::FlatSubscription => self.flat.total,
            PricingOption::Metered => self.metered.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub total_cost: f64,
    pub total_savings: f64,
    pub average_occupancy: f64,
    pub total_employees: usize,
    pub total_vehicles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub record_count: usize,
    pub employee_count: usize,
    pub comparison: Comparison,
    /// 依時間窗重新分組後的派車計畫
    pub fleet: FleetPlan,
    /// 依原排班時段（完全相同的日期與時間）分組的基準計畫
    pub baseline: FleetPlan,
    pub regrouping_savings: f64,
}

impl CostBreakdown {
    pub fn dashboard(&self) -> DashboardKpis {
        let best = self.comparison.recommendation.best;
        DashboardKpis {
            total_cost: self.comparison.total_for(best),
            total_savings: self.comparison.recommendation.savings,
            average_occupancy: self.fleet.average_occupancy,
            total_employees: self.employee_count,
            total_vehicles: self.fleet.total_vehicles,
        }
    }
}
