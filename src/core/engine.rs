use crate::config::settings::Settings;
use crate::core::allocator::allocate_group;
use crate::core::attribution::ZoneLedger;
use crate::core::comparator;
use crate::core::grouping::group_records;
use crate::domain::fleet::VehicleCatalog;
use crate::domain::model::CommuteRecord;
use crate::domain::report::{Comparison, CostBreakdown, FleetPlan, GroupDetail, GroupingMode};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// 綁定一份設定快照的計算引擎。所有運算皆為同步、純函式，不做 I/O。
pub struct CostingEngine {
    settings: Arc<Settings>,
    catalog: VehicleCatalog,
}

impl CostingEngine {
    pub fn new(settings: Arc<Settings>) -> Result<Self> {
        settings.validate()?;
        let catalog = settings.catalog()?;
        tracing::debug!(
            "Costing engine ready with {} vehicle class(es), largest capacity {}",
            catalog.len(),
            catalog.largest_capacity()
        );
        Ok(Self { settings, catalog })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &VehicleCatalog {
        &self.catalog
    }

    /// 完整分析：方案比較、時間窗派車計畫與原排班基準計畫
    pub fn run(&self, records: &[CommuteRecord]) -> Result<CostBreakdown> {
        tracing::info!("Starting cost analysis of {} records", records.len());

        let comparison = self.compare(records)?;
        tracing::info!(
            "Option totals: flat {:.2}, metered {:.2}",
            comparison.flat.total,
            comparison.metered.total
        );

        let fleet = self.plan_with_mode(records, self.settings.grouping_mode()?)?;
        let baseline = self.plan_with_mode(records, GroupingMode::ExactSlot)?;
        let regrouping_savings = baseline.total_cost - fleet.total_cost;
        tracing::info!(
            "Fleet plan: {} vehicle(s) for {} group(s), {:.2} total ({:.2} saved by regrouping)",
            fleet.total_vehicles,
            fleet.group_count,
            fleet.total_cost,
            regrouping_savings
        );

        let employee_count = records
            .iter()
            .map(|record| record.employee_id())
            .collect::<BTreeSet<_>>()
            .len();

        Ok(CostBreakdown {
            record_count: records.len(),
            employee_count,
            comparison,
            fleet,
            baseline,
            regrouping_savings,
        })
    }

    pub fn compare(&self, records: &[CommuteRecord]) -> Result<Comparison> {
        comparator::compare(records, &self.settings)
    }

    /// 只做分組與派車；`window_minutes` 可覆寫設定中的時間窗
    pub fn plan(&self, records: &[CommuteRecord], window_minutes: Option<i64>) -> Result<FleetPlan> {
        let mode = match window_minutes {
            Some(minutes) => Settings::window_mode(minutes)?,
            None => self.settings.grouping_mode()?,
        };
        self.plan_with_mode(records, mode)
    }

    pub fn plan_with_mode(&self, records: &[CommuteRecord], mode: GroupingMode) -> Result<FleetPlan> {
        let groups = group_records(records, mode, &self.catalog)?;
        let limit = self.settings.detail_row_limit;

        let mut ledger = ZoneLedger::new();
        let mut details = Vec::with_capacity(groups.len().min(limit));
        let mut total_cost = 0.0;
        let mut total_vehicles = 0;
        let mut occupancy_sum = 0.0;

        for group in &groups {
            let allocation = allocate_group(group, &self.catalog)?;
            ledger.add_group(allocation.cost, &group.zone_counts());
            total_cost += allocation.cost;
            total_vehicles += allocation.vehicle_count;
            occupancy_sum += allocation.occupancy;

            if details.len() < limit {
                details.push(GroupDetail {
                    start_time: group.anchor(),
                    size: group.size(),
                    max_zone: group.max_zone(),
                    vehicle: allocation.vehicle,
                    vehicle_count: allocation.vehicle_count,
                    capacity: allocation.capacity_used,
                    cost: allocation.cost,
                    occupancy: allocation.occupancy,
                    employees: group.employee_ids(),
                });
            }
        }

        let average_occupancy = if groups.is_empty() {
            0.0
        } else {
            occupancy_sum / groups.len() as f64
        };

        Ok(FleetPlan {
            mode,
            group_count: groups.len(),
            total_vehicles,
            total_passengers: records.len(),
            total_cost,
            average_occupancy,
            zones: ledger.kpis(),
            details_truncated: groups.len() > details.len(),
            details,
        })
    }
}
