use crate::domain::report::ZoneKpi;
use std::collections::BTreeMap;

/// 依各區域乘客人數比例分攤一組的車資：
/// `zone_share = group_cost * zone_count / group_size`
pub fn apportion(group_cost: f64, zone_counts: &BTreeMap<u32, usize>) -> BTreeMap<u32, f64> {
    let group_size: usize = zone_counts.values().sum();
    if group_size == 0 {
        return BTreeMap::new();
    }

    zone_counts
        .iter()
        .map(|(zone, count)| (*zone, group_cost * *count as f64 / group_size as f64))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ZoneTotals {
    cost: f64,
    occupants: usize,
}

/// 逐組累計各區域的分攤成本與人數
#[derive(Debug, Clone, Default)]
pub struct ZoneLedger {
    zones: BTreeMap<u32, ZoneTotals>,
}

impl ZoneLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group_cost: f64, zone_counts: &BTreeMap<u32, usize>) {
        for (zone, share) in apportion(group_cost, zone_counts) {
            let occupants = zone_counts.get(&zone).copied().unwrap_or(0);
            self.add(zone, share, occupants);
        }
    }

    pub fn add(&mut self, zone: u32, cost: f64, occupants: usize) {
        let totals = self.zones.entry(zone).or_default();
        totals.cost += cost;
        totals.occupants += occupants;
    }

    pub fn total_cost(&self) -> f64 {
        self.zones.values().map(|totals| totals.cost).sum()
    }

    pub fn kpis(&self) -> Vec<ZoneKpi> {
        self.zones
            .iter()
            .map(|(zone, totals)| ZoneKpi {
                zone: *zone,
                occupants: totals.occupants,
                total_cost: totals.cost,
                cost_per_person: if totals.occupants == 0 {
                    0.0
                } else {
                    totals.cost / totals.occupants as f64
                },
            })
            .collect()
    }
}
