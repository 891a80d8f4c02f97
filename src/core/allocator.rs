use crate::domain::fleet::{VehicleCatalog, VehicleClass};
use crate::domain::model::{AllocationResult, RideGroup};
use crate::utils::error::{CostError, Result};
use std::cmp::Ordering;

/// 一個可行的派車方案：同一車型 `count` 台
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'c> {
    class: &'c VehicleClass,
    catalog_index: usize,
    count: u32,
    unit_price: f64,
}

impl Candidate<'_> {
    fn cost(&self) -> f64 {
        self.unit_price * f64::from(self.count)
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.cost()
            .total_cmp(&other.cost())
            .then(self.count.cmp(&other.count))
            .then(self.catalog_index.cmp(&other.catalog_index))
    }
}

/// 產生候選方案：
/// - 每個容量足夠的車型各一台
/// - 最小車型複製 ⌈人數 / 容量⌉ 台（只有一台時與上一類重複，略過）
pub(crate) fn candidates(
    size: usize,
    zone: u32,
    catalog: &VehicleCatalog,
) -> Result<Vec<Candidate<'_>>> {
    let mut candidates: Vec<Candidate<'_>> = catalog
        .classes()
        .iter()
        .enumerate()
        .filter(|(_, class)| class.capacity as usize >= size)
        .map(|(catalog_index, class)| Candidate {
            class,
            catalog_index,
            count: 1,
            unit_price: class.price_for_zone(zone),
        })
        .collect();

    let smallest = catalog.smallest();
    let copies = u32::try_from(size.div_ceil(smallest.capacity as usize))
        .map_err(|_| CostError::InvalidGroupSize { size })?;
    if copies > 1 {
        candidates.push(Candidate {
            class: smallest,
            catalog_index: 0,
            count: copies,
            unit_price: smallest.price_for_zone(zone),
        });
    }

    Ok(candidates)
}

/// 為指定人數與區域等級選出總價最低的派車方案。
///
/// 同價時車輛數少者優先，再依車型清單順序決定，結果是確定的。
pub fn allocate(size: usize, zone: u32, catalog: &VehicleCatalog) -> Result<AllocationResult> {
    if size == 0 {
        return Err(CostError::InvalidGroupSize { size });
    }

    let best = candidates(size, zone, catalog)?
        .into_iter()
        .min_by(|a, b| a.rank(b))
        .ok_or_else(|| CostError::config("vehicle_types", "no vehicle class can be selected"))?;

    let capacity_used = best
        .class
        .capacity
        .checked_mul(best.count)
        .ok_or(CostError::InvalidGroupSize { size })?;
    let vehicle = if best.count == 1 {
        best.class.name.clone()
    } else {
        format!("{} x {}", best.count, best.class.name)
    };

    tracing::debug!(
        "Allocated {} for {} passenger(s) in zone {} at {:.2}",
        vehicle,
        size,
        zone,
        best.cost()
    );

    Ok(AllocationResult {
        vehicle,
        vehicle_name: best.class.name.clone(),
        vehicle_count: best.count,
        unit_price: best.unit_price,
        cost: best.cost(),
        capacity_used,
        occupancy: size as f64 / f64::from(capacity_used),
    })
}

/// 整組以組內最遠區域計價
pub fn allocate_group(group: &RideGroup<'_>, catalog: &VehicleCatalog) -> Result<AllocationResult> {
    allocate(group.size(), group.max_zone(), catalog)
}
