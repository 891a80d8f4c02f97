use crate::domain::fleet::VehicleCatalog;
use crate::domain::model::{CommuteRecord, RideGroup};
use crate::domain::report::GroupingMode;
use crate::utils::error::Result;
use crate::utils::validation::validate_positive_number;

/// 單次前向掃描，把紀錄切成互不重疊的共乘組。
///
/// 紀錄先依時間做穩定排序（同時間保留原順序）。每組以第一筆為錨點，
/// 後續紀錄在「距錨點不超過時間窗」且「組內人數小於最大車型容量」時加入；
/// 第一筆不符合的紀錄即結束該組，並成為下一組的錨點。
///
/// `GroupingMode::ExactSlot` 是時間窗為 0 的退化情形：只有完全相同時間的紀錄同組。
pub fn group_records<'a>(
    records: &'a [CommuteRecord],
    mode: GroupingMode,
    catalog: &VehicleCatalog,
) -> Result<Vec<RideGroup<'a>>> {
    let window_seconds = match mode {
        GroupingMode::Window { minutes } => {
            validate_positive_number("grouping_window_minutes", minutes, 1)?;
            i64::from(minutes) * 60
        }
        GroupingMode::ExactSlot => 0,
    };
    let max_capacity = catalog.largest_capacity() as usize;

    let mut ordered: Vec<&'a CommuteRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp());

    let mut groups = Vec::new();
    let mut pending = ordered.into_iter().peekable();

    while let Some(anchor) = pending.next() {
        let mut group = RideGroup::open(anchor);

        while let Some(candidate) = pending.peek() {
            let elapsed = (candidate.timestamp() - group.anchor()).num_seconds();
            if elapsed > window_seconds || group.size() >= max_capacity {
                break;
            }
            group.admit(*candidate);
            pending.next();
        }

        tracing::debug!(
            "Closed ride group at {} with {} passenger(s)",
            group.anchor(),
            group.size()
        );
        groups.push(group);
    }

    Ok(groups)
}
