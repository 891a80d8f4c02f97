use crate::config::settings::Settings;
use crate::core::attribution::ZoneLedger;
use crate::domain::model::{CommuteRecord, Direction};
use crate::domain::report::{
    AdvisoryReason, Comparison, Extrapolation, FlatOptionSummary, MeteredOptionSummary,
    PricingOption, Recommendation, Validity,
};
use crate::utils::error::{CostError, Result};
use std::collections::{BTreeMap, BTreeSet};

/// 資料筆數低於門檻時整個計算無效，不回傳部分結果
pub fn check_volume(observed: usize, required: usize) -> Result<()> {
    if observed < required {
        return Err(CostError::InsufficientDataError { observed, required });
    }
    Ok(())
}

/// 比較方案 A（區域月費）與方案 B（按趟計費），並判定建議是否具約束力。
pub fn compare(records: &[CommuteRecord], settings: &Settings) -> Result<Comparison> {
    check_volume(records.len(), settings.min_rows)?;

    let flat = flat_option(records, settings);
    let metered = metered_option(records, settings);
    let validity = validity(&metered.extrapolation);
    let recommendation = decide(flat.total, metered.total, validity.binding);

    if validity.binding {
        tracing::info!(
            "Recommendation {:?} is binding (savings {:.2})",
            recommendation.best,
            recommendation.savings
        );
    } else {
        tracing::warn!(
            "Recommendation {:?} is advisory only: {:?}",
            recommendation.best,
            validity.reasons
        );
    }

    Ok(Comparison {
        flat,
        metered,
        recommendation,
        validity,
    })
}

/// 方案 A：每位員工以整段期間內最遠的區域計月費
pub fn flat_option(records: &[CommuteRecord], settings: &Settings) -> FlatOptionSummary {
    let mut max_tiers: BTreeMap<&str, u32> = BTreeMap::new();
    for record in records {
        let tier = max_tiers.entry(record.employee_id()).or_insert(record.zone());
        *tier = (*tier).max(record.zone());
    }

    let mut ledger = ZoneLedger::new();
    let mut total = 0.0;
    for tier in max_tiers.values() {
        let price = settings.flat_price(*tier);
        ledger.add(*tier, price, 1);
        total += price;
    }

    FlatOptionSummary {
        total,
        employees: max_tiers.len(),
        zones: ledger.kpis(),
    }
}

/// 觀測天數與方向覆蓋率，決定方案 B 的外推倍數
pub fn coverage(records: &[CommuteRecord], settings: &Settings) -> Extrapolation {
    let observed_days = records
        .iter()
        .map(|record| record.date())
        .collect::<BTreeSet<_>>()
        .len();
    let directions: BTreeSet<Direction> = records
        .iter()
        .map(|record| record.direction(settings.evening_cutoff_hour))
        .collect();

    let reference_days = settings.reference_month_days;
    let morning_observed = directions.contains(&Direction::Morning);
    let evening_observed = directions.contains(&Direction::Evening);
    let single_direction = morning_observed != evening_observed;

    // 覆蓋不足（天數不足或只有單向）時，一律換算回參考月天數
    let partial = observed_days < reference_days as usize || single_direction;
    let day_factor = if observed_days == 0 || !partial {
        1.0
    } else {
        f64::from(reference_days) / observed_days as f64
    };
    let direction_factor = if single_direction { 2.0 } else { 1.0 };

    Extrapolation {
        observed_days,
        reference_days,
        day_factor,
        direction_factor,
        morning_observed,
        evening_observed,
    }
}

/// 方案 B：每趟依路線計價，覆蓋不足時外推至整月
pub fn metered_option(records: &[CommuteRecord], settings: &Settings) -> MeteredOptionSummary {
    let extrapolation = coverage(records, settings);
    let factor = extrapolation.factor();

    let mut ledger = ZoneLedger::new();
    let mut observed_total = 0.0;
    for record in records {
        let price = settings.metered_price(record.line());
        observed_total += price;
        ledger.add(record.zone(), price * factor, 1);
    }

    if extrapolation.is_applied() {
        tracing::debug!(
            "Extrapolating metered total {:.2} by x{:.3} ({} of {} days observed)",
            observed_total,
            factor,
            extrapolation.observed_days,
            extrapolation.reference_days
        );
    }

    MeteredOptionSummary {
        observed_total,
        total: ledger.total_cost(),
        trips: records.len(),
        extrapolation,
        zones: ledger.kpis(),
    }
}

pub fn validity(extrapolation: &Extrapolation) -> Validity {
    let mut reasons = Vec::new();
    if extrapolation.observed_days < extrapolation.reference_days as usize {
        reasons.push(AdvisoryReason::InsufficientDays {
            observed: extrapolation.observed_days,
            required: extrapolation.reference_days,
        });
    }
    if !extrapolation.morning_observed {
        reasons.push(AdvisoryReason::MissingDirection {
            missing: Direction::Morning,
        });
    }
    if !extrapolation.evening_observed {
        reasons.push(AdvisoryReason::MissingDirection {
            missing: Direction::Evening,
        });
    }

    Validity {
        binding: reasons.is_empty(),
        extrapolated: extrapolation.is_applied(),
        reasons,
    }
}

/// 金額嚴格較低者勝出；相同時選方案 A
pub fn decide(flat_total: f64, metered_total: f64, binding: bool) -> Recommendation {
    let best = if metered_total < flat_total {
        PricingOption::Metered
    } else {
        PricingOption::FlatSubscription
    };

    Recommendation {
        best,
        savings: (flat_total - metered_total).abs(),
        binding,
    }
}
