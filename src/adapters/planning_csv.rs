use crate::core::zone::ZoneClassifier;
use crate::domain::model::{CommuteRecord, Direction};
use crate::domain::ports::Storage;
use crate::utils::error::{CostError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

pub const REQUIRED_COLUMNS: [&str; 3] = ["Employee ID", "Date", "Time"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// 排班檔的一列。欄位名稱固定，不做模糊比對。
#[derive(Debug, Deserialize)]
struct PlanningRow {
    #[serde(rename = "Employee ID")]
    employee_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Zone", default)]
    zone: Option<String>,
    #[serde(rename = "Line", default)]
    line: Option<String>,
    #[serde(rename = "Direction", default)]
    direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct PlanningImport {
    pub records: Vec<CommuteRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// 將 CSV 排班轉成正規化的通勤紀錄。
///
/// 缺少區域或路線時套用預設值；日期、時間或員工編號無法解析的列會被略過並記錄下來。
pub fn parse_planning(data: &[u8]) -> Result<PlanningImport> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(CostError::ParseError {
                row: 1,
                message: format!("missing required column `{}`", column),
            });
        }
    }

    let mut classifier = ZoneClassifier::new();
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, row) in reader.deserialize::<PlanningRow>().enumerate() {
        // header is line 1
        let line_number = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                skipped.push(SkippedRow {
                    row: line_number,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match normalize_row(row, &mut classifier) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedRow {
                row: line_number,
                reason,
            }),
        }
    }

    for row in &skipped {
        tracing::warn!("Skipping planning row {}: {}", row.row, row.reason);
    }
    tracing::info!(
        "Parsed {} planning record(s), skipped {}, {} distinct zone token(s)",
        records.len(),
        skipped.len(),
        classifier.cached_tokens()
    );

    Ok(PlanningImport { records, skipped })
}

pub async fn load_planning<S: Storage>(storage: &S, path: &str) -> Result<PlanningImport> {
    tracing::debug!("Reading planning from: {}", path);
    let data = storage.read_file(path).await?;
    parse_planning(&data)
}

fn normalize_row(
    row: PlanningRow,
    classifier: &mut ZoneClassifier,
) -> std::result::Result<CommuteRecord, String> {
    if row.employee_id.is_empty() {
        return Err("missing employee id".to_string());
    }

    let date = parse_date(&row.date).ok_or_else(|| format!("invalid date `{}`", row.date))?;
    let time = parse_time(&row.time).ok_or_else(|| format!("invalid time `{}`", row.time))?;

    let raw_zone = row.zone.unwrap_or_default();
    let zone = classifier.classify(&raw_zone);
    let direction = row.direction.as_deref().and_then(Direction::parse);

    Ok(CommuteRecord::with_tier(
        row.employee_id,
        NaiveDateTime::new(date, time),
        raw_zone,
        zone,
        row.line.unwrap_or_default(),
    )
    .with_direction(direction))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}
