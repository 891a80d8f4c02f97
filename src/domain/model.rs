use crate::core::zone::classify_zone;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Morning,
    Evening,
}

impl Direction {
    /// 沒有明確方向時，依時間推定：截止時間之前為早上（去程）
    pub fn from_time(time: NaiveTime, evening_cutoff_hour: u32) -> Self {
        if time.hour() < evening_cutoff_hour {
            Direction::Morning
        } else {
            Direction::Evening
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "morning" | "am" | "in" | "inbound" | "aller" | "matin" => Some(Direction::Morning),
            "evening" | "pm" | "out" | "outbound" | "retour" | "soir" => Some(Direction::Evening),
            _ => None,
        }
    }
}

/// 一筆通勤紀錄。區域等級在建立時就解析完成，永遠 ≥ 1。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommuteRecord {
    employee_id: String,
    timestamp: NaiveDateTime,
    zone: u32,
    raw_zone: String,
    line: String,
    direction: Option<Direction>,
}

impl CommuteRecord {
    pub fn new(
        employee_id: impl Into<String>,
        timestamp: NaiveDateTime,
        raw_zone: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        let raw_zone = raw_zone.into();
        let zone = classify_zone(&raw_zone);
        Self::with_tier(employee_id, timestamp, raw_zone, zone, line)
    }

    /// 給已經透過快取分類過的呼叫端使用
    pub fn with_tier(
        employee_id: impl Into<String>,
        timestamp: NaiveDateTime,
        raw_zone: impl Into<String>,
        zone: u32,
        line: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            timestamp,
            zone: zone.max(1),
            raw_zone: raw_zone.into(),
            line: line.into(),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Option<Direction>) -> Self {
        self.direction = direction;
        self
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn zone(&self) -> u32 {
        self.zone
    }

    pub fn raw_zone(&self) -> &str {
        &self.raw_zone
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn direction(&self, evening_cutoff_hour: u32) -> Direction {
        self.direction
            .unwrap_or_else(|| Direction::from_time(self.timestamp.time(), evening_cutoff_hour))
    }
}

/// 共乘一台（或一組）車的乘客，依時間排序，第一位乘客的時間即為錨點。
#[derive(Debug, Clone, PartialEq)]
pub struct RideGroup<'a> {
    members: Vec<&'a CommuteRecord>,
}

impl<'a> RideGroup<'a> {
    pub(crate) fn open(anchor: &'a CommuteRecord) -> Self {
        Self {
            members: vec![anchor],
        }
    }

    pub(crate) fn admit(&mut self, record: &'a CommuteRecord) {
        self.members.push(record);
    }

    pub fn members(&self) -> &[&'a CommuteRecord] {
        &self.members
    }

    pub fn anchor(&self) -> NaiveDateTime {
        self.members[0].timestamp()
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn span_minutes(&self) -> i64 {
        let last = self.members[self.members.len() - 1].timestamp();
        (last - self.anchor()).num_minutes()
    }

    /// 整組車資以最遠的區域計價
    pub fn max_zone(&self) -> u32 {
        self.members
            .iter()
            .map(|record| record.zone())
            .max()
            .unwrap_or(1)
    }

    pub fn zone_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.members {
            *counts.entry(record.zone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn employee_ids(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|record| record.employee_id().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub vehicle: String,
    pub vehicle_name: String,
    pub vehicle_count: u32,
    pub unit_price: f64,
    pub cost: f64,
    pub capacity_used: u32,
    pub occupancy: f64,
}
