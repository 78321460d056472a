use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Kind of maintenance being requested
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaintenanceType {
    #[sea_orm(string_value = "electrical")]
    Electrical,
    #[sea_orm(string_value = "mechanical")]
    Mechanical,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Condition of the equipment as reported by the requester
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentStatus {
    #[sea_orm(string_value = "working")]
    Working,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "inoperative")]
    Inoperative,
}

/// Lifecycle state. Only ever advances open -> in_progress -> done.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "done")]
    Done,
}

impl RequestStatus {
    /// The single status a request must hold before it may enter `self`.
    pub fn required_predecessor(self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Open => None,
            RequestStatus::InProgress => Some(RequestStatus::Open),
            RequestStatus::Done => Some(RequestStatus::InProgress),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_requests")]
pub struct Model {
    /// Doubles as the maintenance number shown to users
    #[sea_orm(primary_key)]
    pub id: i32,
    pub requester_name: String,
    pub request_date: NaiveDate,
    pub request_time: NaiveTime,
    pub department: String,
    pub maintenance_type: MaintenanceType,
    pub equipment_status: EquipmentStatus,
    pub equipment_location_press: Option<String>,
    pub equipment_location_press_number: Option<String>,
    pub equipment_location_thread: Option<String>,
    pub equipment_location_thread_number: Option<String>,
    pub equipment_location_other: Option<String>,
    pub equipment_location_other_number: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub problem_description: String,
    pub status: RequestStatus,
    pub technician_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn maintenance_number(&self) -> i32 {
        self.id
    }

    /// Elapsed working time, present only once the request has both timestamps.
    pub fn duration(&self) -> Option<Duration> {
        compute_duration(self.start_time, self.end_time)
    }

    /// Human readable total time, e.g. "1d 2h 5m".
    pub fn total_time(&self) -> Option<String> {
        self.duration().map(|elapsed| format_total_time(&elapsed))
    }
}

/// Elapsed time between start and end, truncated to whole seconds.
///
/// Returns `None` unless both timestamps are set. An end that precedes the
/// start (clock skew) counts as zero elapsed time.
pub fn compute_duration(
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
) -> Option<Duration> {
    let (start, end) = (start_time?, end_time?);
    let seconds = (end - start).num_seconds().max(0);
    Some(Duration::seconds(seconds))
}

/// Renders a duration as its non-zero day, hour and minute parts.
/// Leftover seconds are dropped; a duration under one minute renders "0m".
pub fn format_total_time(elapsed: &Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let days = total / SECONDS_PER_DAY;
    let hours = (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    let parts: Vec<String> = [(days, 'd'), (hours, 'h'), (minutes, 'm')]
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();

    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(5_400, "1h 30m")]
    #[case(30, "0m")]
    #[case(0, "0m")]
    #[case(90_000, "1d 1h")]
    #[case(86_400, "1d")]
    #[case(86_460, "1d 1m")]
    #[case(3_599, "59m")]
    #[case(183_900, "2d 3h 5m")]
    fn formats_total_time(#[case] seconds: i64, #[case] expected: &str) {
        assert_eq!(format_total_time(&Duration::seconds(seconds)), expected);
    }

    #[test]
    fn duration_requires_both_timestamps() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        assert!(compute_duration(None, None).is_none());
        assert!(compute_duration(Some(start), None).is_none());
        assert!(compute_duration(None, Some(start)).is_none());
    }

    #[test]
    fn duration_discards_fractional_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let end = start + Duration::milliseconds(5_400_900);
        assert_eq!(
            compute_duration(Some(start), Some(end)),
            Some(Duration::seconds(5_400))
        );
    }

    #[test]
    fn end_before_start_counts_as_zero() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let end = start - Duration::minutes(5);
        let elapsed = compute_duration(Some(start), Some(end)).unwrap();
        assert_eq!(format_total_time(&elapsed), "0m");
    }

    #[test]
    fn status_only_advances_one_step() {
        assert_eq!(RequestStatus::Open.required_predecessor(), None);
        assert_eq!(
            RequestStatus::InProgress.required_predecessor(),
            Some(RequestStatus::Open)
        );
        assert_eq!(
            RequestStatus::Done.required_predecessor(),
            Some(RequestStatus::InProgress)
        );
    }

    #[test]
    fn status_parses_from_wire_name() {
        assert_eq!(
            RequestStatus::from_str("in_progress").unwrap(),
            RequestStatus::InProgress
        );
        assert_eq!(RequestStatus::Done.to_string(), "done");
        assert!(RequestStatus::from_str("closed").is_err());
    }
}
