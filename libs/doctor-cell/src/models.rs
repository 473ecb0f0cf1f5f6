use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use shared_gateway::upstream_error;
use shared_models::{AppError, Notification, Severity};

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub doctor_id: i64,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub branch_id: Option<i64>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// Identifies a row in the availability buffer.
///
/// Rows loaded from the backend carry its numeric id; rows added locally
/// carry a `draft-{uuid}` id until they are created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Persisted(i64),
    Draft(String),
}

impl RowId {
    pub fn draft() -> Self {
        RowId::Draft(format!("draft-{}", uuid::Uuid::new_v4()))
    }

    /// Path segments arrive as text; numeric ones address persisted rows.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(id) => RowId::Persisted(id),
            Err(_) => RowId::Draft(raw.to_string()),
        }
    }

    pub fn backend_id(&self) -> Option<i64> {
        match self {
            RowId::Persisted(id) => Some(*id),
            RowId::Draft(_) => None,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Persisted(id) => write!(f, "{}", id),
            RowId::Draft(id) => write!(f, "{}", id),
        }
    }
}

/// Weekdays a schedule block applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySet {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl DaySet {
    pub fn only(day: Weekday) -> Self {
        let mut days = DaySet::default();
        days.set(day, true);
        days
    }

    pub fn weekdays() -> Self {
        DaySet {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            ..DaySet::default()
        }
    }

    /// `1` = Monday through `7` = Sunday.
    pub fn from_day_id(day_id: i64) -> Option<Self> {
        let day = match day_id {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            7 => Weekday::Sun,
            _ => return None,
        };
        Some(Self::only(day))
    }

    pub fn is_active(&self, day: Weekday) -> bool {
        match day {
            Weekday::Sun => self.sunday,
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
        }
    }

    pub fn set(&mut self, day: Weekday, active: bool) {
        let flag = match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *flag = active;
    }

    /// First active day scanning Monday to Sunday.
    pub fn first_active(&self) -> Option<Weekday> {
        let mut day = Weekday::Mon;
        for _ in 0..7 {
            if self.is_active(day) {
                return Some(day);
            }
            day = day.succ();
        }
        None
    }

    pub fn active_count(&self) -> usize {
        [
            self.sunday,
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

pub const DEFAULT_TIME_INTERVAL: u32 = 30;
pub const DEFAULT_BRANCH_ID: i64 = 1;
pub const DEFAULT_MAX_PATIENTS: u32 = 10;

/// One recurring weekly schedule block, as edited in the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
    pub id: RowId,
    pub is_new: bool,
    pub doctor_id: i64,
    pub branch_id: i64,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
    pub is_teleconsult: bool,
    pub max_patients: u32,
    pub time_interval: u32,
    pub days: DaySet,
}

/// Write shape for `add-doctor-calendar` / `update-doctor-calendar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarPayload {
    #[serde(rename = "DA_doctor_id")]
    pub doctor_id: i64,
    #[serde(rename = "DA_branch_id")]
    pub branch_id: i64,
    #[serde(rename = "DA_start_time")]
    pub start_time: String,
    #[serde(rename = "DA_end_time")]
    pub end_time: String,
    #[serde(rename = "DA_status")]
    pub status: u8,
    #[serde(rename = "DA_time_interval")]
    pub time_interval: u32,
    #[serde(rename = "Day_Id")]
    pub day_id: u32,
    #[serde(rename = "DA_is_teleconsultant")]
    pub is_teleconsult: bool,
}

/// A single edit to one row of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    FromTime(NaiveTime),
    ToTime(NaiveTime),
    Teleconsult(bool),
    MaxPatients(u32),
    TimeInterval(u32),
    BranchId(i64),
    Day { day: Weekday, active: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SaveResult {
    /// Every row was written.
    Saved { persisted: usize },
    /// A row was rejected; rows before it are already written, rows after it
    /// were not attempted.
    #[serde(rename_all = "camelCase")]
    Failed {
        persisted: usize,
        row_id: RowId,
        message: String,
    },
    /// Nothing was sent: a row failed local validation.
    #[serde(rename_all = "camelCase")]
    Invalid { row_id: RowId, message: String },
}

impl SaveResult {
    pub fn persisted(&self) -> usize {
        match self {
            SaveResult::Saved { persisted } | SaveResult::Failed { persisted, .. } => *persisted,
            SaveResult::Invalid { .. } => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SaveResult::Saved { .. })
    }

    pub fn notification(&self) -> Notification {
        match self {
            SaveResult::Saved { .. } => Notification::success("Availability saved successfully"),
            SaveResult::Failed { persisted: 0, .. } => {
                Notification::error("Failed to save availability")
            }
            SaveResult::Failed { persisted, .. } => Notification::new(
                format!(
                    "Saved {} time slot(s) before an error; the remaining changes were not saved",
                    persisted
                ),
                Severity::Warning,
            ),
            SaveResult::Invalid { message, .. } => Notification::error(message.clone()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Time slot {0} not found")]
    RowNotFound(RowId),

    #[error("Failed to delete time slot: {0}")]
    Store(anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("A save is already in progress for this doctor")]
    SaveInFlight,

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Failed to load availability: {0}")]
    Load(anyhow::Error),
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::SaveInFlight => {
                AppError::Conflict("A save is already in progress for this doctor".to_string())
            }
            EditorError::Reconcile(ReconcileError::RowNotFound(id)) => {
                AppError::NotFound(format!("Time slot {} not found", id))
            }
            EditorError::Reconcile(ReconcileError::Store(e)) => {
                upstream_error("Failed to delete time slot", e)
            }
            EditorError::Load(e) => upstream_error("Failed to load availability", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_active_scans_from_monday() {
        let mut days = DaySet::only(Weekday::Sun);
        assert_eq!(days.first_active(), Some(Weekday::Sun));

        days.set(Weekday::Thu, true);
        assert_eq!(days.first_active(), Some(Weekday::Thu));
        assert_eq!(DaySet::default().first_active(), None);
    }

    #[test]
    fn day_ids_map_monday_first() {
        assert_eq!(DaySet::from_day_id(1), Some(DaySet::only(Weekday::Mon)));
        assert_eq!(DaySet::from_day_id(7), Some(DaySet::only(Weekday::Sun)));
        assert_eq!(DaySet::from_day_id(0), None);
        assert_eq!(DaySet::from_day_id(8), None);
    }

    #[test]
    fn row_ids_parse_from_path_segments() {
        assert_eq!(RowId::parse("42"), RowId::Persisted(42));
        assert_eq!(RowId::parse("draft-abc"), RowId::Draft("draft-abc".to_string()));
        assert!(RowId::draft().to_string().starts_with("draft-"));
    }

    #[test]
    fn field_edit_wire_format() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{"field":"day","value":{"day":"wednesday","active":true}}"#)
                .unwrap();
        assert_eq!(edit, FieldEdit::Day { day: Weekday::Wed, active: true });

        let edit: FieldEdit =
            serde_json::from_str(r#"{"field":"fromTime","value":"10:30:00"}"#).unwrap();
        assert_eq!(edit, FieldEdit::FromTime(NaiveTime::from_hms_opt(10, 30, 0).unwrap()));
    }

    #[test]
    fn partial_failure_is_reported_as_warning() {
        let partial = SaveResult::Failed {
            persisted: 2,
            row_id: RowId::Persisted(9),
            message: "boom".to_string(),
        };
        let total = SaveResult::Failed {
            persisted: 0,
            row_id: RowId::Persisted(9),
            message: "boom".to_string(),
        };

        assert_eq!(partial.notification().severity, Severity::Warning);
        assert!(total.notification().is_error());
        assert_ne!(partial.notification().message, total.notification().message);
        assert!(!SaveResult::Saved { persisted: 3 }.notification().is_error());
    }
}
