use chrono::{NaiveTime, Weekday};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::models::{
    AvailabilityEntry, CalendarPayload, DaySet, FieldEdit, ReconcileError, RowId, SaveResult,
    DEFAULT_BRANCH_ID, DEFAULT_MAX_PATIENTS, DEFAULT_TIME_INTERVAL,
};
use crate::services::store::CalendarStore;

// Read keys in lookup order: canonical, legacy, then the write shape.
const ID_KEYS: &[&str] = &["id", "dA_id"];
const DOCTOR_KEYS: &[&str] = &["doctorId", "dA_doctor_id", "DA_doctor_id"];
const BRANCH_KEYS: &[&str] = &["branchId", "dA_branch_id", "DA_branch_id"];
const TELECONSULT_KEYS: &[&str] =
    &["isTeleconsult", "dA_is_teleconsultant", "DA_is_teleconsultant"];
const FROM_KEYS: &[&str] = &["fromTime", "dA_start_time", "DA_start_time"];
const TO_KEYS: &[&str] = &["toTime", "dA_end_time", "DA_end_time"];
const INTERVAL_KEYS: &[&str] = &["timeInterval", "dA_time_interval", "DA_time_interval"];
const DAY_ID_KEYS: &[&str] = &["dayId", "day_Id", "Day_Id"];

const ACTIVE_STATUS: u8 = 1;

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_end() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default()
}

// ==============================================================================
// NORMALIZE
// ==============================================================================

/// Turns a calendar response into buffer rows.
///
/// Accepts a bare array or a `{ data: [...] }` envelope; anything else is an
/// empty calendar. Each field is read from the first key present among the
/// canonical, legacy and write-shape names.
pub fn normalize(raw: &Value) -> Vec<AvailabilityEntry> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(envelope) => match envelope.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item.as_object() {
            Some(fields) => Some(normalize_entry(fields)),
            None => {
                warn!("Skipping calendar entry {}: not an object", index);
                None
            }
        })
        .collect()
}

fn normalize_entry(fields: &Map<String, Value>) -> AvailabilityEntry {
    let id = match pick(fields, ID_KEYS) {
        Some(Value::Number(n)) => n.as_i64().map(RowId::Persisted),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(RowId::parse(s)),
        _ => None,
    };
    let is_new = match &id {
        Some(RowId::Persisted(_)) => fields
            .get("isNew")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        _ => true,
    };
    let id = id.unwrap_or_else(|| {
        debug!("Calendar entry has no id, treating it as a new row");
        RowId::draft()
    });

    let time_interval = pick_positive(fields, INTERVAL_KEYS).unwrap_or(DEFAULT_TIME_INTERVAL);

    // hourly capacity, at least one patient for intervals over an hour
    let max_patients =
        pick_positive(fields, &["maxPatients"]).unwrap_or((60 / time_interval).max(1));

    let explicit_days = fields
        .get("days")
        .filter(|days| days.is_object())
        .and_then(|days| serde_json::from_value::<DaySet>(days.clone()).ok());
    let days = match explicit_days {
        Some(days) => days,
        None => pick_i64(fields, DAY_ID_KEYS)
            .and_then(DaySet::from_day_id)
            .unwrap_or_else(|| {
                warn!("Calendar entry {} has no usable day, assuming Monday", id);
                DaySet::only(Weekday::Mon)
            }),
    };

    AvailabilityEntry {
        doctor_id: pick_i64(fields, DOCTOR_KEYS).unwrap_or_default(),
        branch_id: pick_i64(fields, BRANCH_KEYS).unwrap_or(DEFAULT_BRANCH_ID),
        from_time: pick_time(fields, FROM_KEYS, &id),
        to_time: pick_time(fields, TO_KEYS, &id),
        is_teleconsult: pick(fields, TELECONSULT_KEYS)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        max_patients,
        time_interval,
        days,
        id,
        is_new,
    }
}

fn pick<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| fields.get(*key).filter(|value| !value.is_null()))
}

fn pick_i64(fields: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    match pick(fields, keys)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A strictly positive value that fits in `u32`; anything else counts as absent.
fn pick_positive(fields: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    pick_i64(fields, keys)
        .and_then(|value| u32::try_from(value).ok())
        .filter(|value| *value > 0)
}

fn pick_time(fields: &Map<String, Value>, keys: &[&str], id: &RowId) -> NaiveTime {
    let parsed = pick(fields, keys)
        .and_then(Value::as_str)
        .and_then(|s| parse_time(s.trim()));
    parsed.unwrap_or_else(|| {
        warn!("Calendar entry {} has a missing or unreadable time, using 09:00", id);
        default_start()
    })
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// ==============================================================================
// LOCAL EDITS
// ==============================================================================

pub fn new_row(doctor_id: i64) -> AvailabilityEntry {
    AvailabilityEntry {
        id: RowId::draft(),
        is_new: true,
        doctor_id,
        branch_id: DEFAULT_BRANCH_ID,
        from_time: default_start(),
        to_time: default_end(),
        is_teleconsult: false,
        max_patients: DEFAULT_MAX_PATIENTS,
        time_interval: DEFAULT_TIME_INTERVAL,
        days: DaySet::weekdays(),
    }
}

pub fn add_row(buffer: &[AvailabilityEntry], doctor_id: i64) -> Vec<AvailabilityEntry> {
    let mut next = buffer.to_vec();
    next.push(new_row(doctor_id));
    next
}

/// Applies one edit by row id. Unknown ids leave the buffer as it was.
pub fn edit_field(
    buffer: &[AvailabilityEntry],
    row_id: &RowId,
    edit: FieldEdit,
) -> Vec<AvailabilityEntry> {
    if !buffer.iter().any(|row| &row.id == row_id) {
        warn!("Ignoring edit for unknown time slot {}", row_id);
        return buffer.to_vec();
    }

    buffer
        .iter()
        .map(|row| {
            if &row.id != row_id {
                return row.clone();
            }
            let mut row = row.clone();
            match edit {
                FieldEdit::FromTime(time) => row.from_time = time,
                FieldEdit::ToTime(time) => row.to_time = time,
                FieldEdit::Teleconsult(enabled) => row.is_teleconsult = enabled,
                FieldEdit::MaxPatients(max) => row.max_patients = max,
                FieldEdit::TimeInterval(minutes) => row.time_interval = minutes,
                FieldEdit::BranchId(branch_id) => row.branch_id = branch_id,
                FieldEdit::Day { day, active } => row.days.set(day, active),
            }
            row
        })
        .collect()
}

/// Removes a row. Rows the backend knows about are deleted there first and
/// only dropped from the buffer once that succeeded.
pub async fn delete_row(
    buffer: &[AvailabilityEntry],
    row_id: &RowId,
    store: &dyn CalendarStore,
) -> Result<Vec<AvailabilityEntry>, ReconcileError> {
    let row = buffer
        .iter()
        .find(|row| &row.id == row_id)
        .ok_or_else(|| ReconcileError::RowNotFound(row_id.clone()))?;

    match (row.is_new, row.id.backend_id()) {
        (false, Some(backend_id)) => {
            store
                .delete_entry(backend_id)
                .await
                .map_err(ReconcileError::Store)?;
            info!("Deleted time slot {}", backend_id);
        }
        _ => debug!("Removing unsaved time slot {}", row_id),
    }

    Ok(buffer.iter().filter(|r| &r.id != row_id).cloned().collect())
}

// ==============================================================================
// SAVE
// ==============================================================================

pub fn validate_row(row: &AvailabilityEntry) -> Result<(), String> {
    if row.to_time < row.from_time {
        return Err("End time cannot be before start time".to_string());
    }
    if row.max_patients == 0 {
        return Err("Max patients must be greater than zero".to_string());
    }
    if row.time_interval == 0 {
        return Err("Time interval must be greater than zero".to_string());
    }
    Ok(())
}

/// Write payload for a row; the backend stores one day per record.
pub fn to_payload(row: &AvailabilityEntry, doctor_id: i64) -> CalendarPayload {
    let day = row.days.first_active().unwrap_or(Weekday::Mon);
    if row.days.active_count() > 1 {
        debug!(
            "Time slot {} is active on {} days, writing {} only",
            row.id,
            row.days.active_count(),
            day
        );
    }

    CalendarPayload {
        doctor_id,
        branch_id: if row.branch_id > 0 { row.branch_id } else { DEFAULT_BRANCH_ID },
        start_time: row.from_time.format("%H:%M:%S").to_string(),
        end_time: row.to_time.format("%H:%M:%S").to_string(),
        status: ACTIVE_STATUS,
        time_interval: if row.time_interval > 0 {
            row.time_interval
        } else {
            DEFAULT_TIME_INTERVAL
        },
        day_id: day.number_from_monday(),
        is_teleconsult: row.is_teleconsult,
    }
}

/// Writes the buffer row by row, in order, stopping at the first failure.
pub async fn save(
    buffer: &[AvailabilityEntry],
    doctor_id: i64,
    store: &dyn CalendarStore,
) -> SaveResult {
    for row in buffer {
        if let Err(message) = validate_row(row) {
            warn!(
                "Not saving availability for doctor {}: row {} invalid: {}",
                doctor_id, row.id, message
            );
            return SaveResult::Invalid {
                row_id: row.id.clone(),
                message,
            };
        }
    }

    debug!("Saving {} time slot(s) for doctor {}", buffer.len(), doctor_id);

    let mut persisted = 0;
    for row in buffer {
        let payload = to_payload(row, doctor_id);
        let outcome = match (row.is_new, row.id.backend_id()) {
            (false, Some(backend_id)) => store.update_entry(backend_id, &payload).await,
            _ => store.create_entry(&payload).await,
        };

        if let Err(e) = outcome {
            warn!(
                "Saving time slot {} for doctor {} failed after {} row(s): {}",
                row.id, doctor_id, persisted, e
            );
            return SaveResult::Failed {
                persisted,
                row_id: row.id.clone(),
                message: e.to_string(),
            };
        }
        persisted += 1;
    }

    info!("Saved {} time slot(s) for doctor {}", persisted, doctor_id);
    SaveResult::Saved { persisted }
}
