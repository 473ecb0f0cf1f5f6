// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shared_gateway::GatewayError;
use shared_models::{AppError, FieldErrors};

// ==============================================================================
// RAW BACKEND SHAPES
// ==============================================================================

/// Identifier that the backend sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LooseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseId::Number(n) => write!(f, "{}", n),
            LooseId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Body of `POST /appointment/getAppointmentByDoctorId`.
///
/// The backend nests the doctor/day record under an `appointmentId` key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDoctorDayResponse {
    pub appointment_id: Option<RawDoctorDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDoctorDay {
    pub doctor_id: Option<LooseId>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub day: Option<String>,
    pub branch_id: Option<LooseId>,
    /// Kept loose so one malformed slot cannot sink the whole day.
    pub slots: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSlot {
    pub slot_start: Option<String>,
    pub slot_end: Option<String>,
    pub status: Option<String>,
    pub is_teleconsultant: Option<bool>,
    pub appointment: Option<RawAppointment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAppointment {
    pub appointment_id: Option<LooseId>,
    pub patient_id: Option<LooseId>,
    pub patient_name: Option<String>,
    pub visiting_purpose: Option<String>,
    pub appointment_start_time: Option<String>,
    pub appointment_end_time: Option<String>,
    pub appointment_status: Option<String>,
}

// ==============================================================================
// VIEW MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingState {
    #[serde(rename = "N/A")]
    NotApplicable,
    Pending,
    Completed,
}

impl fmt::Display for BillingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingState::NotApplicable => write!(f, "N/A"),
            BillingState::Pending => write!(f, "Pending"),
            BillingState::Completed => write!(f, "Completed"),
        }
    }
}

/// One row of the appointment grid, built from a single slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRow {
    pub id: String,
    pub token_no: String,
    pub time: String,
    pub slot_end: String,
    pub in_time: String,
    pub out_time: String,
    pub patient_id: String,
    pub patient_name: String,
    pub visit_purpose: String,
    pub status: String,
    pub billing: BillingState,
    pub is_teleconsult: bool,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsBucket {
    Booked,
    Reviewed,
    Cancelled,
    Completed,
}

impl StatsBucket {
    /// Picks the single counter a slot contributes to, if any.
    ///
    /// The raw slot status wins for `Booked` and `Available`; every other
    /// slot is classified by its appointment's own status. Unknown statuses
    /// and slots without an appointment count towards no bucket.
    pub fn classify(slot_status: &str, appointment_status: Option<&str>) -> Option<Self> {
        match slot_status {
            "Booked" => Some(StatsBucket::Booked),
            "Available" => None,
            _ => match appointment_status? {
                "Scheduled" => Some(StatsBucket::Booked),
                "Completed" => Some(StatsBucket::Completed),
                "Cancelled" => Some(StatsBucket::Cancelled),
                "Reviewed" => Some(StatsBucket::Reviewed),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStats {
    pub booked: usize,
    pub reviewed: usize,
    pub cancelled: usize,
    pub completed: usize,
    pub total: usize,
}

impl SlotStats {
    pub fn record(&mut self, bucket: Option<StatsBucket>) {
        self.total += 1;
        match bucket {
            Some(StatsBucket::Booked) => self.booked += 1,
            Some(StatsBucket::Reviewed) => self.reviewed += 1,
            Some(StatsBucket::Cancelled) => self.cancelled += 1,
            Some(StatsBucket::Completed) => self.completed += 1,
            None => {}
        }
    }

    pub fn classified(&self) -> usize {
        self.booked + self.reviewed + self.cancelled + self.completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorInfo {
    pub doctor_id: Option<LooseId>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub day: Option<String>,
    pub branch_id: Option<LooseId>,
}

/// Everything the booking page shows for one doctor on one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBoard {
    pub rows: Vec<SlotRow>,
    pub stats: SlotStats,
    pub doctor_info: Option<DoctorInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardQuery {
    pub doctor_id: i64,
    pub date: NaiveDate,
}

// ==============================================================================
// BOOKING
// ==============================================================================

pub const DEFAULT_SLOT_MINUTES: i64 = 30;

/// Booking form as submitted by the UI; same field names the backend takes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(rename = "APP_doctor_id")]
    pub doctor_id: i64,
    #[serde(rename = "APP_branch_id", default)]
    pub branch_id: Option<i64>,
    #[serde(rename = "APP_date")]
    pub date: NaiveDate,
    #[serde(rename = "APP_start_time")]
    pub start_time: NaiveTime,
    #[serde(rename = "APP_end_time", default)]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "APP_status", default)]
    pub status: Option<String>,
    #[serde(rename = "APP_notes", default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub visit_purpose: Option<String>,
    #[serde(rename = "PAT_firstname", default)]
    pub first_name: String,
    #[serde(rename = "PAT_lastname", default)]
    pub last_name: String,
    #[serde(rename = "PAT_email", default)]
    pub email: Option<String>,
    #[serde(rename = "PAT_gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "PAT_address", default)]
    pub address: Option<String>,
    #[serde(rename = "PAT_area", default)]
    pub area: String,
    #[serde(rename = "PAT_blood_group", default)]
    pub blood_group: Option<String>,
    #[serde(rename = "PAT_mobile_number", default)]
    pub mobile_number: String,
}

/// What actually goes to `POST /appointment/book`, defaults resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    #[serde(rename = "APP_doctor_id")]
    pub doctor_id: i64,
    #[serde(rename = "APP_branch_id")]
    pub branch_id: i64,
    #[serde(rename = "APP_date")]
    pub date: NaiveDate,
    #[serde(rename = "APP_start_time")]
    pub start_time: NaiveTime,
    #[serde(rename = "APP_end_time")]
    pub end_time: NaiveTime,
    #[serde(rename = "APP_status")]
    pub status: String,
    #[serde(rename = "APP_notes")]
    pub notes: String,
    #[serde(rename = "APP_created_at")]
    pub created_at: String,
    #[serde(rename = "PAT_firstname")]
    pub first_name: String,
    #[serde(rename = "PAT_lastname")]
    pub last_name: String,
    #[serde(rename = "PAT_email")]
    pub email: String,
    #[serde(rename = "PAT_gender")]
    pub gender: String,
    #[serde(rename = "PAT_address")]
    pub address: String,
    #[serde(rename = "PAT_blood_group")]
    pub blood_group: String,
    #[serde(rename = "PAT_mobile_number")]
    pub mobile_number: String,
}

// ==============================================================================
// BILLING
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingItem {
    #[serde(default)]
    pub particular: Option<String>,
    pub quantity: u32,
    pub rate: f64,
    #[serde(default)]
    pub discount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRequest {
    pub items: Vec<BillingItem>,
    #[serde(default)]
    pub amount_paid: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub total: f64,
    pub discount: f64,
    pub net: f64,
    pub amount_paid: f64,
    pub due_amount: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Please fix the errors in the form")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::Invalid(fields) => AppError::InvalidFields(fields),
            AppointmentError::Gateway(e) => e.into(),
        }
    }
}
