use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_gateway::{GatewayContext, Method};
use shared_utils::FormValidator;

use crate::models::{
    AppointmentBoard, AppointmentError, BookAppointmentRequest, BookingPayload,
    DEFAULT_SLOT_MINUTES,
};
use crate::services::aggregator::aggregate;

pub struct AppointmentService {
    ctx: Arc<GatewayContext>,
}

impl AppointmentService {
    pub fn new(ctx: Arc<GatewayContext>) -> Self {
        Self { ctx }
    }

    /// Fetch one doctor's day and fold it into the appointment grid.
    pub async fn fetch_board(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<AppointmentBoard, AppointmentError> {
        debug!("Fetching appointment board for doctor {} on {}", doctor_id, date);

        let body = json!({
            "AppointmentDate": format!("{}T00:00:00", date.format("%Y-%m-%d")),
            "DoctorId": doctor_id,
        });

        let raw = self
            .ctx
            .backend
            .request_value(Method::POST, "/appointment/getAppointmentByDoctorId", Some(body))
            .await?;

        let board = aggregate(&raw);
        debug!(
            "Board for doctor {}: {} rows, {} booked",
            doctor_id,
            board.rows.len(),
            board.stats.booked
        );

        Ok(board)
    }

    /// Validate a booking form and forward it to the backend.
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Value, AppointmentError> {
        let payload = self.prepare_booking(request)?;
        debug!(
            "Booking appointment for doctor {} on {} at {}",
            payload.doctor_id, payload.date, payload.start_time
        );

        let response = self
            .ctx
            .backend
            .request_value(Method::POST, "/appointment/book", Some(json!(payload)))
            .await?;

        info!("Appointment booked for doctor {} on {}", payload.doctor_id, payload.date);
        Ok(response)
    }

    /// Applies form validation and fills in the defaults the booking dialog uses.
    pub fn prepare_booking(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<BookingPayload, AppointmentError> {
        let (end_time, end_defaulted) = match request.end_time {
            Some(end) => (end, false),
            None => (default_end_time(request.start_time), true),
        };

        let mut validator = FormValidator::new();
        validator
            .require("PAT_firstname", &request.first_name, "First name is required")
            .require("PAT_lastname", &request.last_name, "Last name is required")
            .require("PAT_mobile_number", &request.mobile_number, "Mobile number is required")
            .mobile("PAT_mobile_number", &request.mobile_number, "Mobile number must be 10 digits")
            .require("PAT_area", &request.area, "Area is required")
            .optional_email("PAT_email", request.email.as_deref());
        if end_defaulted {
            validator.check(
                "APP_start_time",
                end_time > request.start_time,
                "Start time is too late for a same-day appointment",
            );
        } else {
            validator.check(
                "APP_end_time",
                end_time > request.start_time,
                "End time must be after start time",
            );
        }
        validator.finish().map_err(AppointmentError::Invalid)?;

        let visit_purpose = request
            .visit_purpose
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "Consultation".to_string());

        Ok(BookingPayload {
            doctor_id: request.doctor_id,
            branch_id: request
                .branch_id
                .unwrap_or(self.ctx.config.default_branch_id),
            date: request.date,
            start_time: request.start_time,
            end_time,
            status: request.status.unwrap_or_else(|| "Booked".to_string()),
            notes: request
                .notes
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("{} appointment", visit_purpose)),
            created_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email.unwrap_or_default(),
            gender: request.gender.unwrap_or_default(),
            address: request.address.unwrap_or_default(),
            blood_group: request.blood_group.unwrap_or_default(),
            mobile_number: request.mobile_number,
        })
    }
}

/// Default slot length after `start`, stopping at the end of the day.
fn default_end_time(start: NaiveTime) -> NaiveTime {
    let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(DEFAULT_SLOT_MINUTES));
    if wrapped == 0 {
        end
    } else {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(start)
    }
}
