use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub default_branch_id: i64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:7162/api".to_string(),
            backend_timeout_secs: 2,
            default_branch_id: 1,
        }
    }
}

impl TestConfig {
    pub fn with_backend(url: impl Into<String>) -> Self {
        Self {
            backend_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_url: self.backend_url.clone(),
            backend_timeout_secs: self.backend_timeout_secs,
            default_branch_id: self.default_branch_id,
            port: 0,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn available_slot(start: &str, end: &str) -> Value {
        json!({
            "slotStart": start,
            "slotEnd": end,
            "status": "Available",
            "isTeleconsultant": false,
            "appointment": null
        })
    }

    pub fn booked_slot(start: &str, end: &str, appointment_id: i64, appointment_status: &str) -> Value {
        json!({
            "slotStart": start,
            "slotEnd": end,
            "status": "Booked",
            "isTeleconsultant": true,
            "appointment": {
                "appointmentId": appointment_id,
                "patientId": format!("PT{:03}", appointment_id),
                "patientName": "John Smith",
                "visitingPurpose": "General Checkup",
                "appointmentStartTime": start,
                "appointmentEndTime": end,
                "appointmentStatus": appointment_status
            }
        })
    }

    pub fn doctor_day_response(doctor_id: i64, slots: Vec<Value>) -> Value {
        json!({
            "appointmentId": {
                "doctorId": doctor_id,
                "doctorName": "Dr. John Smith",
                "date": "2025-03-03",
                "day": "Monday",
                "branchId": 1,
                "slots": slots
            }
        })
    }

    pub fn doctors_list() -> Value {
        json!({
            "message": "doctors details successfully fetched",
            "data": [
                { "doctorId": 1, "doctorName": "Dr. John Smith", "specialization": "Cardiologist", "branchId": 1 },
                { "doctorId": 2, "doctorName": "Dr. Test User", "specialization": "Dentist", "branchId": 1 }
            ]
        })
    }

    pub fn canonical_calendar_entry(id: i64, doctor_id: i64) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "branchId": 1,
            "isTeleconsult": true,
            "fromTime": "09:00:00",
            "toTime": "12:00:00",
            "maxPatients": 10,
            "days": {
                "sunday": false,
                "monday": true,
                "tuesday": true,
                "wednesday": true,
                "thursday": true,
                "friday": true,
                "saturday": false
            }
        })
    }

    pub fn legacy_calendar_entry(id: i64, doctor_id: i64, day_id: i64) -> Value {
        json!({
            "dA_id": id,
            "dA_doctor_id": doctor_id,
            "dA_branch_id": 1,
            "dA_is_teleconsultant": false,
            "dA_start_time": "14:00:00",
            "dA_end_time": "17:00:00",
            "dA_time_interval": 15,
            "day_Id": day_id
        })
    }

    pub fn patient(id: &str) -> Value {
        json!({
            "id": id,
            "firstName": "Sarah",
            "lastName": "Johnson",
            "dateOfBirth": "1991-04-12",
            "gender": "Female",
            "mobileNumber": "5552345678",
            "email": "sarah.j@example.com",
            "address": "12 Harbour Road",
            "bloodGroup": "A+",
            "maritalStatus": "Married"
        })
    }
}
