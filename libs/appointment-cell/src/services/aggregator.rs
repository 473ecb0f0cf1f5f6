use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    AppointmentBoard, BillingState, DoctorInfo, RawDoctorDay, RawDoctorDayResponse, RawSlot,
    SlotRow, SlotStats, StatsBucket,
};

const AVAILABLE: &str = "Available";

/// Builds the appointment grid for one doctor/day response.
///
/// Never fails: a body that does not look like a doctor/day record yields an
/// empty board. Rows come out in the order the backend sent the slots.
pub fn aggregate(raw: &Value) -> AppointmentBoard {
    match serde_json::from_value::<RawDoctorDayResponse>(raw.clone()) {
        Ok(response) => aggregate_response(response),
        Err(e) => {
            warn!("Ignoring malformed doctor/day response: {}", e);
            AppointmentBoard::default()
        }
    }
}

pub fn aggregate_response(response: RawDoctorDayResponse) -> AppointmentBoard {
    let Some(day) = response.appointment_id else {
        return AppointmentBoard::default();
    };
    let RawDoctorDay {
        doctor_id,
        doctor_name,
        date,
        day,
        branch_id,
        slots,
    } = day;
    let Some(slots) = slots else {
        debug!("Doctor/day response carries no slot sequence");
        return AppointmentBoard::default();
    };

    let mut stats = SlotStats::default();
    let rows = slots
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let slot = parse_slot(index, raw);
            let status = slot.status.as_deref().unwrap_or_default();
            let appointment_status = slot
                .appointment
                .as_ref()
                .and_then(|a| a.appointment_status.as_deref());
            stats.record(StatsBucket::classify(status, appointment_status));
            build_row(index, slot)
        })
        .collect();

    AppointmentBoard {
        rows,
        stats,
        doctor_info: Some(DoctorInfo {
            doctor_id,
            doctor_name,
            date,
            day,
            branch_id,
        }),
    }
}

fn parse_slot(index: usize, raw: Value) -> RawSlot {
    serde_json::from_value(raw).unwrap_or_else(|e| {
        warn!("Slot {} is malformed, treating as blank: {}", index, e);
        RawSlot::default()
    })
}

fn build_row(index: usize, slot: RawSlot) -> SlotRow {
    let start = slot.slot_start.unwrap_or_default();
    let slot_status = slot.status.unwrap_or_default();
    let is_empty = slot.appointment.is_none() && slot_status == AVAILABLE;

    let appointment = slot.appointment.unwrap_or_default();
    let appointment_id = appointment.appointment_id.map(|id| id.to_string());

    let billing = if is_empty {
        BillingState::NotApplicable
    } else if appointment.appointment_status.as_deref() == Some("Completed") {
        BillingState::Completed
    } else {
        BillingState::Pending
    };

    SlotRow {
        id: appointment_id
            .clone()
            .unwrap_or_else(|| format!("slot-{}-{}", start, index)),
        token_no: appointment_id
            .map(|id| format!("T{}", id))
            .unwrap_or_default(),
        time: start,
        slot_end: slot.slot_end.unwrap_or_default(),
        in_time: appointment.appointment_start_time.unwrap_or_default(),
        out_time: appointment.appointment_end_time.unwrap_or_default(),
        patient_id: appointment
            .patient_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        patient_name: appointment.patient_name.unwrap_or_default(),
        visit_purpose: appointment.visiting_purpose.unwrap_or_default(),
        status: appointment.appointment_status.unwrap_or(slot_status),
        billing,
        is_teleconsult: slot.is_teleconsultant.unwrap_or(false),
        is_empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(slots: Value) -> Value {
        json!({
            "appointmentId": {
                "doctorId": 1,
                "doctorName": "Dr. John Smith",
                "date": "2025-03-03",
                "day": "Monday",
                "branchId": 1,
                "slots": slots
            }
        })
    }

    #[test]
    fn four_slot_day_matches_expected_counts() {
        let raw = day(json!([
            { "slotStart": "09:00", "slotEnd": "09:30", "status": "Available" },
            {
                "slotStart": "09:30", "slotEnd": "10:00", "status": "Booked",
                "appointment": { "appointmentId": 11, "appointmentStatus": "Scheduled" }
            },
            { "slotStart": "10:00", "slotEnd": "10:30", "status": "Cancelled" },
            { "slotStart": "10:30", "slotEnd": "11:00", "status": "Available" }
        ]));

        let board = aggregate(&raw);

        assert_eq!(
            board.stats,
            SlotStats { booked: 1, reviewed: 0, cancelled: 0, completed: 0, total: 4 }
        );
        assert!(board.rows[0].is_empty);
        assert_eq!(board.rows[1].billing, BillingState::Pending);
        assert_eq!(board.rows[1].id, "11");
        assert_eq!(board.rows[1].token_no, "T11");
        // not empty (status is not Available), so billing is not N/A
        assert!(!board.rows[2].is_empty);
        assert_eq!(board.rows[2].status, "Cancelled");
    }

    #[test]
    fn appointment_status_drives_buckets_for_non_booked_slots() {
        let raw = day(json!([
            { "slotStart": "09:00", "status": "Completed", "appointment": { "appointmentId": 1, "appointmentStatus": "Completed" } },
            { "slotStart": "09:30", "status": "Reviewed", "appointment": { "appointmentId": 2, "appointmentStatus": "Reviewed" } },
            { "slotStart": "10:00", "status": "Cancelled", "appointment": { "appointmentId": 3, "appointmentStatus": "Cancelled" } },
            { "slotStart": "10:30", "status": "Cancelled", "appointment": { "appointmentId": 4, "appointmentStatus": "NoShow" } }
        ]));

        let board = aggregate(&raw);

        assert_eq!(board.stats.completed, 1);
        assert_eq!(board.stats.reviewed, 1);
        assert_eq!(board.stats.cancelled, 1);
        assert_eq!(board.stats.booked, 0);
        assert_eq!(board.stats.total, 4);
        assert_eq!(board.rows[0].billing, BillingState::Completed);
        assert_eq!(board.rows[3].billing, BillingState::Pending);
    }

    #[test]
    fn booked_slot_is_counted_once() {
        let raw = day(json!([
            { "slotStart": "09:00", "status": "Booked", "appointment": { "appointmentId": 5, "appointmentStatus": "Completed" } }
        ]));

        let board = aggregate(&raw);

        assert_eq!(board.stats.booked, 1);
        assert_eq!(board.stats.completed, 0);
        assert_eq!(board.stats.classified(), 1);
    }

    #[test]
    fn synthesized_ids_are_unique_for_repeated_start_times() {
        let raw = day(json!([
            { "slotStart": "09:00", "status": "Available" },
            { "slotStart": "09:00", "status": "Available" }
        ]));

        let board = aggregate(&raw);

        assert_eq!(board.rows[0].id, "slot-09:00-0");
        assert_eq!(board.rows[1].id, "slot-09:00-1");
    }

    #[test]
    fn row_order_and_count_follow_input() {
        let starts = ["11:00", "09:00", "10:00", "08:30", "12:15"];
        let slots: Vec<Value> = starts
            .iter()
            .map(|s| json!({ "slotStart": s, "status": "Available" }))
            .collect();

        let board = aggregate(&day(Value::Array(slots)));

        let times: Vec<&str> = board.rows.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, starts);
        assert_eq!(board.stats.total, starts.len());
        assert!(board
            .rows
            .iter()
            .all(|r| r.is_empty && r.billing == BillingState::NotApplicable));
    }

    #[test]
    fn malformed_slot_still_produces_a_row() {
        let raw = day(json!([42, { "slotStart": "09:00", "status": "Available" }]));

        let board = aggregate(&raw);

        assert_eq!(board.rows.len(), 2);
        assert_eq!(board.stats.total, 2);
        assert_eq!(board.rows[0].id, "slot--0");
        assert!(!board.rows[0].is_empty);
    }

    #[test]
    fn missing_slots_yield_an_empty_board() {
        for raw in [
            Value::Null,
            json!("not json at all"),
            json!({}),
            json!({ "appointmentId": null }),
            json!({ "appointmentId": { "doctorId": 1 } }),
            json!({ "appointmentId": 17 }),
        ] {
            let board = aggregate(&raw);
            assert!(board.rows.is_empty());
            assert_eq!(board.stats, SlotStats::default());
            assert!(board.doctor_info.is_none());
        }
    }

    #[test]
    fn doctor_info_is_carried_through() {
        let board = aggregate(&day(json!([])));
        let info = board.doctor_info.unwrap();

        assert_eq!(info.doctor_name.as_deref(), Some("Dr. John Smith"));
        assert_eq!(info.day.as_deref(), Some("Monday"));
    }
}
