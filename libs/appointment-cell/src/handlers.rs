// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use shared_gateway::GatewayContext;
use shared_models::error::AppError;
use shared_models::Notification;

use crate::models::{BillingRequest, BoardQuery, BookAppointmentRequest};
use crate::services::billing;
use crate::services::booking::AppointmentService;
use crate::services::ScheduleBoard;

/// Shared by the appointment routes.
#[derive(Clone)]
pub struct AppointmentState {
    pub ctx: Arc<GatewayContext>,
    pub board: Arc<ScheduleBoard>,
}

#[axum::debug_handler]
pub async fn get_board(
    State(state): State<AppointmentState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state.ctx.clone());

    let (board, applied) = state
        .board
        .refresh(&service, query.doctor_id, query.date)
        .await
        .map_err(|e| {
            error!("Failed to fetch appointments for doctor {}: {}", query.doctor_id, e);
            AppError::from(e)
        })?;

    let mut body = json!(board);
    body["current"] = json!(applied);
    Ok(Json(body))
}

/// Selection and grid last applied by `get_board`.
#[axum::debug_handler]
pub async fn current_board(State(state): State<AppointmentState>) -> Result<Json<Value>, AppError> {
    let Some(board) = state.board.current() else {
        return Err(AppError::NotFound("No appointment board loaded yet".to_string()));
    };

    Ok(Json(json!({
        "selection": state.board.selection().map(|key| json!({
            "doctorId": key.doctor_id,
            "date": key.date
        })),
        "board": board
    })))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(state.ctx);
    let doctor_id = request.doctor_id;

    let response = service.book(request).await.map_err(|e| {
        error!("Booking for doctor {} failed: {}", doctor_id, e);
        AppError::from(e)
    })?;

    Ok(Json(json!({
        "appointment": response,
        "notification": Notification::success("Appointment booked successfully")
    })))
}

#[axum::debug_handler]
pub async fn billing_summary(Json(request): Json<BillingRequest>) -> Result<Json<Value>, AppError> {
    if request.items.is_empty() {
        return Err(AppError::BadRequest("Add at least one billing item".to_string()));
    }

    let summary = billing::summarize(&request.items, request.amount_paid);
    Ok(Json(json!(summary)))
}
