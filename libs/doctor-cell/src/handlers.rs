use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_gateway::{upstream_error, GatewayContext};
use shared_models::error::AppError;
use shared_models::Notification;

use crate::models::{FieldEdit, RowId, SaveResult};
use crate::services::{DoctorService, EditorRegistry};

/// Shared by every doctor route.
#[derive(Clone)]
pub struct DoctorState {
    pub ctx: Arc<GatewayContext>,
    pub editors: Arc<EditorRegistry>,
}

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<DoctorState>) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(state.ctx.clone());

    let doctors = doctor_service
        .list_doctors()
        .await
        .map_err(|e| upstream_error("Failed to load doctors", e))?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

// ==============================================================================
// AVAILABILITY EDITOR
// ==============================================================================

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let editor = state.editors.editor(doctor_id).await;
    let entries = editor.load().await?;

    Ok(Json(json!({ "entries": entries })))
}

#[axum::debug_handler]
pub async fn add_availability_row(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let editor = state.editors.editor(doctor_id).await;
    let entries = editor.add_row();

    Ok(Json(json!({ "entries": entries })))
}

#[axum::debug_handler]
pub async fn edit_availability_row(
    State(state): State<DoctorState>,
    Path((doctor_id, row_id)): Path<(i64, String)>,
    Json(edit): Json<FieldEdit>,
) -> Result<Json<Value>, AppError> {
    let editor = state.editors.editor(doctor_id).await;
    let entries = editor.edit_field(&RowId::parse(&row_id), edit);

    Ok(Json(json!({ "entries": entries })))
}

#[axum::debug_handler]
pub async fn delete_availability_row(
    State(state): State<DoctorState>,
    Path((doctor_id, row_id)): Path<(i64, String)>,
) -> Result<Json<Value>, AppError> {
    let editor = state.editors.editor(doctor_id).await;
    let deleted = editor.delete_row(&RowId::parse(&row_id)).await?;

    let notification = if deleted.was_persisted {
        Notification::success("Time slot deleted successfully")
    } else {
        Notification::success("Time slot removed")
    };

    Ok(Json(json!({
        "entries": deleted.entries,
        "notification": notification
    })))
}

#[axum::debug_handler]
pub async fn save_availability(
    State(state): State<DoctorState>,
    Path(doctor_id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let editor = state.editors.editor(doctor_id).await;
    let result = editor.save().await?;

    if let SaveResult::Invalid { row_id, message } = &result {
        let mut fields = shared_models::FieldErrors::new();
        fields.insert(row_id.to_string(), message.clone());
        return Err(AppError::InvalidFields(fields));
    }

    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((
        status,
        Json(json!({
            "result": result,
            "notification": result.notification(),
            "entries": editor.snapshot()
        })),
    ))
}
