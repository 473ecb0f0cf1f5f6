use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde_json::{json, Value};

use shared_gateway::{upstream_error, GatewayContext};
use shared_models::error::AppError;
use shared_models::Notification;

use crate::models::{PatientFilter, PatientRegistration};
use crate::services::{filter_patients, validate_registration, PatientService};

#[axum::debug_handler]
pub async fn list_patients(
    State(ctx): State<Arc<GatewayContext>>,
    Query(filter): Query<PatientFilter>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(ctx);

    let patients = service
        .list_patients()
        .await
        .map_err(|e| upstream_error("Failed to load patients", e))?;
    let patients = filter_patients(&patients, &filter, Local::now().date_naive());

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(ctx): State<Arc<GatewayContext>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(ctx);

    let patient = service
        .get_patient(&patient_id)
        .await
        .map_err(|e| upstream_error("Failed to load patient", e))?
        .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(ctx): State<Arc<GatewayContext>>,
    Json(form): Json<PatientRegistration>,
) -> Result<Json<Value>, AppError> {
    validate_registration(&form).map_err(AppError::InvalidFields)?;

    let service = PatientService::new(ctx);
    let patient = service
        .create_patient(&form)
        .await
        .map_err(|e| upstream_error("Failed to register patient", e))?;

    Ok(Json(json!({
        "patient": patient,
        "notification": Notification::success("Patient registered successfully!")
    })))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(ctx): State<Arc<GatewayContext>>,
    Path(patient_id): Path<String>,
    Json(form): Json<PatientRegistration>,
) -> Result<Json<Value>, AppError> {
    validate_registration(&form).map_err(AppError::InvalidFields)?;

    let service = PatientService::new(ctx);
    let patient = service
        .update_patient(&patient_id, &form)
        .await
        .map_err(|e| upstream_error("Failed to update patient", e))?;

    Ok(Json(json!({
        "patient": patient,
        "notification": Notification::success("Patient updated successfully!")
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(ctx): State<Arc<GatewayContext>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(ctx);

    service
        .delete_patient(&patient_id)
        .await
        .map_err(|e| upstream_error("Failed to delete patient", e))?;

    Ok(Json(json!({
        "deleted": patient_id,
        "notification": Notification::success("Patient deleted successfully")
    })))
}
