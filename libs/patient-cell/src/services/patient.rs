use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_gateway::{GatewayContext, GatewayError, Method};

use crate::models::{Patient, PatientRegistration};

pub struct PatientService {
    ctx: Arc<GatewayContext>,
}

impl PatientService {
    pub fn new(ctx: Arc<GatewayContext>) -> Self {
        Self { ctx }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        debug!("Fetching patient list");

        let raw = self.ctx.backend.request_value(Method::GET, "/patients", None).await?;
        let patients = parse_patient_list(&raw);

        debug!("Fetched {} patients", patients.len());
        Ok(patients)
    }

    /// `Ok(None)` when the backend has no such patient.
    pub async fn get_patient(&self, patient_id: &str) -> Result<Option<Patient>> {
        debug!("Fetching patient {}", patient_id);

        let path = format!("/patients/{}", patient_id);
        let raw = match self.ctx.backend.request_value(Method::GET, &path, None).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record = match raw {
            Value::Object(mut envelope) if envelope.contains_key("data") => {
                envelope.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        if record.is_null() {
            return Ok(None);
        }

        let patient = serde_json::from_value(record)
            .map_err(|e| GatewayError::Decode(format!("patient {}: {}", patient_id, e)))?;
        Ok(Some(patient))
    }

    pub async fn create_patient(&self, registration: &PatientRegistration) -> Result<Value> {
        info!(
            "Registering patient {} {}",
            registration.first_name, registration.last_name
        );

        let body = serde_json::to_value(registration)?;
        let created = self
            .ctx
            .backend
            .request_value(Method::POST, "/patients", Some(body))
            .await?;
        Ok(created)
    }

    pub async fn update_patient(&self, patient_id: &str, registration: &PatientRegistration) -> Result<Value> {
        info!("Updating patient {}", patient_id);

        let body = serde_json::to_value(registration)?;
        let path = format!("/patients/{}", patient_id);
        let updated = self
            .ctx
            .backend
            .request_value(Method::PUT, &path, Some(body))
            .await?;
        Ok(updated)
    }

    pub async fn delete_patient(&self, patient_id: &str) -> Result<()> {
        info!("Deleting patient {}", patient_id);

        let path = format!("/patients/{}", patient_id);
        self.ctx.backend.request_value(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

/// Accepts a bare array or a `{ data: [...] }` envelope.
pub fn parse_patient_list(raw: &Value) -> Vec<Patient> {
    let items: &[Value] = match raw {
        Value::Array(items) => items,
        Value::Object(envelope) => match envelope.get("data") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Patient>(item.clone()) {
            Ok(patient) => Some(patient),
            Err(e) => {
                warn!("Skipping malformed patient record: {}", e);
                None
            }
        })
        .collect()
}
