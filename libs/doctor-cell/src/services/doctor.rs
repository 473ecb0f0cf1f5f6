use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};

use shared_gateway::{GatewayContext, Method};

use crate::models::Doctor;

pub struct DoctorService {
    ctx: Arc<GatewayContext>,
}

impl DoctorService {
    pub fn new(ctx: Arc<GatewayContext>) -> Self {
        Self { ctx }
    }

    /// Doctors the front office can book against.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        debug!("Fetching doctor list");

        let raw = self.ctx.backend.request_value(Method::GET, "/doctors", None).await?;
        let doctors = parse_doctor_list(&raw);

        debug!("Fetched {} doctors", doctors.len());
        Ok(doctors)
    }
}

/// Accepts a bare array or a `{ message, data: [...] }` envelope.
pub fn parse_doctor_list(raw: &Value) -> Vec<Doctor> {
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
        .filter_map(|item| match serde_json::from_value::<Doctor>(item.clone()) {
            Ok(doctor) => Some(doctor),
            Err(e) => {
                warn!("Skipping malformed doctor record: {}", e);
                None
            }
        })
        .collect()
}
