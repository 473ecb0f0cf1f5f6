use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use shared_gateway::{GatewayContext, Method};

use crate::models::CalendarPayload;
use crate::services::store::CalendarStore;

/// Doctor calendar endpoints of the hospital backend.
pub struct AvailabilityService {
    ctx: Arc<GatewayContext>,
}

impl AvailabilityService {
    pub fn new(ctx: Arc<GatewayContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl CalendarStore for AvailabilityService {
    async fn fetch_entries(&self, doctor_id: i64) -> Result<Value> {
        debug!("Fetching calendar for doctor {}", doctor_id);

        let path = format!("/doctorsapi/get-doctor-calendar/{}", doctor_id);
        let raw = self.ctx.backend.request_value(Method::GET, &path, None).await?;
        Ok(raw)
    }

    async fn create_entry(&self, payload: &CalendarPayload) -> Result<Value> {
        debug!(
            "Creating calendar entry for doctor {} on day {}",
            payload.doctor_id, payload.day_id
        );

        let created = self
            .ctx
            .backend
            .request_value(Method::POST, "/doctorsapi/add-doctor-calendar", Some(json!(payload)))
            .await?;
        Ok(created)
    }

    async fn update_entry(&self, id: i64, payload: &CalendarPayload) -> Result<Value> {
        debug!("Updating calendar entry {}", id);

        let path = format!("/doctorsapi/update-doctor-calendar/{}", id);
        let updated = self
            .ctx
            .backend
            .request_value(Method::PUT, &path, Some(json!(payload)))
            .await?;
        Ok(updated)
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        debug!("Deleting calendar entry {}", id);

        let path = format!("/doctorsapi/delete-doctor-calendar/{}", id);
        self.ctx
            .backend
            .request_value(Method::DELETE, &path, None)
            .await?;
        Ok(())
    }
}
