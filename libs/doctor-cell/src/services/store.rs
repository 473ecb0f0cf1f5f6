use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::CalendarPayload;

/// Where a doctor's weekly calendar is read from and written to.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Raw calendar body for one doctor, in whichever shape the backend sends.
    async fn fetch_entries(&self, doctor_id: i64) -> Result<Value>;

    async fn create_entry(&self, payload: &CalendarPayload) -> Result<Value>;

    async fn update_entry(&self, id: i64, payload: &CalendarPayload) -> Result<Value>;

    async fn delete_entry(&self, id: i64) -> Result<()>;
}
