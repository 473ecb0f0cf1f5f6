use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use shared_utils::StaleGuard;

use crate::models::{AvailabilityEntry, EditorError, FieldEdit, RowId, SaveResult};
use crate::services::reconciler;
use crate::services::store::CalendarStore;

/// Result of removing a row from the editor.
#[derive(Debug, Clone)]
pub struct Deleted {
    pub entries: Vec<AvailabilityEntry>,
    /// `true` when the backend record was deleted, `false` for unsaved rows.
    pub was_persisted: bool,
}

/// Editable availability buffer for one doctor.
///
/// The buffer lock is only held for copy-in/copy-out, never across a store
/// call. At most one save runs at a time.
pub struct AvailabilityEditor {
    doctor_id: i64,
    store: Arc<dyn CalendarStore>,
    buffer: Mutex<Vec<AvailabilityEntry>>,
    saving: AtomicBool,
    loads: StaleGuard<i64>,
}

struct SaveFlag<'a>(&'a AtomicBool);

impl Drop for SaveFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AvailabilityEditor {
    pub fn new(doctor_id: i64, store: Arc<dyn CalendarStore>) -> Self {
        Self {
            doctor_id,
            store,
            buffer: Mutex::new(Vec::new()),
            saving: AtomicBool::new(false),
            loads: StaleGuard::new(),
        }
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<AvailabilityEntry>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Vec<AvailabilityEntry> {
        self.buffer().clone()
    }

    /// Replaces the buffer with what the backend has now.
    ///
    /// If another load started while this one was in flight, its result wins
    /// and this one is discarded.
    pub async fn load(&self) -> Result<Vec<AvailabilityEntry>, EditorError> {
        let ticket = self.loads.begin(self.doctor_id);
        let raw = self
            .store
            .fetch_entries(self.doctor_id)
            .await
            .map_err(EditorError::Load)?;
        let entries = reconciler::normalize(&raw);

        if !self.loads.is_current(&ticket) {
            debug!("Discarding superseded calendar load for doctor {}", self.doctor_id);
            return Ok(self.snapshot());
        }

        debug!("Loaded {} time slot(s) for doctor {}", entries.len(), self.doctor_id);
        *self.buffer() = entries.clone();
        Ok(entries)
    }

    pub fn add_row(&self) -> Vec<AvailabilityEntry> {
        let mut buffer = self.buffer();
        *buffer = reconciler::add_row(&buffer, self.doctor_id);
        buffer.clone()
    }

    pub fn edit_field(&self, row_id: &RowId, edit: FieldEdit) -> Vec<AvailabilityEntry> {
        let mut buffer = self.buffer();
        *buffer = reconciler::edit_field(&buffer, row_id, edit);
        buffer.clone()
    }

    pub async fn delete_row(&self, row_id: &RowId) -> Result<Deleted, EditorError> {
        let snapshot = self.snapshot();
        let was_persisted = snapshot
            .iter()
            .any(|row| &row.id == row_id && !row.is_new && row.id.backend_id().is_some());

        reconciler::delete_row(&snapshot, row_id, self.store.as_ref()).await?;

        // Other edits may have landed while the delete was in flight.
        let mut buffer = self.buffer();
        buffer.retain(|row| &row.id != row_id);
        Ok(Deleted {
            entries: buffer.clone(),
            was_persisted,
        })
    }

    /// Saves the whole buffer and reloads it if anything was written.
    pub async fn save(&self) -> Result<SaveResult, EditorError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected concurrent save for doctor {}", self.doctor_id);
            return Err(EditorError::SaveInFlight);
        }
        let _flag = SaveFlag(&self.saving);

        let snapshot = self.snapshot();
        let result = reconciler::save(&snapshot, self.doctor_id, self.store.as_ref()).await;

        if result.persisted() > 0 {
            if let Err(e) = self.load().await {
                warn!(
                    "Saved availability for doctor {} but could not reload it: {}",
                    self.doctor_id, e
                );
            }
        }

        Ok(result)
    }
}

/// Editors for every doctor the gateway has touched.
pub struct EditorRegistry {
    store: Arc<dyn CalendarStore>,
    editors: RwLock<HashMap<i64, Arc<AvailabilityEditor>>>,
}

impl EditorRegistry {
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self {
            store,
            editors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn editor(&self, doctor_id: i64) -> Arc<AvailabilityEditor> {
        if let Some(editor) = self.editors.read().await.get(&doctor_id) {
            return editor.clone();
        }

        let mut editors = self.editors.write().await;
        editors
            .entry(doctor_id)
            .or_insert_with(|| {
                info!("Opening availability editor for doctor {}", doctor_id);
                Arc::new(AvailabilityEditor::new(doctor_id, self.store.clone()))
            })
            .clone()
    }

    pub async fn open_count(&self) -> usize {
        self.editors.read().await.len()
    }
}
