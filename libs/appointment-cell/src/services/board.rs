use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::debug;

use shared_utils::{StaleGuard, Ticket};

use crate::models::{AppointmentBoard, AppointmentError};
use crate::services::booking::AppointmentService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardKey {
    pub doctor_id: i64,
    pub date: NaiveDate,
}

/// View state for the booking page: which doctor/day is selected and the
/// last grid applied for it.
///
/// A fetch that finishes after the selection moved on is dropped instead of
/// overwriting the grid for the new selection.
#[derive(Debug, Default)]
pub struct ScheduleBoard {
    guard: StaleGuard<BoardKey>,
    view: Mutex<Option<(BoardKey, AppointmentBoard)>>,
}

impl ScheduleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, doctor_id: i64, date: NaiveDate) -> Ticket<BoardKey> {
        self.guard.begin(BoardKey { doctor_id, date })
    }

    /// Returns `false` when the ticket was superseded and the board dropped.
    pub fn apply(&self, ticket: &Ticket<BoardKey>, board: AppointmentBoard) -> bool {
        if !self.guard.is_current(ticket) {
            debug!("Discarding stale board for {:?}", ticket.key());
            return false;
        }
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        *view = Some((*ticket.key(), board));
        true
    }

    pub fn current(&self) -> Option<AppointmentBoard> {
        let view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        view.as_ref().map(|(_, board)| board.clone())
    }

    pub fn selection(&self) -> Option<BoardKey> {
        self.guard.current_key()
    }

    /// Select a doctor/day, fetch it and apply the result if still current.
    ///
    /// The fetched board is always returned; the flag says whether it was
    /// applied or superseded by a later selection.
    pub async fn refresh(
        &self,
        service: &AppointmentService,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<(AppointmentBoard, bool), AppointmentError> {
        let ticket = self.select(doctor_id, date);
        let board = service.fetch_board(doctor_id, date).await?;
        let applied = self.apply(&ticket, board.clone());
        Ok((board, applied))
    }
}
