// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_gateway::GatewayContext;

use crate::handlers::{self, AppointmentState};
use crate::services::ScheduleBoard;

pub fn appointment_routes(ctx: Arc<GatewayContext>) -> Router {
    let state = AppointmentState {
        ctx,
        board: Arc::new(ScheduleBoard::new()),
    };

    Router::new()
        .route("/board", get(handlers::get_board))
        .route("/board/current", get(handlers::current_board))
        .route("/book", post(handlers::book_appointment))
        .with_state(state)
}

pub fn billing_routes() -> Router {
    Router::new().route("/summary", post(handlers::billing_summary))
}
