use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_gateway::GatewayContext;

use crate::handlers::{self, DoctorState};
use crate::services::{AvailabilityService, EditorRegistry};

pub fn doctor_routes(ctx: Arc<GatewayContext>) -> Router {
    let store = Arc::new(AvailabilityService::new(ctx.clone()));
    let state = DoctorState {
        ctx,
        editors: Arc::new(EditorRegistry::new(store)),
    };

    doctor_routes_with_state(state)
}

/// Same routes over an explicit state, so callers can choose the calendar store.
pub fn doctor_routes_with_state(state: DoctorState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}/availability", get(handlers::get_availability))
        .route("/{doctor_id}/availability/rows", post(handlers::add_availability_row))
        .route(
            "/{doctor_id}/availability/rows/{row_id}",
            patch(handlers::edit_availability_row).delete(handlers::delete_availability_row),
        )
        .route("/{doctor_id}/availability/save", post(handlers::save_availability))
        .with_state(state)
}
