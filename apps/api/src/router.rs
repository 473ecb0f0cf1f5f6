use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::{appointment_routes, billing_routes};
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_gateway::GatewayContext;

pub fn create_router(ctx: Arc<GatewayContext>) -> Router {
    Router::new()
        .route("/", get(|| async { "Front-office gateway is running!" }))
        .nest("/appointments", appointment_routes(ctx.clone()))
        .nest("/billing", billing_routes())
        .nest("/doctors", doctor_routes(ctx.clone()))
        .nest("/patients", patient_routes(ctx))
}
