use std::sync::Arc;

use axum::{routing::get, Router};

use shared_gateway::GatewayContext;

use crate::handlers::*;

pub fn patient_routes(ctx: Arc<GatewayContext>) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route(
            "/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .with_state(ctx)
}
