//! # Route Modules
//!
//! One module per API surface. Each exposes a `router()` that the
//! application assembler merges; contracts arrive via `Extension`.

pub mod brands;
pub mod me;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Root router: the unversioned health check.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET / — liveness signal for load balancers and smoke tests.
async fn health() -> Json<Value> {
    Json(json!({ "message": "API is working fine!" }))
}
