//! # brandsvc-api — Axum HTTP API for the Brand Service
//!
//! Every route is contract-bound: request bodies and query strings are
//! validated against declared models before a handler runs, and handler
//! results are serialized against declared response models on the way
//! out (see `brandsvc-contract`).
//!
//! ## API Surface
//!
//! | Route                    | Module              | Concern              |
//! |--------------------------|---------------------|----------------------|
//! | `GET /`                  | [`routes`]          | Health check         |
//! | `GET/POST /v1/brands`    | [`routes::brands`]  | List / create        |
//! | `GET/PATCH/DELETE /v1/brands/:id` | [`routes::brands`] | Fetch / update / delete |
//! | `GET /v1/me`             | [`routes::me`]      | Session claims       |
//! | `GET /openapi.json`      | [`openapi`]         | Documentation        |
//!
//! ## State & Persistence
//!
//! Brand records live in an in-memory store hydrated from Postgres at
//! startup when `DATABASE_URL` is configured; mutations write through.
//! Without a database the API is fully functional in-memory.

pub mod core;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod schemas;
pub mod state;

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::schemas::BrandContracts;
use crate::state::AppState;

/// Assemble the full application router.
///
/// Contracts are built here, once, and shared with handlers via
/// `Extension`; the OpenAPI document is assembled from the same
/// contracts so routes and documentation cannot drift apart.
pub fn app(state: AppState) -> Router {
    let contracts = Arc::new(BrandContracts::new());

    let spec = openapi::build_spec(&contracts).unwrap_or_else(|err| {
        // A documentation mistake never takes the API down; the
        // document degrades to an empty one instead.
        tracing::error!(error = %err, "OpenAPI assembly failed; serving empty document");
        brandsvc_contract::ApiDocBuilder::new(openapi::API_TITLE, openapi::API_VERSION).build()
    });

    Router::new()
        .merge(routes::router())
        .merge(routes::brands::router())
        .merge(routes::me::router())
        .merge(openapi::router())
        .layer(Extension(contracts))
        .layer(Extension(Arc::new(spec)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app(AppState::new());
        let req = Request::builder()
            .uri("/openapi.json")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let spec: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(spec["info"]["title"], "Brand Service API");
        assert!(spec["paths"]["/v1/brands"].is_object());
        assert!(spec["components"]["schemas"]["Brand"].is_object());
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app(AppState::new());
        let req = Request::builder()
            .uri("/v1/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
