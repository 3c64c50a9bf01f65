//! # OpenAPI Document
//!
//! Assembles the documentation entries recorded by every brand contract
//! into one OpenAPI document at start-up, and serves it at
//! `/openapi.json`. Assembly failures degrade documentation only —
//! the API itself keeps serving.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Json, Router};
use brandsvc_contract::{ApiDocBuilder, DocError, HandlerDocs};
use utoipa::openapi::{OpenApi, PathItemType};

use crate::schemas::BrandContracts;
use crate::state::AppState;

pub const API_TITLE: &str = "Brand Service API";
pub const API_VERSION: &str = "v1";

const TAG: &str = "brand";

/// Assemble the OpenAPI document from the brand contracts.
pub fn build_spec(contracts: &BrandContracts) -> Result<OpenApi, DocError> {
    let mut builder = ApiDocBuilder::new(API_TITLE, API_VERSION);

    let mut list = HandlerDocs::new();
    list.attach_all(contracts.list.doc_entries())?;
    list.attach(contracts.list_response.doc_entry())?;
    builder.operation(PathItemType::Get, "/v1/brands", TAG, &list);

    let mut create = HandlerDocs::new();
    create.attach_all(contracts.create.doc_entries())?;
    create.attach(contracts.create_response.doc_entry())?;
    builder.operation(PathItemType::Post, "/v1/brands", TAG, &create);

    let mut fetch = HandlerDocs::new();
    fetch.attach(contracts.get_response.doc_entry())?;
    builder.operation(PathItemType::Get, "/v1/brands/{id}", TAG, &fetch);

    let mut update = HandlerDocs::new();
    update.attach_all(contracts.update.doc_entries())?;
    update.attach(contracts.update_response.doc_entry())?;
    builder.operation(PathItemType::Patch, "/v1/brands/{id}", TAG, &update);

    let mut delete = HandlerDocs::new();
    delete.attach(contracts.delete_response.doc_entry())?;
    builder.operation(PathItemType::Delete, "/v1/brands/{id}", TAG, &delete);

    Ok(builder.build())
}

/// Build the documentation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

/// GET /openapi.json — the assembled document.
async fn serve_spec(Extension(spec): Extension<Arc<OpenApi>>) -> Json<OpenApi> {
    Json(spec.as_ref().clone())
}
