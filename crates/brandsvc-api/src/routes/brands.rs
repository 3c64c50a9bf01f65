//! # Brand CRUD API
//!
//! The five brand routes. Every handler follows the same shape: bind
//! the request against its declared contract, hand the validated
//! payload to [`crate::core`], then serialize the result through the
//! declared response contract. Handlers never see unvalidated wire
//! data.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::Value;

use crate::core;
use crate::error::AppError;
use crate::extractors::OptionalSessionClaims;
use crate::schemas::BrandContracts;
use crate::state::AppState;

/// Build the brands router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/brands", get(list_brands).post(create_brand))
        .route(
            "/v1/brands/:id",
            get(get_brand).patch(update_brand).delete(delete_brand),
        )
}

fn missing_bound_value(what: &str) -> AppError {
    AppError::Internal(format!("request contract produced no {what}"))
}

/// GET /v1/brands — filtered, paginated brand list.
async fn list_brands(
    State(state): State<AppState>,
    Extension(contracts): Extension<Arc<BrandContracts>>,
    Query(pairs): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let bound = contracts.list.bind(Some(body.as_ref()), &pairs)?;
    let query_args = bound
        .query_args
        .ok_or_else(|| missing_bound_value("query arguments"))?;

    let result = core::get_all(&state, &query_args)?;
    let wire = contracts
        .list_response
        .serialize(&result)
        .map_err(AppError::serialization)?;
    Ok(Json(wire))
}

/// GET /v1/brands/:id — fetch one brand.
async fn get_brand(
    State(state): State<AppState>,
    Extension(contracts): Extension<Arc<BrandContracts>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let result = core::get(&state, id)?;
    let wire = contracts
        .get_response
        .serialize(&result)
        .map_err(AppError::serialization)?;
    Ok(Json(wire))
}

/// POST /v1/brands — create a brand.
async fn create_brand(
    State(state): State<AppState>,
    Extension(contracts): Extension<Arc<BrandContracts>>,
    actor: OptionalSessionClaims,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let bound = contracts.create.bind(Some(body.as_ref()), &[])?;
    let payload = bound.payload.ok_or_else(|| missing_bound_value("payload"))?;

    let result = core::create(&state, &payload, actor.0.map(|claims| claims.name)).await?;
    let wire = contracts
        .create_response
        .serialize(&result)
        .map_err(AppError::serialization)?;
    Ok(Json(wire))
}

/// PATCH /v1/brands/:id — overwrite a brand's writable fields.
async fn update_brand(
    State(state): State<AppState>,
    Extension(contracts): Extension<Arc<BrandContracts>>,
    Path(id): Path<i64>,
    actor: OptionalSessionClaims,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let bound = contracts.update.bind(Some(body.as_ref()), &[])?;
    let payload = bound.payload.ok_or_else(|| missing_bound_value("payload"))?;

    let result = core::update(&state, id, &payload, actor.0.map(|claims| claims.name)).await?;
    let wire = contracts
        .update_response
        .serialize(&result)
        .map_err(AppError::serialization)?;
    Ok(Json(wire))
}

/// DELETE /v1/brands/:id — delete a brand.
async fn delete_brand(
    State(state): State<AppState>,
    Extension(contracts): Extension<Arc<BrandContracts>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let result = core::delete(&state, id).await?;
    let wire = contracts
        .delete_response
        .serialize(&result)
        .map_err(AppError::serialization)?;
    Ok(Json(wire))
}
