//! # Brand Operations
//!
//! Domain logic behind the brand routes: filtered pagination, creation
//! with a unique-code rule, full-record patch, and deletion. Handlers
//! hand in the validated payloads produced by the request contracts and
//! get back wire-shaped values ready for the response contracts.
//!
//! The in-memory store is the source of truth; when a database pool is
//! present every mutation is written through before the call returns.

use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db;
use crate::error::AppError;
use crate::state::{AppState, BrandRecord};

/// Validated list-query arguments, as bound by the request contract.
#[derive(Debug, Deserialize)]
struct ListQueryArgs {
    page: i64,
    per_page: i64,
    code: String,
    name: String,
    is_active: Option<bool>,
}

/// Validated write payload shared by create and update.
#[derive(Debug, Deserialize)]
struct WriteArgs {
    code: String,
    name: String,
    is_active: bool,
}

fn typed<T: for<'de> Deserialize<'de>>(value: &Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone())
        .map_err(|err| AppError::Internal(format!("bound payload has unexpected shape: {err}")))
}

fn brand_view(record: &BrandRecord) -> Value {
    json!({
        "id": record.id,
        "code": record.code,
        "name": record.name,
        "is_active": record.is_active,
    })
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("brand with id {id} not found"))
}

/// List brands matching the query's filters, one page at a time.
///
/// `code` and `name` are case-insensitive substring filters; empty
/// strings match everything. `total_pages` reflects the filtered set,
/// and a page past the end yields an empty `data` array rather than an
/// error.
pub fn get_all(state: &AppState, query_args: &Value) -> Result<Value, AppError> {
    let args: ListQueryArgs = typed(query_args)?;
    let code_filter = args.code.to_lowercase();
    let name_filter = args.name.to_lowercase();

    let matches: Vec<BrandRecord> = state
        .brands
        .list()
        .into_iter()
        .filter(|record| {
            record.code.to_lowercase().contains(&code_filter)
                && record.name.to_lowercase().contains(&name_filter)
                && args.is_active.map_or(true, |want| record.is_active == want)
        })
        .collect();

    let per_page = args.per_page.max(1);
    let page = args.page.max(1);
    let total = matches.len() as i64;
    let total_pages = (total + per_page - 1) / per_page;

    // An offset that overflows i64 is past the end of any result set.
    let data: Vec<Value> = match (page - 1).checked_mul(per_page) {
        Some(start) => matches
            .iter()
            .skip(start as usize)
            .take(per_page as usize)
            .map(brand_view)
            .collect(),
        None => Vec::new(),
    };

    Ok(json!({
        "data": data,
        "page_num": page,
        "page_size": per_page,
        "total_pages": total_pages,
    }))
}

/// Fetch one brand by id.
pub fn get(state: &AppState, id: i64) -> Result<Value, AppError> {
    let record = state.brands.get(id).ok_or_else(|| not_found(id))?;
    Ok(json!({ "data": brand_view(&record) }))
}

/// Create a brand. Codes are unique across all brands.
pub async fn create(
    state: &AppState,
    payload: &Value,
    actor: Option<String>,
) -> Result<Value, AppError> {
    let args: WriteArgs = typed(payload)?;

    if state.brands.find_by_code(&args.code).is_some() {
        return Err(AppError::Conflict("brand code already exists".to_string()));
    }

    let now = Utc::now();
    let record = BrandRecord {
        id: state.brands.allocate_id(),
        code: args.code,
        name: args.name,
        is_active: args.is_active,
        created_by: actor.clone(),
        modified_by: actor,
        created_at: now,
        updated_at: now,
    };

    if let Some(pool) = &state.db_pool {
        db::brands::insert(pool, &record)
            .await
            .map_err(|err| AppError::Internal(format!("brand insert failed: {err}")))?;
    }

    tracing::info!(id = record.id, code = %record.code, "brand created");
    state.brands.insert(record.clone());
    Ok(json!({ "data": brand_view(&record) }))
}

/// Replace a brand's writable fields. The patch payload carries every
/// writable field (absent ones were filled with model defaults during
/// binding), so this is a full overwrite, not a merge.
pub async fn update(
    state: &AppState,
    id: i64,
    payload: &Value,
    actor: Option<String>,
) -> Result<Value, AppError> {
    let args: WriteArgs = typed(payload)?;

    if let Some(existing) = state.brands.find_by_code(&args.code) {
        if existing.id != id {
            return Err(AppError::Conflict("brand code already exists".to_string()));
        }
    }

    let record = state
        .brands
        .update(id, |record| {
            record.code = args.code.clone();
            record.name = args.name.clone();
            record.is_active = args.is_active;
            record.modified_by = actor.clone();
            record.updated_at = Utc::now();
        })
        .ok_or_else(|| not_found(id))?;

    if let Some(pool) = &state.db_pool {
        db::brands::update(pool, &record)
            .await
            .map_err(|err| AppError::Internal(format!("brand update failed: {err}")))?;
    }

    tracing::info!(id = record.id, code = %record.code, "brand updated");
    Ok(json!({ "data": brand_view(&record) }))
}

/// Delete a brand by id.
pub async fn delete(state: &AppState, id: i64) -> Result<Value, AppError> {
    let record = state.brands.remove(id).ok_or_else(|| not_found(id))?;

    if let Some(pool) = &state.db_pool {
        db::brands::delete(pool, id)
            .await
            .map_err(|err| AppError::Internal(format!("brand delete failed: {err}")))?;
    }

    tracing::info!(id = record.id, code = %record.code, "brand deleted");
    Ok(json!({ "data": "Successfully deleted the brand record" }))
}
