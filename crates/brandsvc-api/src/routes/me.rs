//! # Session Introspection API
//!
//! Returns the claims decoded from the caller's session-token cookie.
//! Exercises the full cookie-to-claims path: no cookie is 401, an
//! undecodable token is 400.

use axum::routing::get;
use axum::{Json, Router};
use brandsvc_contract::UserClaims;

use crate::extractors::SessionClaims;
use crate::state::AppState;

/// Build the session-introspection router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/me", get(me))
}

/// GET /v1/me — the caller's decoded session claims.
async fn me(SessionClaims(claims): SessionClaims) -> Json<UserClaims> {
    Json(claims)
}
