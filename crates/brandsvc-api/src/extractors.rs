//! # Request Extractors
//!
//! Axum extractors bridging the session-token cookie to typed claims.
//! Handlers that require a caller take [`SessionClaims`]; handlers
//! where the caller is optional take [`OptionalSessionClaims`], which
//! treats an absent cookie as anonymous but still rejects a cookie
//! that fails to decode. Plain `Option<SessionClaims>` would swallow
//! the decode failure, so it is not used.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use brandsvc_contract::claims::decode_session_token;
use brandsvc_contract::{claims_from_cookie, UserClaims, SESSION_COOKIE};

use crate::error::AppError;
use crate::state::AppState;

/// Claims decoded from the session-token cookie. Missing cookie is a
/// 401, undecodable token a 400.
#[derive(Debug, Clone)]
pub struct SessionClaims(pub UserClaims);

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        let claims = claims_from_cookie(token.as_deref(), &state.config.session_secret)?;
        Ok(Self(claims))
    }
}

/// Claims for handlers that accept anonymous callers. No cookie yields
/// `None`; a present but undecodable cookie is still a 400 — the
/// failure is never downgraded to anonymous.
#[derive(Debug, Clone)]
pub struct OptionalSessionClaims(pub Option<UserClaims>);

#[axum::async_trait]
impl FromRequestParts<AppState> for OptionalSessionClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match jar.get(SESSION_COOKIE) {
            None => Ok(Self(None)),
            Some(cookie) => {
                let claims = decode_session_token(cookie.value(), &state.config.session_secret)
                    .map_err(AppError::from)?;
                Ok(Self(Some(claims)))
            }
        }
    }
}
