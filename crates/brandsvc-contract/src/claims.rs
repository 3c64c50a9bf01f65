//! # Session Token Claims
//!
//! Decodes the signed session-token cookie into a typed claims value.
//! The contract is one validated outcome or a typed failure: a missing
//! cookie is distinct from a malformed or badly-signed token, and the
//! boundary maps each to its own HTTP status. Secret material and
//! algorithm configuration are owned by the caller — this module only
//! performs the decode.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "next-auth.session-token";

/// Decoded, validated claims extracted from the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub name: String,
    pub email: String,
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "iat")]
    pub issued_at: i64,
}

/// Failure to produce claims from a request.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// No session cookie on the request. Terminal; no retry.
    #[error("session cookie is missing")]
    MissingCookie,

    /// The cookie's value is not a validly signed, well-formed token.
    #[error("session token could not be decoded: {0}")]
    Decode(String),
}

/// Decode and verify an HS256 session token.
///
/// Tokens carry `iat` but no `exp`, so expiry validation is disabled;
/// signature verification is not.
pub fn decode_session_token(token: &str, secret: &[u8]) -> Result<UserClaims, ClaimsError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims::<&str>(&[]);

    let data = decode::<UserClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|err| ClaimsError::Decode(err.to_string()))?;
    Ok(data.claims)
}

/// Produce claims from an optional cookie value.
///
/// Absent cookie → [`ClaimsError::MissingCookie`]; present but invalid →
/// [`ClaimsError::Decode`].
pub fn claims_from_cookie(cookie: Option<&str>, secret: &[u8]) -> Result<UserClaims, ClaimsError> {
    let token = cookie.ok_or(ClaimsError::MissingCookie)?;
    decode_session_token(token, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn signed_token(secret: &[u8]) -> String {
        let claims = UserClaims {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            subject: "user-1".to_string(),
            issued_at: 1_700_000_000,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let token = signed_token(SECRET);
        let claims = decode_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.name, "Test User");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.subject, "user-1");
        assert_eq!(claims.issued_at, 1_700_000_000);
    }

    #[test]
    fn wrong_signature_is_a_decode_failure() {
        let token = signed_token(b"other-secret");
        let err = decode_session_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, ClaimsError::Decode(_)));
    }

    #[test]
    fn malformed_token_is_a_decode_failure() {
        let err = decode_session_token("not.a.token", SECRET).unwrap_err();
        assert!(matches!(err, ClaimsError::Decode(_)));
        let err = decode_session_token("two-segments.only", SECRET).unwrap_err();
        assert!(matches!(err, ClaimsError::Decode(_)));
    }

    #[test]
    fn missing_cookie_is_distinct_from_decode_failure() {
        let err = claims_from_cookie(None, SECRET).unwrap_err();
        assert!(matches!(err, ClaimsError::MissingCookie));

        let err = claims_from_cookie(Some("garbage"), SECRET).unwrap_err();
        assert!(matches!(err, ClaimsError::Decode(_)));
    }

    #[test]
    fn present_valid_cookie_yields_claims() {
        let token = signed_token(SECRET);
        let claims = claims_from_cookie(Some(&token), SECRET).unwrap();
        assert_eq!(claims.subject, "user-1");
    }
}
