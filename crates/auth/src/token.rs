//! Session token inspection.
//!
//! A session token is a compact `header.payload.signature` triple. Only the
//! payload is decoded; the signature is **not** verified. Results are
//! informational (UI state, error classification) and never a trust decision.
//!
//! The lenient helpers (`is_active`, `get_user_id`, ...) log a warning and
//! return `None` when the token cannot be decoded, so `None` means "cannot
//! determine" and is distinct from an explicit `Some(false)`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use accountkit_core::{CustomerId, UserId};

use crate::{Role, TokenClaims};

#[derive(Debug, Error)]
pub enum TokenDecodeError {
    #[error("expected 3 dot-separated segments, found {0}")]
    Segments(usize),

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a claims object")]
    NotAnObject,
}

/// Decode the claims of `token` without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenDecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(TokenDecodeError::Segments(segments.len()));
    };

    // Accept padded and standard-alphabet payloads too.
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(payload) => Ok(TokenClaims::from_object(&payload)),
        _ => Err(TokenDecodeError::NotAnObject),
    }
}

fn inspect(token: &str) -> Option<TokenClaims> {
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(err) => {
            tracing::warn!(error = %err, "invalid jwt");
            None
        }
    }
}

/// Whether the token is live now. See [`is_active_at`].
pub fn is_active(token: &str) -> Option<bool> {
    is_active_at(token, Utc::now())
}

/// `None` if the token is malformed or has no `exp`; otherwise `now < exp`.
pub fn is_active_at(token: &str, now: DateTime<Utc>) -> Option<bool> {
    inspect(token)?.is_active_at(now)
}

pub fn get_user_id(token: &str) -> Option<UserId> {
    inspect(token)?.uid
}

pub fn get_roles(token: &str) -> Option<Vec<Role>> {
    inspect(token)?.roles
}

/// Customer id of a customer-user token (first `metadata` statement in `ccs`).
pub fn get_customer_id(token: &str) -> Option<CustomerId> {
    inspect(token)?.customer_id().cloned()
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::Value;

    /// Mint an HS256 token over arbitrary claims.
    pub fn sign(claims: Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("failed to encode jwt")
    }

    pub fn now_secs() -> i64 {
        chrono::Utc::now().timestamp()
    }
}
