//! Classification of failed API calls.
//!
//! The host's HTTP client reports a failure as an [`ApiFailure`]; these
//! functions turn it into the taxonomy in [`crate::error`].

use serde_json::Value;

use accountkit_core::ApiFailure;

use crate::error::{ApiError, AuthenticationError, AuthorizationError, UnexpectedError};
use crate::token;

/// Token from a `Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

/// Map a failed call onto [`ApiError`].
///
/// A 401 sent with a bearer token that decodes as expired becomes
/// [`AuthorizationError::Expired`]. A 401 whose token cannot be inspected is
/// passed through like any other error response.
pub fn classify_api_failure(failure: ApiFailure) -> ApiError {
    match failure {
        ApiFailure::Response {
            status,
            authorization,
            body,
        } => {
            if status == 401 {
                let expired = authorization
                    .as_deref()
                    .and_then(bearer_token)
                    .and_then(token::is_active)
                    .is_some_and(|active| !active);
                if expired {
                    tracing::info!("session expired");
                    return AuthorizationError::Expired.into();
                }
            }
            ApiError::Http { status, body }
        }
        ApiFailure::Transport(message) => ApiError::Transport(message),
        ApiFailure::Other(message) => {
            UnexpectedError(format!("unexpected API error: {message}")).into()
        }
    }
}

/// Map a failed OTP request onto [`AuthenticationError`].
pub fn classify_otp_failure(failure: &ApiFailure) -> AuthenticationError {
    let ApiFailure::Response { status, body, .. } = failure else {
        return AuthenticationError::General;
    };
    match status {
        429 => AuthenticationError::TooMany,
        400 if error_message(body.as_ref()).is_some_and(is_not_exists_message) => {
            AuthenticationError::NotExists
        }
        _ => AuthenticationError::General,
    }
}

fn error_message(body: Option<&Value>) -> Option<&str> {
    body?.get("error_message")?.as_str()
}

/// `<something> does not exist`, with at least one character before the suffix.
fn is_not_exists_message(message: &str) -> bool {
    message
        .strip_suffix("does not exist")
        .is_some_and(|prefix| !prefix.is_empty() && !prefix.contains('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::test_tokens::{now_secs, sign};
    use serde_json::json;

    fn unauthorized(token: &str) -> ApiFailure {
        ApiFailure::Response {
            status: 401,
            authorization: Some(format!("Bearer {token}")),
            body: None,
        }
    }

    #[test]
    fn expired_bearer_on_401_is_session_expired() {
        let token = sign(json!({ "exp": now_secs() - 60 }));
        assert_eq!(
            classify_api_failure(unauthorized(&token)),
            ApiError::Authorization(AuthorizationError::Expired)
        );
    }

    #[test]
    fn live_or_opaque_bearer_on_401_passes_through() {
        let live = sign(json!({ "exp": now_secs() + 3600 }));
        let no_exp = sign(json!({ "uid": "u" }));
        for token in [live.as_str(), no_exp.as_str(), "random"] {
            assert!(matches!(
                classify_api_failure(unauthorized(token)),
                ApiError::Http { status: 401, .. }
            ));
        }
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let token = sign(json!({ "exp": now_secs() - 60 }));
        let failure = ApiFailure::Response {
            status: 401,
            authorization: Some(format!("Basic {token}")),
            body: None,
        };
        assert!(matches!(
            classify_api_failure(failure),
            ApiError::Http { status: 401, .. }
        ));
    }

    #[test]
    fn expired_bearer_on_other_status_passes_through() {
        let token = sign(json!({ "exp": now_secs() - 60 }));
        let failure = ApiFailure::Response {
            status: 403,
            authorization: Some(format!("Bearer {token}")),
            body: Some(json!({ "error": "forbidden" })),
        };
        assert_eq!(
            classify_api_failure(failure),
            ApiError::Http {
                status: 403,
                body: Some(json!({ "error": "forbidden" }))
            }
        );
    }

    #[test]
    fn non_http_failures() {
        assert_eq!(
            classify_api_failure(ApiFailure::Transport("timeout".into())),
            ApiError::Transport("timeout".into())
        );
        assert!(matches!(
            classify_api_failure(ApiFailure::Other("boom".into())),
            ApiError::Unexpected(_)
        ));
    }

    #[test]
    fn otp_failures() {
        let response = |status: u16, body: Option<Value>| ApiFailure::Response {
            status,
            authorization: None,
            body,
        };
        assert_eq!(
            classify_otp_failure(&response(429, None)),
            AuthenticationError::TooMany
        );
        assert_eq!(
            classify_otp_failure(&response(
                400,
                Some(json!({ "error_message": "user demo@example.com does not exist" }))
            )),
            AuthenticationError::NotExists
        );
        assert_eq!(
            classify_otp_failure(&response(400, Some(json!({ "error_message": "does not exist" })))),
            AuthenticationError::General
        );
        assert_eq!(
            classify_otp_failure(&response(400, Some(json!({ "message": "x does not exist" })))),
            AuthenticationError::General
        );
        assert_eq!(
            classify_otp_failure(&response(500, None)),
            AuthenticationError::General
        );
        assert_eq!(
            classify_otp_failure(&ApiFailure::Transport("dns".into())),
            AuthenticationError::General
        );
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("bearer abc"), None);
    }
}
