//! Error taxonomy surfaced to the host application.

use serde_json::Value;
use thiserror::Error;

use accountkit_core::ValidationError;

/// Failure to sign in or register.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("too many attempts")]
    TooMany,

    #[error("account does not exist")]
    NotExists,

    #[error("account already exists")]
    AlreadyExists,

    #[error("authentication failed")]
    General,
}

impl AuthenticationError {
    /// Stable code for UI translation tables.
    pub fn code(&self) -> &'static str {
        match self {
            AuthenticationError::TooMany => "ERR_AUTH_TOO_MANY",
            AuthenticationError::NotExists => "ERR_AUTH_NOT_EXISTS",
            AuthenticationError::AlreadyExists => "ERR_AUTH_ALREADY_EXISTS",
            AuthenticationError::General => "ERR_AUTH_GENERAL",
        }
    }
}

/// The session is no longer allowed to call the services.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("session expired")]
    Expired,

    #[error("unauthorized")]
    Unauthorized,
}

impl AuthorizationError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthorizationError::Expired => "ERR_EXPIRED",
            AuthorizationError::Unauthorized => "ERR_UNAUTHORIZED",
        }
    }
}

/// Account activation could not proceed (e.g. the OTP token carries no roles).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("activation failed: {0}")]
pub struct ActivationError(pub String);

/// A failure that is not an HTTP error response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unexpected error: {0}")]
pub struct UnexpectedError(pub String);

/// Every failure the session and profile layers report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Unexpected(#[from] UnexpectedError),

    /// A call needing a session was attempted without a token.
    #[error("not authorized")]
    NotAuthorized,

    /// The token decodes but carries no `uid`.
    #[error("missing user id")]
    MissingUserId,

    /// An error response passed through unchanged.
    #[error("request failed with status {status}")]
    Http { status: u16, body: Option<Value> },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but did not have the expected shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// Whether the host should drop the session and ask the user to sign in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Authorization(AuthorizationError::Expired))
    }
}
