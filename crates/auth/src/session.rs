//! Session state held by the host application.

use accountkit_core::{CustomerId, UserId};

use crate::error::{ActivationError, ApiError, AuthenticationError};
use crate::{Role, token};

/// The signed-in (or anonymous) session.
///
/// Holds the bearer token and answers questions about it. Every answer comes
/// from the unverified claims, so it is suitable for UI decisions only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The bearer token, or [`ApiError::NotAuthorized`] for an anonymous session.
    pub fn require_token(&self) -> Result<&str, ApiError> {
        self.token().ok_or(ApiError::NotAuthorized)
    }

    /// Replace the token after a login, OTP verification or registration.
    pub fn sign_in(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn user_id(&self) -> Option<UserId> {
        token::get_user_id(self.token()?)
    }

    /// User id of a signed-in session, for calls addressed to the user resource.
    pub fn require_user_id(&self) -> Result<UserId, ApiError> {
        token::get_user_id(self.require_token()?).ok_or(ApiError::MissingUserId)
    }

    pub fn roles(&self) -> Option<Vec<Role>> {
        token::get_roles(self.token()?)
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        token::get_customer_id(self.token()?)
    }

    /// See [`token::is_active`]; `None` for an anonymous session.
    pub fn is_active(&self) -> Option<bool> {
        token::is_active(self.token()?)
    }
}

/// Check that an OTP token may be used to register a new account.
///
/// The token must carry roles, and must not already belong to a customer.
pub fn check_registration_token(token: &str) -> Result<(), ApiError> {
    match token::get_roles(token) {
        None => Err(ActivationError("cannot create account: invalid OTP token".to_string()).into()),
        Some(roles) if roles.contains(&Role::CUSTOMER_USER) => {
            Err(AuthenticationError::AlreadyExists.into())
        }
        Some(_) => Ok(()),
    }
}
