//! `accountkit-auth`: session tokens and the authentication/customer services.
//!
//! This crate is decoupled from HTTP: it inspects tokens, classifies failures
//! and describes requests. [`AuthService`] runs the sign-in flows over a
//! transport supplied by the host.

pub mod authentication;
pub mod claims;
pub mod customer;
pub mod error;
pub mod handler;
pub mod roles;
pub mod service;
pub mod session;
pub mod token;

pub use claims::{Ccs, LoginType, TokenClaims};
pub use error::{ActivationError, ApiError, AuthenticationError, AuthorizationError, UnexpectedError};
pub use handler::{bearer_token, classify_api_failure, classify_otp_failure};
pub use roles::Role;
pub use service::AuthService;
pub use session::{Session, check_registration_token};
pub use token::{TokenDecodeError, decode_claims, get_customer_id, get_roles, get_user_id, is_active, is_active_at};
