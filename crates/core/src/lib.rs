//! `accountkit-core`: validation and request building blocks.
//!
//! This crate contains **pure** primitives (no IO): narrowing of untyped JSON,
//! typed identifiers, and transport-agnostic request descriptors.

pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod patterns;
pub mod request;
pub mod transport;
pub mod validate;

pub use config::ClientConfig;
pub use entity::{Entity, find_by_id};
pub use error::{ValidationError, ValidationResult};
pub use id::{CustomerId, IdentityId, ProfileId, TagId, UserId};
pub use request::{ApiRequest, Method, replace_uri_params};
pub use transport::{ApiFailure, ScriptedTransport, Transport};
pub use validate::WireEnum;
