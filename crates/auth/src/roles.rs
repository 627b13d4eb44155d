use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role granted to the bearer of a session token (`roles` claim).
///
/// Roles are opaque strings issued by the authentication service; only the
/// few the client branches on are named here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// A registered customer account.
    pub const CUSTOMER_USER: Role = Role(Cow::Borrowed("customer_user"));

    /// A one-time-password holder that has not registered yet.
    pub const OTP_VERIFIED: Role = Role(Cow::Borrowed("otp_verified"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
