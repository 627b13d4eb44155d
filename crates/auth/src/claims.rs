use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use accountkit_core::{CustomerId, UserId};

use crate::Role;

/// Claims carried in the payload of a session token.
///
/// Decoded for display and routing only; the signature is never checked, so
/// nothing here may be used as proof of identity.
///
/// Built with [`TokenClaims::from_object`], which reads each claim on its
/// own: a claim of an unexpected shape is dropped without failing the rest.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Authentication user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,

    /// Customer-context statements attached by the customer service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ccs: Option<Vec<Ccs>>,
}

/// One customer-context statement, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Ccs {
    Metadata {
        #[serde(rename = "customerId", default)]
        customer_id: Option<CustomerId>,
    },
    Identity {
        #[serde(default)]
        countrycode: Option<String>,
        #[serde(rename = "loginType", default)]
        login_type: Option<LoginType>,
        #[serde(default)]
        username: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// How an identity statement was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Basic,
    Mobile,
    WeChat,
    Email,
    #[serde(other)]
    Unknown,
}

impl TokenClaims {
    /// Read the known claims out of a decoded payload object.
    ///
    /// * numeric dates must be numbers, `sub` and `uid` strings
    /// * `roles` keeps its string members only
    /// * `ccs` keeps the statements that parse, skipping untagged or
    ///   malformed ones
    pub fn from_object(payload: &Map<String, Value>) -> Self {
        let number = |key: &str| payload.get(key).and_then(Value::as_f64);
        let string = |key: &str| payload.get(key).and_then(Value::as_str);

        Self {
            exp: number("exp"),
            iat: number("iat"),
            nbf: number("nbf"),
            sub: string("sub").map(str::to_owned),
            uid: string("uid").map(UserId::new),
            roles: payload.get("roles").and_then(Value::as_array).map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|role| Role::new(role.to_owned()))
                    .collect()
            }),
            ccs: payload.get("ccs").and_then(Value::as_array).map(|statements| {
                statements
                    .iter()
                    .filter_map(|statement| Ccs::deserialize(statement).ok())
                    .collect()
            }),
        }
    }

    /// Expiry instant, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .filter(|s| s.is_finite())
            .and_then(|s| DateTime::from_timestamp_millis((s * 1000.0).round() as i64))
    }

    /// Whether the token is still live at `now`.
    ///
    /// `None` when there is no expiry. Reaching the expiry instant exactly
    /// counts as expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> Option<bool> {
        self.expires_at().map(|exp| now < exp)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.as_ref().is_some_and(|roles| roles.contains(role))
    }

    /// Customer id of a registered customer.
    ///
    /// Only customer users carry one: it is read from the first `metadata`
    /// statement in `ccs`.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        if !self.has_role(&Role::CUSTOMER_USER) {
            return None;
        }
        self.ccs
            .as_ref()?
            .iter()
            .find_map(|ccs| match ccs {
                Ccs::Metadata { customer_id } => Some(customer_id.as_ref()),
                _ => None,
            })
            .flatten()
    }
}
