//! Strongly-typed identifiers issued by the backend services.
//!
//! The services hand out opaque string identifiers. They are wrapped so a
//! profile id cannot be passed where a customer id is expected.

use serde::{Deserialize, Serialize};

/// Identifier of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

/// Identifier of a customer account (the owner of a set of profiles).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of an authentication user (`uid` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of a tag attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

/// Identifier of an identity document attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(ProfileId);
impl_string_newtype!(CustomerId);
impl_string_newtype!(UserId);
impl_string_newtype!(TagId);
impl_string_newtype!(IdentityId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_transparently() {
        let id = ProfileId::new("7f1c");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7f1c\"");
        let back: ProfileId = serde_json::from_str("\"7f1c\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_the_raw_identifier() {
        assert_eq!(CustomerId::from("c-1").to_string(), "c-1");
        assert_eq!(String::from(UserId::new("u-1")), "u-1");
    }
}
