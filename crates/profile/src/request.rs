//! Profile service requests (`/profile`).
//!
//! Entries that the service keys by name (emails, addresses, phones) are sent
//! with a fresh UUIDv7 as their name.

use serde_json::{Map, Value, json};
use uuid::Uuid;

use accountkit_core::{ApiRequest, IdentityId, Method, ProfileId, TagId, ValidationResult};

use crate::model::{Address, Identity, Phone, ProfileIdentity};
use crate::update::{HealthChange, HealthDetails};

const PROFILES: &str = "/profile/v1.0/profile";
const PROFILE: &str = "/profile/v1.0/profile/:profileid";

/// Input for a new standard profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Preferred language of the new profile.
    pub locale: String,
    pub health: HealthChange,
}

fn entry_name() -> String {
    Uuid::now_v7().to_string()
}

fn on_profile(method: Method, suffix: &str, profile_id: &ProfileId, token: &str) -> ApiRequest {
    ApiRequest::new(method, format!("{PROFILE}{suffix}"))
        .param("profileid", profile_id)
        .bearer(token)
}

pub fn get_profiles(token: &str) -> ApiRequest {
    ApiRequest::new(Method::Get, PROFILES).bearer(token)
}

/// Create a profile, asking the service to echo its health, email and preference.
pub fn create_profile(profile: &NewProfile, token: &str) -> ApiRequest {
    let mut body = Map::new();
    body.insert(
        "name".into(),
        json!({ "firstName": profile.first_name, "lastName": profile.last_name }),
    );
    if let Some(email) = &profile.email {
        body.insert(
            "email".into(),
            json!({ "name": entry_name(), "primary": true, "detail": { "email": email } }),
        );
    }
    body.insert("health".into(), health_body(&profile.health));
    body.insert("preference".into(), json!({ "language": profile.locale }));

    ApiRequest::new(Method::Post, PROFILES)
        .query("health", true)
        .query("email", true)
        .query("preference", true)
        .json(json!({ "profile": body }))
        .bearer(token)
}

pub fn update_preference(
    profile_id: &ProfileId,
    language: &str,
    location: Option<&str>,
    token: &str,
) -> ApiRequest {
    let mut preference = json!({ "language": language });
    if let Some(location) = location {
        preference["location"] = json!(location);
    }
    on_profile(Method::Put, "/preference", profile_id, token)
        .json(json!({ "preference": preference }))
}

pub fn update_name(profile_id: &ProfileId, first_name: &str, last_name: &str, token: &str) -> ApiRequest {
    on_profile(Method::Put, "/name", profile_id, token).json(json!({
        "name": { "firstName": first_name, "lastName": last_name },
    }))
}

pub fn update_health(profile_id: &ProfileId, health: &HealthDetails, token: &str) -> ApiRequest {
    on_profile(Method::Put, "/health", profile_id, token).json(json!({
        "health": {
            "weight": { "unit": health.weight.unit.to_string(), "value": one_decimal(health.weight.value) },
            "height": { "value": health.height.value, "unit": health.height.unit.to_string() },
            "gender": health.gender.to_string(),
            "dob": health.dob,
            "ethnicity": health.ethnicity.to_string(),
        },
    }))
}

/// Attach a phone number, replacing the primary one.
pub fn update_phone(profile_id: &ProfileId, phone: &Phone, token: &str) -> ApiRequest {
    on_profile(Method::Patch, "", profile_id, token)
        .query("phone", true)
        .json(json!({
            "profile": {
                "phone": { "name": entry_name(), "primary": true, "detail": phone },
            },
        }))
}

pub fn create_address(profile_id: &ProfileId, address: &Address, token: &str) -> ApiRequest {
    on_profile(Method::Post, "/address", profile_id, token).json(json!({
        "address": { "name": entry_name(), "primary": true, "detail": address },
    }))
}

pub fn delete_profile(profile_id: &ProfileId, token: &str) -> ApiRequest {
    on_profile(Method::Delete, "", profile_id, token)
}

pub fn create_tag(profile_id: &ProfileId, tag: &str, token: &str) -> ApiRequest {
    on_profile(Method::Post, "/tag", profile_id, token).json(json!({ "tag": { "tag": tag } }))
}

pub fn update_tag(profile_id: &ProfileId, tag: &str, token: &str) -> ApiRequest {
    on_profile(Method::Put, "/tag", profile_id, token).json(json!({ "tag": { "tag": tag } }))
}

pub fn delete_tag(profile_id: &ProfileId, tag_id: &TagId, token: &str) -> ApiRequest {
    on_profile(Method::Delete, "/tag/:tagId", profile_id, token)
        .param("tagId", tag_id)
        .json(json!({}))
}

/// Register a push-notification device token.
pub fn create_device(profile_id: &ProfileId, device_token: &str, token: &str) -> ApiRequest {
    on_profile(Method::Post, "/device", profile_id, token)
        .json(json!({ "device": { "token": device_token } }))
}

pub fn update_device(profile_id: &ProfileId, device_token: &str, token: &str) -> ApiRequest {
    on_profile(Method::Put, "/device", profile_id, token)
        .json(json!({ "device": { "token": device_token } }))
}

/// Attach an identity document; the number must match its document type.
pub fn create_identity(
    profile_id: &ProfileId,
    identity: &Identity,
    token: &str,
) -> ValidationResult<ApiRequest> {
    identity.validate()?;
    Ok(on_profile(Method::Post, "/identity", profile_id, token).json(json!({
        "identity": {
            "identityType": identity.identity_type.to_string(),
            "identityValue": identity.identity_value,
        },
    })))
}

pub fn update_identity(
    profile_id: &ProfileId,
    identity: &ProfileIdentity,
    token: &str,
) -> ValidationResult<ApiRequest> {
    Identity::from(identity).validate()?;
    Ok(on_profile(Method::Patch, "/identity/:identityId", profile_id, token)
        .param("identityId", &identity.identity_id)
        .json(json!({
            "identityType": identity.identity_type.to_string(),
            "identityValue": identity.identity_value,
        })))
}

pub fn delete_identity(profile_id: &ProfileId, identity_id: &IdentityId, token: &str) -> ApiRequest {
    on_profile(Method::Delete, "/identity/:identityId", profile_id, token)
        .param("identityId", identity_id)
}

/// Weights travel as strings with one decimal place.
fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

fn health_body(health: &HealthChange) -> Value {
    let mut body = Map::new();
    if let Some(gender) = health.gender {
        body.insert("gender".into(), json!(gender.to_string()));
    }
    if let Some(dob) = &health.dob {
        body.insert("dob".into(), json!(dob));
    }
    if let Some(ethnicity) = health.ethnicity {
        body.insert("ethnicity".into(), json!(ethnicity.to_string()));
    }
    if let Some(height) = &health.height {
        body.insert(
            "height".into(),
            json!({ "value": height.value, "unit": height.unit.to_string() }),
        );
    }
    if let Some(weight) = &health.weight {
        body.insert(
            "weight".into(),
            json!({ "value": one_decimal(weight.value), "unit": weight.unit.to_string() }),
        );
    }
    Value::Object(body)
}
