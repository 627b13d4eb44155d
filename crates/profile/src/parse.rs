//! Narrowing of profile service responses into [`crate::model`] types.
//!
//! Required keys are checked up front with [`expect_keys`]; field failures are
//! tagged with the key they occurred on. Optional sections degrade to `None`
//! when absent, except for collections, which must be arrays when present.

use serde_json::{Map, Value};

use accountkit_core::validate::{
    expect_keys, has_keys, is_truthy, lenient_enum, strict_enum, validate_array, validate_boolean,
    validate_number, validate_numeric, validate_optional_string, validate_string,
};
use accountkit_core::{ValidationError, ValidationResult};

use crate::model::{
    DeleteProfile, IdentityType, Measurement, Profile, ProfileEmail, ProfileHealth,
    ProfileIdentity, ProfileName, ProfilePreference, ProfileTag,
};

const PROFILE_KEYS: &[&str] = &["profileId", "owner", "name"];

/// Parse the profile list response.
///
/// A falsy body (`null`, `""`, `false`, `0`) is an empty list. Otherwise every
/// element must parse; the first failure rejects the whole list.
pub fn parse_profiles(body: &Value) -> ValidationResult<Vec<Profile>> {
    if !is_truthy(body) {
        return Ok(Vec::new());
    }
    let mut index = 0;
    validate_array(body, |item| {
        let parsed = parse_profile(item).map_err(|source| ValidationError::Profiles {
            index: Some(index),
            source: Box::new(source),
        });
        index += 1;
        parsed
    })
    .map_err(|err| {
        let err = match err {
            err @ ValidationError::Profiles { .. } => err,
            other => ValidationError::Profiles {
                index: None,
                source: Box::new(other),
            },
        };
        tracing::warn!(error = %err, "invalid profile list");
        err
    })
}

pub fn parse_profile(value: &Value) -> ValidationResult<Profile> {
    let obj = expect_keys(value, PROFILE_KEYS)?;
    Ok(Profile {
        profile_id: required(obj, "profileId", validate_string)?.into(),
        owner: required(obj, "owner", validate_string)?.into(),
        root: parse_root(obj)?,
        name: required(obj, "name", parse_profile_name)?,
        health: obj
            .get("health")
            .filter(|v| is_health(v))
            .map(parse_profile_health)
            .transpose()
            .map_err(|e| e.at("health"))?,
        email: optional_list(obj, "email", parse_profile_email)?,
        tag: optional_list(obj, "tag", parse_profile_tag)?,
        preference: obj
            .get("preference")
            .filter(|v| is_preference(v))
            .map(parse_profile_preference)
            .transpose()
            .map_err(|e| e.at("preference"))?,
        identity: obj
            .get("identity")
            .map(parse_identities)
            .transpose()
            .map_err(|e| e.at("identity"))?,
        address: optional_list(obj, "address", |v| Ok(v.clone()))?,
        phone: optional_list(obj, "phone", |v| Ok(v.clone()))?,
    })
}

/// The create-profile response: identifying fields only.
pub fn parse_create_profile(value: &Value) -> ValidationResult<Profile> {
    let obj = expect_keys(value, PROFILE_KEYS)?;
    let mut profile = Profile::new(
        required(obj, "profileId", validate_string)?.into(),
        required(obj, "owner", validate_string)?.into(),
        required(obj, "name", parse_profile_name)?,
    );
    profile.root = parse_root(obj)?;
    Ok(profile)
}

pub fn parse_profile_name(value: &Value) -> ValidationResult<ProfileName> {
    let obj = expect_keys(value, &["nameId"])?;
    Ok(ProfileName {
        name_id: required(obj, "nameId", validate_string)?,
        first_name: optional_string(obj, "firstName"),
        last_name: optional_string(obj, "lastName"),
        nick_name: optional_string(obj, "nickName"),
    })
}

pub fn parse_profile_health(value: &Value) -> ValidationResult<ProfileHealth> {
    let obj = expect_keys(value, &["healthId", "dob", "gender", "ethnicity"])?;
    let weight = match obj.get("weight").filter(|v| is_truthy(v)) {
        Some(weight) => Some(Measurement::new(
            validate_numeric(weight).map_err(|e| e.at("weight"))?,
            required(obj, "weightUnit", strict_enum)?,
        )),
        None => None,
    };
    let height = match obj.get("height").filter(|v| is_truthy(v)) {
        Some(height) => Some(Measurement::new(
            validate_number(height).map_err(|e| e.at("height"))?,
            required(obj, "heightUnit", strict_enum)?,
        )),
        None => None,
    };
    Ok(ProfileHealth {
        health_id: required(obj, "healthId", validate_string)?,
        dob: required(obj, "dob", validate_string)?,
        gender: required(obj, "gender", strict_enum)?,
        ethnicity: obj.get("ethnicity").and_then(lenient_enum),
        weight,
        height,
    })
}

pub fn parse_profile_email(value: &Value) -> ValidationResult<ProfileEmail> {
    let obj = expect_keys(value, &["primary", "name", "email"])?;
    Ok(ProfileEmail {
        email_id: optional_string(obj, "emailId"),
        datetime: optional_string(obj, "datetime"),
        primary: required(obj, "primary", validate_boolean)?,
        name: required(obj, "name", validate_string)?,
        email: required(obj, "email", validate_string)?,
    })
}

pub fn parse_profile_preference(value: &Value) -> ValidationResult<ProfilePreference> {
    let obj = expect_keys(value, &["language"])?;
    let location = match obj.get("location").filter(|v| is_truthy(v)) {
        Some(location) => Some(validate_string(location).map_err(|e| e.at("location"))?),
        None => None,
    };
    Ok(ProfilePreference {
        preference_id: optional_string(obj, "preferenceId"),
        language: required(obj, "language", validate_string)?,
        location,
    })
}

pub fn parse_profile_tag(value: &Value) -> ValidationResult<ProfileTag> {
    let obj = expect_keys(value, &["tagId", "tag", "active", "modified"])?;
    Ok(ProfileTag {
        tag_id: required(obj, "tagId", validate_string)?.into(),
        tag: required(obj, "tag", validate_string)?,
        active: required(obj, "active", validate_boolean)?,
        modified: required(obj, "modified", validate_string)?,
    })
}

pub fn parse_profile_identity(value: &Value) -> ValidationResult<ProfileIdentity> {
    let obj = expect_keys(value, &["identityId", "identityType", "identityValue"])?;
    Ok(ProfileIdentity {
        identity_id: required(obj, "identityId", validate_string)?.into(),
        identity_type: required(obj, "identityType", strict_enum)?,
        identity_value: required(obj, "identityValue", validate_string)?,
    })
}

pub fn parse_delete_profile(value: &Value) -> ValidationResult<DeleteProfile> {
    let obj = expect_keys(value, &["active"])?;
    Ok(DeleteProfile {
        profile_id: optional_string(obj, "profileId").map(Into::into),
        active: required(obj, "active", validate_boolean)?,
    })
}

/// A health record, as opposed to an empty placeholder object.
pub fn is_health(value: &Value) -> bool {
    has_keys(value, &["healthId"])
}

/// A preference record, as opposed to an empty placeholder object.
pub fn is_preference(value: &Value) -> bool {
    has_keys(value, &["preferenceId"])
}

/// Identity documents of a known type; entries of other types are skipped.
fn parse_identities(value: &Value) -> ValidationResult<Vec<ProfileIdentity>> {
    let items = validate_array(value, |item| Ok(item.clone()))?;
    items
        .iter()
        .filter(|item| {
            item.get("identityType")
                .and_then(lenient_enum::<IdentityType>)
                .is_some()
        })
        .map(parse_profile_identity)
        .collect()
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a Value {
    obj.get(key).unwrap_or(&Value::Null)
}

fn required<T>(
    obj: &Map<String, Value>,
    key: &'static str,
    validator: impl FnOnce(&Value) -> ValidationResult<T>,
) -> ValidationResult<T> {
    validator(field(obj, key)).map_err(|e| e.at(key))
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(validate_optional_string)
}

fn optional_list<T>(
    obj: &Map<String, Value>,
    key: &'static str,
    validator: impl FnMut(&Value) -> ValidationResult<T>,
) -> ValidationResult<Option<Vec<T>>> {
    obj.get(key)
        .map(|v| validate_array(v, validator))
        .transpose()
        .map_err(|e| e.at(key))
}

fn parse_root(obj: &Map<String, Value>) -> ValidationResult<bool> {
    match obj.get("root") {
        Some(root) if is_truthy(root) => validate_boolean(root).map_err(|e| e.at("root")),
        _ => Ok(false),
    }
}
