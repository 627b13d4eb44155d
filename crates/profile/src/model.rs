use serde::{Deserialize, Serialize};
use serde_json::Value;

use accountkit_core::{
    CustomerId, Entity, IdentityId, ProfileId, TagId, ValidationError, ValidationResult, patterns,
    wire_enum,
};

/// A customer profile as returned by the profile service.
///
/// Exactly one profile per customer carries `root = true`; the others are
/// "standard" profiles the customer manages (family members and the like).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: ProfileId,
    pub owner: CustomerId,
    #[serde(default)]
    pub root: bool,
    pub name: ProfileName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<ProfileHealth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<ProfileEmail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<ProfileTag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<ProfilePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Vec<ProfileIdentity>>,
    /// Address entries, passed through unchecked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Value>>,
    /// Phone entries, passed through unchecked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Vec<Value>>,
}

impl Profile {
    /// A profile with only its identifying fields set.
    pub fn new(profile_id: ProfileId, owner: CustomerId, name: ProfileName) -> Self {
        Self {
            profile_id,
            owner,
            root: false,
            name,
            health: None,
            email: None,
            tag: None,
            preference: None,
            identity: None,
            address: None,
            phone: None,
        }
    }

    /// Preferred language, if the profile has a preference record.
    pub fn language(&self) -> Option<&str> {
        self.preference.as_ref().map(|p| p.language.as_str())
    }
}

impl Entity for Profile {
    type Id = ProfileId;

    fn id(&self) -> &ProfileId {
        &self.profile_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileName {
    pub name_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nick_name: Option<String>,
}

impl ProfileName {
    pub fn new(name_id: impl Into<String>) -> Self {
        Self {
            name_id: name_id.into(),
            first_name: None,
            last_name: None,
            nick_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHealth {
    pub health_id: String,
    pub dob: String,
    pub gender: Gender,
    /// Unknown ethnicities from the service are dropped rather than rejected.
    pub ethnicity: Option<Ethnicity>,
    pub weight: Option<Measurement<WeightUnit>>,
    pub height: Option<Measurement<HeightUnit>>,
}

/// A value with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement<U> {
    pub value: f64,
    pub unit: U,
}

impl<U> Measurement<U> {
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

wire_enum!(Gender { Male => "male", Female => "female" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ethnicity {
    EastAsian,
    SouthAsian,
    MiddleEastern,
    PacificIslander,
    NativeAmerican,
    African,
    Caucasian,
    SouthEastAsian,
    Hispanic,
    EastAsianSouthEastAsian,
    Other,
}

wire_enum!(Ethnicity {
    EastAsian => "eastasian",
    SouthAsian => "southasian",
    MiddleEastern => "middleeastern",
    PacificIslander => "pacificislander",
    NativeAmerican => "nativeamerican",
    African => "african",
    Caucasian => "caucasian",
    SouthEastAsian => "southeastasian",
    Hispanic => "hispanic",
    EastAsianSouthEastAsian => "eastasiansoutheastasian",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "lb")]
    Lb,
    #[serde(rename = "")]
    Unspecified,
}

wire_enum!(WeightUnit { Kg => "kg", Lb => "lb", Unspecified => "" });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeightUnit {
    #[serde(rename = "cm")]
    Cm,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "")]
    Unspecified,
}

wire_enum!(HeightUnit { Cm => "cm", In => "in", Unspecified => "" });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEmail {
    pub email_id: Option<String>,
    pub datetime: Option<String>,
    pub primary: bool,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePreference {
    pub preference_id: Option<String>,
    pub language: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTag {
    pub tag_id: TagId,
    pub tag: String,
    pub active: bool,
    pub modified: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    Hkid,
    Passport,
    TravelDocument,
}

wire_enum!(IdentityType {
    Hkid => "hkid",
    Passport => "passport",
    TravelDocument => "traveldocument",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIdentity {
    pub identity_id: IdentityId,
    pub identity_type: IdentityType,
    pub identity_value: String,
}

/// An identity document to attach to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub identity_type: IdentityType,
    pub identity_value: String,
}

impl Identity {
    pub fn new(identity_type: IdentityType, identity_value: impl Into<String>) -> Self {
        Self {
            identity_type,
            identity_value: identity_value.into(),
        }
    }

    /// Check the document number against the pattern for its type.
    pub fn validate(&self) -> ValidationResult<()> {
        let valid = match self.identity_type {
            IdentityType::Hkid => patterns::is_valid_hkid(&self.identity_value),
            IdentityType::Passport | IdentityType::TravelDocument => {
                patterns::is_valid_travel_document(&self.identity_value)
            }
        };
        if valid {
            Ok(())
        } else {
            Err(ValidationError::Format {
                field: "identityValue",
            })
        }
    }
}

impl From<&ProfileIdentity> for Identity {
    fn from(identity: &ProfileIdentity) -> Self {
        Self::new(identity.identity_type, identity.identity_value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
}

impl Address {
    /// Every free-text line is a deliverable street address.
    pub fn is_deliverable(&self) -> bool {
        [Some(&self.address_line1), self.address_line2.as_ref()]
            .into_iter()
            .flatten()
            .chain([&self.city])
            .all(|line| patterns::is_valid_address(line))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub number: String,
    pub country_code: String,
}

/// Acknowledgement of a profile deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProfile {
    pub profile_id: Option<ProfileId>,
    pub active: bool,
}
