//! Partial profile updates.
//!
//! A [`ProfileCategory`] may touch several sections at once. Each section is
//! sent as its own request, and only when the change is complete enough for
//! the service to accept it.

use accountkit_core::{ApiRequest, ProfileId};

use crate::model::{Ethnicity, Gender, HeightUnit, Measurement, Phone, WeightUnit};
use crate::request;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameChange {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceChange {
    pub language: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthChange {
    pub gender: Option<Gender>,
    pub dob: Option<String>,
    pub ethnicity: Option<Ethnicity>,
    pub height: Option<Measurement<HeightUnit>>,
    pub weight: Option<Measurement<WeightUnit>>,
}

/// A health record with every field the update endpoint requires.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthDetails {
    pub gender: Gender,
    pub dob: String,
    pub ethnicity: Ethnicity,
    pub height: Measurement<HeightUnit>,
    pub weight: Measurement<WeightUnit>,
}

impl HealthChange {
    /// The full record, if every field is set.
    pub fn complete(&self) -> Option<HealthDetails> {
        Some(HealthDetails {
            gender: self.gender?,
            dob: self.dob.clone().filter(|d| !d.is_empty())?,
            ethnicity: self.ethnicity?,
            height: self.height?,
            weight: self.weight?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileCategory {
    pub preference: Option<PreferenceChange>,
    pub name: Option<NameChange>,
    pub health: Option<HealthChange>,
    pub phone: Option<Phone>,
}

/// Requests for every section of `category` that is ready to send, in
/// preference, name, health, phone order.
///
/// * preference needs a language
/// * name needs both first and last name
/// * health needs every field (see [`HealthChange::complete`])
/// * phone is sent whenever present
pub fn plan_update(profile_id: &ProfileId, category: &ProfileCategory, token: &str) -> Vec<ApiRequest> {
    let mut requests = Vec::new();

    if let Some(preference) = &category.preference {
        if let Some(language) = non_empty(&preference.language) {
            requests.push(request::update_preference(
                profile_id,
                language,
                non_empty(&preference.location),
                token,
            ));
        }
    }

    if let Some(name) = &category.name {
        if let (Some(first), Some(last)) = (non_empty(&name.first_name), non_empty(&name.last_name)) {
            requests.push(request::update_name(profile_id, first, last, token));
        }
    }

    if let Some(health) = category.health.as_ref().and_then(HealthChange::complete) {
        requests.push(request::update_health(profile_id, &health, token));
    }

    if let Some(phone) = &category.phone {
        requests.push(request::update_phone(profile_id, phone, token));
    }

    if requests.is_empty() {
        tracing::debug!(profile_id = %profile_id, "profile update has nothing to send");
    }
    requests
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
