//! `accountkit-profile`: customer profiles.
//!
//! Parsing of profile service responses, root/standard selection, request
//! builders for every profile endpoint and the client-side selection state.

pub mod model;
pub mod ordering;
pub mod parse;
pub mod request;
pub mod service;
pub mod state;
pub mod update;

pub use model::{
    Address, DeleteProfile, Ethnicity, Gender, HeightUnit, Identity, IdentityType, Measurement,
    Phone, Profile, ProfileEmail, ProfileHealth, ProfileIdentity, ProfileName, ProfilePreference,
    ProfileTag, WeightUnit,
};
pub use ordering::{created_at, root_profile, standard_profiles};
pub use parse::{
    is_health, is_preference, parse_create_profile, parse_delete_profile, parse_profile,
    parse_profile_email, parse_profile_health, parse_profile_identity, parse_profile_name,
    parse_profile_preference, parse_profile_tag, parse_profiles,
};
pub use request::NewProfile;
pub use service::ProfileService;
pub use state::{LocaleSync, ProfileState};
pub use update::{HealthChange, HealthDetails, NameChange, PreferenceChange, ProfileCategory, plan_update};
