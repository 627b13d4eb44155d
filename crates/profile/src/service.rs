//! Profile operations over a host-provided [`Transport`].
//!
//! Every mutation is followed by a refresh so that [`ProfileState`] always
//! reflects what the service holds.

use serde_json::Value;

use accountkit_auth::{ApiError, Session, classify_api_failure};
use accountkit_core::{ApiRequest, ClientConfig, IdentityId, ProfileId, TagId, Transport};

use crate::model::{Address, DeleteProfile, Identity, Profile, ProfileIdentity};
use crate::parse::{parse_create_profile, parse_delete_profile, parse_profiles};
use crate::request::{self, NewProfile};
use crate::state::ProfileState;
use crate::update::{ProfileCategory, plan_update};

#[derive(Debug)]
pub struct ProfileService<T> {
    transport: T,
    config: ClientConfig,
    state: ProfileState,
}

impl<T: Transport> ProfileService<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            state: ProfileState::new(),
        }
    }

    /// Start from a previously persisted state (e.g. a remembered selection).
    pub fn with_state(mut self, state: ProfileState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Initial load. The state is ready afterwards even if the load failed or
    /// there is no session.
    pub async fn init(&mut self, session: &Session) {
        if session.is_authenticated() {
            if let Err(err) = self.refresh(session).await {
                tracing::warn!(error = %err, "initial profile load failed");
            }
        }
        self.state.mark_ready();
    }

    pub async fn refresh(&mut self, session: &Session) -> Result<(), ApiError> {
        let token = session.require_token()?;
        let body = self.call(request::get_profiles(token)).await?;
        let profiles = parse_profiles(&body)?;
        self.state.apply_refresh(&profiles);
        Ok(())
    }

    /// Create a standard profile and select it.
    ///
    /// An empty `locale` falls back to the configured one.
    pub async fn create_profile(
        &mut self,
        session: &Session,
        profile: &NewProfile,
    ) -> Result<Profile, ApiError> {
        let token = session.require_token()?;
        let request = if profile.locale.is_empty() {
            let mut profile = profile.clone();
            profile.locale.clone_from(&self.config.locale);
            request::create_profile(&profile, token)
        } else {
            request::create_profile(profile, token)
        };
        let created = parse_create_profile(&self.call(request).await?)?;
        tracing::info!(profile_id = %created.profile_id, "profile created");

        self.refresh(session).await?;
        self.state.set_current(Some(created.clone()));
        Ok(self.state.current_profile().cloned().unwrap_or(created))
    }

    /// Send every ready section of `category`, optionally refreshing afterwards.
    pub async fn update_profile(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
        category: &ProfileCategory,
        refresh: bool,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        for request in plan_update(profile_id, category, token) {
            self.call(request).await?;
        }
        if refresh {
            self.refresh(session).await?;
        }
        Ok(())
    }

    pub async fn delete_profile(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
    ) -> Result<DeleteProfile, ApiError> {
        let token = session.require_token()?;
        let deleted = parse_delete_profile(&self.call(request::delete_profile(profile_id, token)).await?)?;
        tracing::info!(profile_id = %profile_id, "profile deleted");
        self.refresh(session).await?;
        Ok(deleted)
    }

    pub async fn create_tag(&mut self, session: &Session, profile_id: &ProfileId, tag: &str) -> Result<(), ApiError> {
        let token = session.require_token()?;
        self.mutate(session, request::create_tag(profile_id, tag, token)).await
    }

    pub async fn update_tag(&mut self, session: &Session, profile_id: &ProfileId, tag: &str) -> Result<(), ApiError> {
        let token = session.require_token()?;
        self.mutate(session, request::update_tag(profile_id, tag, token)).await
    }

    pub async fn delete_tag(&mut self, session: &Session, profile_id: &ProfileId, tag_id: &TagId) -> Result<(), ApiError> {
        let token = session.require_token()?;
        self.mutate(session, request::delete_tag(profile_id, tag_id, token)).await
    }

    pub async fn create_identity(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
        identity: &Identity,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        let request = request::create_identity(profile_id, identity, token)?;
        self.mutate(session, request).await
    }

    pub async fn update_identity(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
        identity: &ProfileIdentity,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        let request = request::update_identity(profile_id, identity, token)?;
        self.mutate(session, request).await
    }

    pub async fn delete_identity(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
        identity_id: &IdentityId,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        self.mutate(session, request::delete_identity(profile_id, identity_id, token)).await
    }

    pub async fn create_address(
        &mut self,
        session: &Session,
        profile_id: &ProfileId,
        address: &Address,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        self.mutate(session, request::create_address(profile_id, address, token)).await
    }

    /// Register (or, with `replace`, update) a push-notification token.
    pub async fn register_device(
        &self,
        session: &Session,
        profile_id: &ProfileId,
        device_token: &str,
        replace: bool,
    ) -> Result<(), ApiError> {
        let token = session.require_token()?;
        let request = if replace {
            request::update_device(profile_id, device_token, token)
        } else {
            request::create_device(profile_id, device_token, token)
        };
        self.call(request).await?;
        Ok(())
    }

    /// Align newly selected root/current profiles with the configured locale.
    ///
    /// Failed updates are logged and skipped; the list is refreshed once if
    /// anything was sent.
    pub async fn sync_locale(&mut self, session: &Session) -> Result<(), ApiError> {
        let updates = self.state.locale_sync(&self.config.locale);
        if updates.is_empty() {
            return Ok(());
        }
        let token = session.require_token()?;
        for update in &updates {
            let category = ProfileCategory {
                preference: Some(update.preference.clone()),
                ..ProfileCategory::default()
            };
            for request in plan_update(&update.profile_id, &category, token) {
                if let Err(err) = self.call(request).await {
                    tracing::warn!(profile_id = %update.profile_id, error = %err, "locale sync failed");
                }
            }
        }
        self.refresh(session).await
    }

    pub fn set_current(&mut self, profile: Option<Profile>) {
        self.state.set_current(profile);
    }

    /// Drop every profile, e.g. after the session ends.
    pub fn logout(&mut self) {
        self.state.clear();
    }

    async fn mutate(&mut self, session: &Session, request: ApiRequest) -> Result<(), ApiError> {
        self.call(request).await?;
        self.refresh(session).await
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "api request");
        self.transport.execute(request).await.map_err(|failure| {
            let err = classify_api_failure(failure);
            tracing::warn!(error = %err, "api request failed");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdentityType;
    use crate::update::PreferenceChange;
    use accountkit_core::{Method, ScriptedTransport, ValidationError};
    use serde_json::json;

    fn session() -> Session {
        Session::new(Some("tok".to_string()))
    }

    fn listed(id: &str, root: bool, datetime: &str, language: &str) -> Value {
        json!({
            "profileId": id,
            "owner": "c1",
            "root": root,
            "name": { "nameId": format!("n-{id}") },
            "email": [{ "primary": true, "name": "primary", "email": "x@y.z", "datetime": datetime }],
            "preference": { "preferenceId": format!("pr-{id}"), "language": language },
        })
    }

    fn family() -> Value {
        json!([
            listed("root", true, "2020-01-01", "en-HK"),
            listed("a", false, "2021-01-01", "en-HK"),
            listed("b", false, "2022-01-01", "en-HK"),
        ])
    }

    fn service(transport: ScriptedTransport) -> ProfileService<ScriptedTransport> {
        ProfileService::new(transport, ClientConfig::default())
    }

    fn methods(service: &ProfileService<ScriptedTransport>) -> Vec<(Method, String)> {
        service
            .transport()
            .requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    #[tokio::test]
    async fn init_without_session_is_ready_and_empty() {
        let mut profiles = service(ScriptedTransport::new());
        profiles.init(&Session::anonymous()).await;
        assert!(profiles.state().is_ready());
        assert_eq!(profiles.state().profiles(), None);
        assert!(profiles.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn failed_init_is_still_ready() {
        let mut profiles = service(ScriptedTransport::new().respond(json!([{ "profileId": "p" }])));
        profiles.init(&session()).await;
        assert!(profiles.state().is_ready());
        assert_eq!(profiles.state().profiles(), None);
    }

    #[tokio::test]
    async fn init_selects_newest_profile() {
        let mut profiles = service(ScriptedTransport::new().respond(family()));
        profiles.init(&session()).await;
        let state = profiles.state();
        assert_eq!(state.root_profile().unwrap().profile_id.as_str(), "root");
        assert_eq!(state.current_profile().unwrap().profile_id.as_str(), "b");
    }

    #[tokio::test]
    async fn created_profile_becomes_current() {
        let mut list = family();
        list.as_array_mut().unwrap().push(listed("c", false, "2019-01-01", "en-HK"));
        let mut profiles = service(
            ScriptedTransport::new()
                .respond(json!({ "profileId": "c", "owner": "c1", "name": { "nameId": "n-c" } }))
                .respond(list),
        );
        let created = profiles
            .create_profile(&session(), &NewProfile { first_name: Some("C".into()), ..NewProfile::default() })
            .await
            .unwrap();

        assert_eq!(created.profile_id.as_str(), "c");
        assert!(created.email.is_some(), "selection is the listed record");
        assert_eq!(profiles.state().current_profile(), Some(&created));

        let sent = profiles.transport().requests();
        assert_eq!(sent[0].body.as_ref().unwrap()["profile"]["preference"]["language"], "en-HK");
        assert_eq!(sent[1].method, Method::Get);
    }

    #[tokio::test]
    async fn mutations_refresh_the_list() {
        let pid = ProfileId::new("a");
        let mut profiles = service(
            ScriptedTransport::new()
                .respond(Value::Null)
                .respond(family())
                .respond(json!({ "active": false }))
                .respond(json!([listed("root", true, "2020-01-01", "en-HK")])),
        );
        profiles.create_tag(&session(), &pid, "vip").await.unwrap();
        let deleted = profiles.delete_profile(&session(), &pid).await.unwrap();
        assert!(!deleted.active);
        assert_eq!(profiles.state().current_profile(), None);

        assert_eq!(
            methods(&profiles),
            [
                (Method::Post, "/profile/v1.0/profile/a/tag".to_string()),
                (Method::Get, "/profile/v1.0/profile".to_string()),
                (Method::Delete, "/profile/v1.0/profile/a".to_string()),
                (Method::Get, "/profile/v1.0/profile".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn update_sends_sections_then_refreshes_on_request() {
        let pid = ProfileId::new("a");
        let category = ProfileCategory {
            preference: Some(PreferenceChange { language: Some("zh-HK".into()), location: None }),
            ..ProfileCategory::default()
        };
        let mut profiles = service(ScriptedTransport::new().respond(Value::Null).respond(Value::Null).respond(family()));
        profiles.update_profile(&session(), &pid, &category, false).await.unwrap();
        profiles.update_profile(&session(), &pid, &category, true).await.unwrap();
        assert_eq!(profiles.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn invalid_identity_is_rejected_locally() {
        let mut profiles = service(ScriptedTransport::new());
        let err = profiles
            .create_identity(&session(), &ProfileId::new("a"), &Identity::new(IdentityType::Hkid, "?"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Validation(ValidationError::Format { field: "identityValue" })
        );
        assert!(profiles.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn anonymous_mutations_are_not_authorized() {
        let mut profiles = service(ScriptedTransport::new());
        assert_eq!(
            profiles.delete_tag(&Session::anonymous(), &ProfileId::new("a"), &TagId::new("t")).await,
            Err(ApiError::NotAuthorized)
        );
    }

    #[tokio::test]
    async fn locale_sync_updates_mismatched_profiles_once() {
        let mut list = family();
        list[0]["preference"]["language"] = json!("zh-HK");
        let mut profiles = service(
            ScriptedTransport::new()
                .respond(list.clone())
                .reject(500, None)
                .respond(list),
        );
        profiles.refresh(&session()).await.unwrap();
        profiles.sync_locale(&session()).await.unwrap();
        profiles.sync_locale(&session()).await.unwrap();

        assert_eq!(
            methods(&profiles),
            [
                (Method::Get, "/profile/v1.0/profile".to_string()),
                (Method::Put, "/profile/v1.0/profile/root/preference".to_string()),
                (Method::Get, "/profile/v1.0/profile".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn device_registration_does_not_refresh() {
        let profiles = service(ScriptedTransport::new().respond(Value::Null));
        profiles
            .register_device(&session(), &ProfileId::new("a"), "fcm", true)
            .await
            .unwrap();
        assert_eq!(methods(&profiles), [(Method::Put, "/profile/v1.0/profile/a/device".to_string())]);
    }
}
