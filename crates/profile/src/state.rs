//! Client-side profile state: the fetched list and the current selection.

use accountkit_core::{Entity, ProfileId, find_by_id};

use crate::model::Profile;
use crate::ordering::{root_profile, standard_profiles};
use crate::update::PreferenceChange;

/// Profiles known to the client, and which one the user is acting as.
///
/// `current` always refers to one of the standard profiles once a list has
/// been loaded: every refresh and every selection is reconciled against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    ready: bool,
    profiles: Option<Vec<Profile>>,
    root: Option<Profile>,
    current: Option<Profile>,
    /// Selection to restore when nothing is selected (e.g. from a previous run).
    remembered: Option<ProfileId>,
    root_synced: Option<ProfileId>,
    current_synced: Option<ProfileId>,
}

/// A profile whose preferred language differs from the app locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSync {
    pub profile_id: ProfileId,
    pub preference: PreferenceChange,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a previously selected profile on the next reconciliation.
    pub fn with_remembered(mut self, profile_id: Option<ProfileId>) -> Self {
        self.remembered = profile_id;
        self
    }

    /// Whether the initial load has been attempted (successfully or not).
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Standard (non-root) profiles, newest first. `None` until loaded.
    pub fn profiles(&self) -> Option<&[Profile]> {
        self.profiles.as_deref()
    }

    pub fn root_profile(&self) -> Option<&Profile> {
        self.root.as_ref()
    }

    pub fn current_profile(&self) -> Option<&Profile> {
        self.current.as_ref()
    }

    /// Id of the selection to persist across runs.
    pub fn remembered(&self) -> Option<&ProfileId> {
        self.remembered.as_ref()
    }

    /// Replace the known profiles with a freshly fetched list.
    pub fn apply_refresh(&mut self, all: &[Profile]) {
        self.root = root_profile(all).cloned();
        self.profiles = Some(standard_profiles(all));
        tracing::debug!(
            standard = self.profiles.as_ref().map_or(0, Vec::len),
            root = self.root.is_some(),
            "profiles refreshed"
        );
        self.reconcile();
        self.ready = true;
    }

    /// Select `profile` as the current one (or clear the selection).
    ///
    /// The selection is reconciled against the loaded list right away, so a
    /// stale or unknown profile is replaced by its fresh record or a default.
    pub fn set_current(&mut self, profile: Option<Profile>) {
        self.remembered = profile.as_ref().map(|p| p.id().clone());
        self.current = profile;
        self.reconcile();
    }

    /// Forget everything, e.g. on logout.
    pub fn clear(&mut self) {
        *self = Self {
            ready: self.ready,
            ..Self::default()
        };
    }

    /// Preference updates needed to bring newly selected root/current
    /// profiles in line with `locale`.
    ///
    /// A profile is considered once per selection: asking again before the
    /// root or current profile changes yields nothing.
    pub fn locale_sync(&mut self, locale: &str) -> Vec<LocaleSync> {
        let mut updates = Vec::new();
        for (profile, synced) in [
            (&self.root, &mut self.root_synced),
            (&self.current, &mut self.current_synced),
        ] {
            let id = profile.as_ref().map(|p| p.id().clone());
            if id == *synced {
                continue;
            }
            *synced = id;
            if let Some(update) = profile.as_ref().and_then(|p| locale_update(p, locale)) {
                if !updates.contains(&update) {
                    updates.push(update);
                }
            }
        }
        updates
    }

    fn reconcile(&mut self) {
        let Some(profiles) = &self.profiles else {
            return;
        };
        if profiles.is_empty() {
            self.current = None;
            return;
        }

        if let Some(current) = &self.current {
            match find_by_id(profiles, current.id()) {
                Some(fresh) if fresh == current => return,
                Some(fresh) => {
                    tracing::debug!(profile_id = %fresh.profile_id, "current profile updated");
                    self.current = Some(fresh.clone());
                    return;
                }
                None => {
                    tracing::debug!(profile_id = %current.profile_id, "current profile no longer listed");
                    self.current = None;
                }
            }
        }

        if self.root.is_none() {
            return;
        }
        let default = self
            .remembered
            .as_ref()
            .and_then(|id| find_by_id(profiles, id))
            .or_else(|| profiles.first())
            .cloned();
        if let Some(profile) = &default {
            tracing::debug!(profile_id = %profile.profile_id, "default profile selected");
            self.remembered = Some(profile.id().clone());
        }
        self.current = default;
    }
}

fn locale_update(profile: &Profile, locale: &str) -> Option<LocaleSync> {
    if profile.language() == Some(locale) {
        return None;
    }
    Some(LocaleSync {
        profile_id: profile.id().clone(),
        preference: PreferenceChange {
            language: Some(locale.to_string()),
            location: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileEmail, ProfileName, ProfilePreference};
    use accountkit_core::CustomerId;

    fn profile(id: &str, datetime: &str) -> Profile {
        let mut profile = Profile::new(
            ProfileId::new(id),
            CustomerId::new("c1"),
            ProfileName::new(format!("n-{id}")),
        );
        profile.email = Some(vec![ProfileEmail {
            email_id: None,
            datetime: Some(datetime.to_string()),
            primary: true,
            name: "primary".into(),
            email: format!("{id}@example.com"),
        }]);
        profile
    }

    fn root() -> Profile {
        let mut root = profile("root", "2020-01-01");
        root.root = true;
        root
    }

    fn with_language(mut profile: Profile, language: &str) -> Profile {
        profile.preference = Some(ProfilePreference {
            preference_id: Some("pr".into()),
            language: language.into(),
            location: None,
        });
        profile
    }

    fn current_id(state: &ProfileState) -> Option<&str> {
        state.current_profile().map(|p| p.profile_id.as_str())
    }

    #[test]
    fn first_refresh_selects_newest_standard_profile() {
        let mut state = ProfileState::new();
        assert!(!state.is_ready());
        state.apply_refresh(&[root(), profile("a", "2021-01-01"), profile("b", "2022-01-01")]);

        assert!(state.is_ready());
        assert_eq!(state.root_profile().map(|p| p.profile_id.as_str()), Some("root"));
        assert_eq!(state.profiles().map(<[Profile]>::len), Some(2));
        assert_eq!(current_id(&state), Some("b"));
        assert_eq!(state.remembered(), Some(&ProfileId::new("b")));
    }

    #[test]
    fn remembered_selection_is_restored() {
        let mut state = ProfileState::new().with_remembered(Some(ProfileId::new("a")));
        state.apply_refresh(&[root(), profile("a", "2021-01-01"), profile("b", "2022-01-01")]);
        assert_eq!(current_id(&state), Some("a"));

        let mut state = ProfileState::new().with_remembered(Some(ProfileId::new("gone")));
        state.apply_refresh(&[root(), profile("a", "2021-01-01")]);
        assert_eq!(current_id(&state), Some("a"));
    }

    #[test]
    fn no_default_without_root_profile() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[profile("a", "2021-01-01")]);
        assert_eq!(current_id(&state), None);
        assert!(state.is_ready());
    }

    #[test]
    fn empty_list_clears_selection() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01")]);
        state.apply_refresh(&[root()]);
        assert_eq!(current_id(&state), None);
    }

    #[test]
    fn refresh_replaces_current_with_fresh_record() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01"), profile("b", "2022-01-01")]);
        state.set_current(state.profiles().and_then(|p| p.last()).cloned());
        assert_eq!(current_id(&state), Some("a"));

        let renamed = with_language(profile("a", "2021-01-01"), "zh-HK");
        state.apply_refresh(&[root(), renamed.clone(), profile("b", "2022-01-01")]);
        assert_eq!(state.current_profile(), Some(&renamed));
    }

    #[test]
    fn deleted_current_falls_back_to_default() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01"), profile("b", "2022-01-01")]);
        assert_eq!(current_id(&state), Some("b"));
        state.apply_refresh(&[root(), profile("a", "2021-01-01")]);
        assert_eq!(current_id(&state), Some("a"));
    }

    #[test]
    fn partial_selection_is_upgraded_to_listed_record() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01"), profile("b", "2022-01-01")]);
        let partial = Profile::new(ProfileId::new("a"), CustomerId::new("c1"), ProfileName::new("n-a"));
        state.set_current(Some(partial));
        assert_eq!(state.current_profile(), Some(&profile("a", "2021-01-01")));
    }

    #[test]
    fn root_cannot_be_selected() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01")]);
        state.set_current(Some(root()));
        assert_eq!(current_id(&state), Some("a"));
    }

    #[test]
    fn selection_before_load_is_kept() {
        let mut state = ProfileState::new();
        state.set_current(Some(profile("a", "2021-01-01")));
        assert_eq!(current_id(&state), Some("a"));
        state.set_current(None);
        assert_eq!(current_id(&state), None);
        assert_eq!(state.remembered(), None);
    }

    #[test]
    fn clear_forgets_profiles_but_stays_ready() {
        let mut state = ProfileState::new();
        state.apply_refresh(&[root(), profile("a", "2021-01-01")]);
        state.clear();
        assert!(state.is_ready());
        assert_eq!(state.profiles(), None);
        assert_eq!(state.root_profile(), None);
        assert_eq!(current_id(&state), None);
    }

    #[test]
    fn locale_sync_once_per_selection() {
        let mut state = ProfileState::new();
        let root = with_language(root(), "zh-HK");
        let a = with_language(profile("a", "2021-01-01"), "en-HK");
        let b = profile("b", "2022-01-01");
        state.apply_refresh(&[root, a.clone(), b]);

        let updates = state.locale_sync("en-HK");
        let ids: Vec<_> = updates.iter().map(|u| u.profile_id.as_str()).collect();
        assert_eq!(ids, ["root", "b"]);
        assert_eq!(updates[0].preference.language.as_deref(), Some("en-HK"));

        assert!(state.locale_sync("en-HK").is_empty());

        state.set_current(Some(a));
        assert!(state.locale_sync("en-HK").is_empty());
    }
}
