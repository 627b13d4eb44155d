//! Root / standard profile selection and ordering.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use accountkit_core::validate::parse_datetime;

use crate::model::Profile;

/// The customer's root profile: the first one flagged `root`.
pub fn root_profile(profiles: &[Profile]) -> Option<&Profile> {
    profiles.iter().find(|p| p.root)
}

/// When the profile was created, taken from its first dated email entry.
pub fn created_at(profile: &Profile) -> Option<DateTime<Utc>> {
    profile
        .email
        .as_deref()?
        .iter()
        .find_map(|email| email.datetime.as_deref().filter(|d| !d.is_empty()))
        .and_then(parse_datetime)
}

/// Non-root profiles, newest first.
///
/// Profiles without a creation time sort after every dated profile and keep
/// their relative input order.
pub fn standard_profiles(profiles: &[Profile]) -> Vec<Profile> {
    let mut standard: Vec<(Option<DateTime<Utc>>, &Profile)> = profiles
        .iter()
        .filter(|p| !p.root)
        .map(|p| (created_at(p), p))
        .collect();
    standard.sort_by(|(a, _), (b, _)| newest_first(a.as_ref(), b.as_ref()));
    standard.into_iter().map(|(_, p)| p.clone()).collect()
}

fn newest_first(a: Option<&DateTime<Utc>>, b: Option<&DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileEmail, ProfileName};
    use accountkit_core::{CustomerId, ProfileId};
    use proptest::prelude::*;

    fn profile(id: &str, datetime: Option<&str>) -> Profile {
        let mut profile = Profile::new(
            ProfileId::new(id),
            CustomerId::new("c1"),
            ProfileName::new(format!("n-{id}")),
        );
        profile.email = datetime.map(|d| {
            vec![ProfileEmail {
                email_id: None,
                datetime: Some(d.to_string()),
                primary: true,
                name: "primary".into(),
                email: format!("{id}@example.com"),
            }]
        });
        profile
    }

    fn ids(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.profile_id.as_str()).collect()
    }

    #[test]
    fn root_is_first_flagged_profile() {
        let mut root = profile("r", None);
        root.root = true;
        let profiles = vec![profile("a", None), root.clone(), profile("b", None)];
        assert_eq!(root_profile(&profiles), Some(&root));
        assert_eq!(root_profile(&profiles[..1]), None);
    }

    #[test]
    fn newest_profiles_first_and_root_excluded() {
        let mut root = profile("r", Some("2024-01-01T00:00:00Z"));
        root.root = true;
        let profiles = vec![
            profile("old", Some("2022-01-01T00:00:00Z")),
            root,
            profile("new", Some("2023-06-01 12:00:00")),
            profile("undated", None),
            profile("mid", Some("2023-01-01")),
        ];
        assert_eq!(ids(&standard_profiles(&profiles)), ["new", "mid", "old", "undated"]);
    }

    #[test]
    fn unparseable_or_empty_datetime_counts_as_undated() {
        let mut blank = profile("blank", None);
        blank.email = Some(vec![]);
        let profiles = vec![
            profile("garbage", Some("yesterday")),
            profile("empty", Some("")),
            blank,
            profile("dated", Some("2020-01-01")),
        ];
        assert_eq!(created_at(&profiles[0]), None);
        assert_eq!(
            ids(&standard_profiles(&profiles)),
            ["dated", "garbage", "empty", "blank"]
        );
    }

    fn dated_and_undated() -> impl Strategy<Value = Vec<Profile>> {
        (
            prop::collection::btree_set(0u32..100_000, 0..8),
            1usize..8,
        )
            .prop_flat_map(|(days, undated)| {
                let mut profiles: Vec<Profile> = days
                    .into_iter()
                    .map(|day| {
                        let at = DateTime::from_timestamp(i64::from(day) * 86_400, 0)
                            .map(|d| d.to_rfc3339());
                        profile(&format!("d{day}"), at.as_deref())
                    })
                    .collect();
                profiles.extend((0..undated).map(|i| profile(&format!("u{i}"), None)));
                Just(profiles).prop_shuffle()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

        /// Property: dated profiles come first, newest first; undated ones keep input order.
        #[test]
        fn ordering_is_total_and_stable(profiles in dated_and_undated()) {
            let sorted = standard_profiles(&profiles);
            prop_assert_eq!(sorted.len(), profiles.len());

            let split = sorted.iter().position(|p| created_at(p).is_none()).unwrap_or(sorted.len());
            prop_assert!(sorted[split..].iter().all(|p| created_at(p).is_none()));

            let dated: Vec<_> = sorted[..split].iter().filter_map(created_at).collect();
            prop_assert!(dated.windows(2).all(|w| w[0] > w[1]));

            let undated_in: Vec<_> = profiles.iter().filter(|p| created_at(p).is_none()).collect();
            let undated_out: Vec<_> = sorted[split..].iter().collect();
            prop_assert_eq!(undated_in, undated_out);
        }
    }
}
