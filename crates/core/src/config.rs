//! Client configuration.

/// Default locale sent to the services when the host does not provide one.
pub const DEFAULT_LOCALE: &str = "en-HK";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Settings shared by every request builder and the profile state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the service paths (`/authentication`, `/customer`, `/profile`) hang off.
    pub base_url: String,
    /// Locale kept in sync on the account's preferences.
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from `ACCOUNTKIT_API_URL` and `ACCOUNTKIT_LOCALE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("ACCOUNTKIT_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("ACCOUNTKIT_API_URL not set; using {DEFAULT_BASE_URL}");
                DEFAULT_BASE_URL.to_string()
            });
        let locale = lookup("ACCOUNTKIT_LOCALE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Self { base_url, locale }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}
