//! Environment-supplied backend configuration.
//!
//! All values come from `DAYFLOW_*` environment variables. A missing variable
//! degrades to an empty string rather than failing -- the app starts either
//! way and individual features (billing, OAuth) skip themselves when their
//! key is absent.

use std::str::FromStr;

use crate::error::ConfigError;

/// Platform the client is running on.
///
/// Selects the OAuth redirect style (web origin vs. custom URL scheme) and
/// whether the billing SDK is configured at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Web,
    Ios,
    Android,
    Desktop,
}

impl Platform {
    pub fn is_web(self) -> bool {
        matches!(self, Platform::Web)
    }

    /// Billing key for this platform, if the platform carries one.
    pub fn billing_key<'a>(self, config: &'a BackendConfig) -> Option<&'a str> {
        match self {
            Platform::Ios => Some(config.billing_key_ios.as_str()),
            Platform::Android => Some(config.billing_key_android.as_str()),
            Platform::Web | Platform::Desktop => None,
        }
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "desktop" => Ok(Platform::Desktop),
            other => Err(ConfigError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// Base URL of the hosted backend, e.g. `https://abc.backend.example`.
    pub base_url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
    /// Web origin used to build the OAuth redirect target on web.
    pub site_url: String,
    /// Billing SDK key for iOS builds.
    pub billing_key_ios: String,
    /// Billing SDK key for Android builds.
    pub billing_key_android: String,
}

impl BackendConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing keys become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_default()
        };
        Self {
            base_url: get("DAYFLOW_BACKEND_URL"),
            anon_key: get("DAYFLOW_ANON_KEY"),
            site_url: get("DAYFLOW_SITE_URL"),
            billing_key_ios: get("DAYFLOW_BILLING_KEY_IOS"),
            billing_key_android: get("DAYFLOW_BILLING_KEY_ANDROID"),
        }
    }

    /// Whether the remote backend can be reached at all.
    pub fn has_backend(&self) -> bool {
        !self.base_url.is_empty() && !self.anon_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_degrade_to_empty() {
        let config = BackendConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, "");
        assert_eq!(config.anon_key, "");
        assert!(!config.has_backend());
    }

    #[test]
    fn lookup_trims_trailing_slash() {
        let config = BackendConfig::from_lookup(|key| match key {
            "DAYFLOW_BACKEND_URL" => Some("https://api.example/".into()),
            "DAYFLOW_ANON_KEY" => Some("anon".into()),
            _ => None,
        });
        assert_eq!(config.base_url, "https://api.example");
        assert!(config.has_backend());
    }

    #[test]
    fn platform_parse_and_billing_keys() {
        let config = BackendConfig {
            billing_key_ios: "ios-key".into(),
            ..Default::default()
        };
        assert_eq!("web".parse::<Platform>().unwrap(), Platform::Web);
        assert!("watch".parse::<Platform>().is_err());
        assert_eq!(Platform::Ios.billing_key(&config), Some("ios-key"));
        assert_eq!(Platform::Web.billing_key(&config), None);
        assert_eq!(Platform::Android.billing_key(&config), Some(""));
    }
}
