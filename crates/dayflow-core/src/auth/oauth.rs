//! OAuth redirect flow against the hosted auth provider.
//!
//! The client only constructs the provider authorize URL and hands it to the
//! platform to open; the hosted provider runs the actual consent dance and
//! redirects back to a platform-dependent callback target. A callback screen
//! then re-checks auth state on a fixed delay and branches to the main app or
//! back to sign-in.

use std::time::Duration;

use url::Url;

use crate::auth::provider::AuthProvider;
use crate::config::{BackendConfig, Platform};
use crate::error::AuthError;

/// Callback path appended to the web origin.
pub const WEB_CALLBACK_PATH: &str = "/(auth)/oauth-callback";

/// Custom-scheme callback used on native builds.
pub const NATIVE_CALLBACK_URL: &str = "dayflow://oauth-callback";

/// How long the callback screen waits before re-checking auth state.
pub const CALLBACK_SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// Where the callback screen sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// A session arrived; continue into the main app.
    SignedIn,
    /// No session after the redirect; back to sign-in.
    SignedOut,
}

/// Redirect target the provider sends the browser back to.
pub fn redirect_url(config: &BackendConfig, platform: Platform) -> String {
    if platform.is_web() {
        format!("{}{WEB_CALLBACK_PATH}", config.site_url)
    } else {
        NATIVE_CALLBACK_URL.to_string()
    }
}

/// Full authorize URL for the named provider (e.g. "github", "google").
pub fn authorize_url(
    config: &BackendConfig,
    provider: &str,
    platform: Platform,
) -> Result<Url, AuthError> {
    let mut url = Url::parse(&format!("{}/auth/v1/authorize", config.base_url))
        .map_err(|e| AuthError::CallbackFailed(format!("bad backend URL: {e}")))?;
    url.query_pairs_mut()
        .append_pair("provider", provider)
        .append_pair("redirect_to", &redirect_url(config, platform));
    Ok(url)
}

/// Re-check auth state after the redirect completes.
///
/// Waits the fixed delay, then branches on whether a user is present. The
/// delay is injectable for tests via [`resolve_callback_after`].
pub async fn resolve_callback(auth: &AuthProvider) -> CallbackOutcome {
    resolve_callback_after(auth, CALLBACK_SETTLE_DELAY).await
}

pub async fn resolve_callback_after(auth: &AuthProvider, delay: Duration) -> CallbackOutcome {
    tokio::time::sleep(delay).await;
    if auth.current_user().is_some() {
        CallbackOutcome::SignedIn
    } else {
        CallbackOutcome::SignedOut
    }
}
