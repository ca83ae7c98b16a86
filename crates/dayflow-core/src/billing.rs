//! Billing SDK configuration step.
//!
//! The purchase/subscription SDK itself is an external collaborator; the
//! shell only owns the one-time configure call at mount. Web builds and
//! builds without a platform key skip it entirely.

use tracing::{debug, info};

use crate::config::{BackendConfig, Platform};

/// Configure the billing SDK for this platform.
///
/// Returns whether configuration actually happened. Never fails: a missing
/// key degrades to a skip.
pub fn configure(config: &BackendConfig, platform: Platform) -> bool {
    if platform.is_web() {
        debug!("billing: skipped on web");
        return false;
    }
    match platform.billing_key(config) {
        Some(key) if !key.is_empty() => {
            info!(?platform, "billing configured");
            true
        }
        _ => {
            debug!(?platform, "billing: no key, skipped");
            false
        }
    }
}
