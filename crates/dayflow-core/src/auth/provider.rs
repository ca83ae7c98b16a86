//! Authentication state provider.
//!
//! Tracks the current user and a loading flag that stays true until the
//! one-shot cold-start session restoration settles. Sign-in/sign-up/sign-out
//! go against the hosted auth endpoints; every transition publishes
//! [`AppEvent::AuthChanged`] on the bus and keeps the remote client's bearer
//! token in step.

use std::sync::{Arc, RwLock};

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::oauth;
use crate::auth::session::{Session, SessionFile};
use crate::config::{BackendConfig, Platform};
use crate::error::AuthError;
use crate::events::{AppEvent, EventBus};
use crate::model::AuthUser;
use crate::remote::RemoteClient;

/// Token response from the auth backend.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: WireUser,
}

#[derive(Deserialize)]
struct WireUser {
    id: uuid::Uuid,
    email: String,
    #[serde(default)]
    user_metadata: WireUserMetadata,
}

#[derive(Deserialize, Default)]
struct WireUserMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl From<WireUser> for AuthUser {
    fn from(wire: WireUser) -> Self {
        AuthUser {
            id: wire.id,
            email: wire.email,
            name: wire.user_metadata.name,
        }
    }
}

struct AuthState {
    user: Option<AuthUser>,
    /// True until cold-start restoration has settled exactly once.
    loading: bool,
}

/// Authentication state provider over the hosted auth backend.
pub struct AuthProvider {
    client: Arc<RemoteClient>,
    config: BackendConfig,
    bus: EventBus,
    sessions: SessionFile,
    state: RwLock<AuthState>,
}

impl AuthProvider {
    pub fn new(
        client: Arc<RemoteClient>,
        config: BackendConfig,
        bus: EventBus,
        sessions: SessionFile,
    ) -> Self {
        Self {
            client,
            config,
            bus,
            sessions,
            state: RwLock::new(AuthState {
                user: None,
                loading: true,
            }),
        }
    }

    /// The signed-in user, or `None`.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.read().expect("auth state lock poisoned").user.clone()
    }

    /// True until the cold-start restoration has settled.
    pub fn is_loading(&self) -> bool {
        self.state.read().expect("auth state lock poisoned").loading
    }

    fn settle(&self, user: Option<AuthUser>) {
        {
            let mut state = self.state.write().expect("auth state lock poisoned");
            state.user = user.clone();
            state.loading = false;
        }
        self.bus.publish(AppEvent::AuthChanged { user });
    }

    /// Restore the persisted session from cold start.
    ///
    /// Settles the loading flag exactly once whether or not a session was
    /// found. A missing or unreadable session file settles to signed-out.
    pub fn restore(&self) -> Option<AuthUser> {
        let restored = self.sessions.load();
        let user = match restored {
            Some(session) => {
                debug!(user = %session.user.id, "session restored");
                self.client.set_bearer(&session.access_token);
                Some(session.user)
            }
            None => None,
        };
        self.settle(user.clone());
        user
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    async fn token_request(
        &self,
        url: String,
        body: serde_json::Value,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .http()
            .post(url)
            .header("apikey", self.client.anon_key())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        let user: AuthUser = token.user.into();

        self.client.set_bearer(&token.access_token);
        self.sessions.save(&Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user: user.clone(),
        })?;
        self.settle(Some(user.clone()));
        Ok(user)
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        info!(email, "sign in");
        self.token_request(
            format!("{}?grant_type=password", self.auth_url("token")),
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Create an account and sign in.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, AuthError> {
        info!(email, "sign up");
        self.token_request(
            self.auth_url("signup"),
            json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }),
        )
        .await
    }

    /// Sign out.
    ///
    /// The persisted session and bearer token are always cleared, even when
    /// the server-side revoke fails -- local sign-out must not be blocked by
    /// the network.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let revoke = self
            .client
            .authed(self.client.http().post(self.auth_url("logout")))
            .send()
            .await;
        if let Err(e) = revoke {
            warn!("sign-out revoke failed: {e}");
        }

        self.client.clear_bearer();
        self.sessions.clear()?;
        self.settle(None);
        Ok(())
    }

    /// Authorize URL for a redirect-based OAuth sign-in.
    pub fn oauth_authorize_url(
        &self,
        provider: &str,
        platform: Platform,
    ) -> Result<Url, AuthError> {
        oauth::authorize_url(&self.config, provider, platform)
    }
}
