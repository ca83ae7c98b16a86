//! Shared CLI context: environment config, remote client, restored session.

use std::error::Error;
use std::sync::Arc;

use dayflow_core::{AuthProvider, BackendConfig, EventBus, RemoteClient, Session, SessionFile};
use uuid::Uuid;

pub struct Ctx {
    pub config: BackendConfig,
    pub client: Arc<RemoteClient>,
    pub bus: EventBus,
    pub session: Option<Session>,
}

/// Build the CLI context: env config, client, and the persisted session (the
/// bearer token is applied when one exists).
pub fn context() -> Ctx {
    let config = BackendConfig::from_env();
    let client = Arc::new(RemoteClient::new(&config));
    let session = SessionFile::new().load();
    if let Some(session) = &session {
        client.set_bearer(&session.access_token);
    }
    Ctx {
        config,
        client,
        bus: EventBus::default(),
        session,
    }
}

/// Auth provider over the shared context.
pub fn auth_provider(ctx: &Ctx) -> AuthProvider {
    AuthProvider::new(
        Arc::clone(&ctx.client),
        ctx.config.clone(),
        ctx.bus.clone(),
        SessionFile::new(),
    )
}

/// The signed-in user id, or a friendly error telling the user to log in.
pub fn require_user(ctx: &Ctx) -> Result<Uuid, Box<dyn Error>> {
    ctx.session
        .as_ref()
        .map(|s| s.user.id)
        .ok_or_else(|| "not signed in (run `dayflow-cli auth login` first)".into())
}
