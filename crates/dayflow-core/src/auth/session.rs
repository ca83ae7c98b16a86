//! Persisted session file I/O.
//!
//! The signed-in session (tokens plus the user record) lives in
//! `session.json` under the app config dir with owner-only permissions.
//! Cold-start restoration reads this file exactly once.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AuthError;
use crate::model::AuthUser;

const SESSION_FILE_NAME: &str = "session.json";

/// A signed-in session as persisted between cold starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// File-backed session storage. The path is injectable for tests.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// `~/.config/dayflow/session.json` (platform equivalent).
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dayflow")
            .join(SESSION_FILE_NAME)
    }

    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. A missing or unreadable file is `None`,
    /// never an error -- cold start just settles to signed-out.
    pub fn load(&self) -> Option<Session> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("failed to read session file: {e}");
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("failed to parse session file: {e}");
                None
            }
        }
    }

    /// Persist the session, creating parent directories as needed.
    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;
        std::fs::write(&self.path, &json).map_err(|e| AuthError::SessionStore(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&self.path, perms);
        }

        Ok(())
    }

    /// Remove the persisted session. Missing file is fine.
    pub fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::SessionStore(e.to_string())),
        }
    }
}

impl Default for SessionFile {
    fn default() -> Self {
        Self::new()
    }
}
