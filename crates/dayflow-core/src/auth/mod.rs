//! Authentication: session persistence, the auth state provider, and the
//! OAuth redirect flow.

pub mod oauth;
pub mod provider;
pub mod session;

pub use oauth::{authorize_url, redirect_url, CallbackOutcome};
pub use provider::AuthProvider;
pub use session::{Session, SessionFile};
