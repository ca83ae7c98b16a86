//! App-shell sequencing.
//!
//! Wires the pieces together on startup: configure billing, resolve auth,
//! load settings/theme, load user data, dispatch into the store, navigate.
//! Auth transitions after startup arrive as bus events; every reaction here
//! is idempotent, so a repeated settle with an unchanged user re-runs the
//! loads harmlessly and navigates zero additional times.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregator::{UserDataAggregator, UserDataSource};
use crate::auth::AuthProvider;
use crate::billing;
use crate::config::{BackendConfig, Platform};
use crate::events::{AppEvent, EventBus};
use crate::model::{AuthUser, ThemeMode};
use crate::store::{Action, Store};

/// Top-level routes the shell decides between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Main,
}

/// Navigation seam. The router itself is an external collaborator; the shell
/// only tells it where to go.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// One navigation decision fires per settle transition; the guard resets
/// when the authenticated user identity changes, so logout -> re-login
/// navigates again while re-renders with an unchanged user do not.
struct NavGuard {
    has_navigated: bool,
    last_user: Option<Uuid>,
}

/// Sequences auth, theme, data load, and navigation.
pub struct AppShell {
    config: BackendConfig,
    platform: Platform,
    auth: Arc<AuthProvider>,
    source: Arc<dyn UserDataSource>,
    aggregator: Arc<UserDataAggregator>,
    store: Arc<Store>,
    navigator: Arc<dyn Navigator>,
    bus: EventBus,
    guard: Mutex<NavGuard>,
}

impl AppShell {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: BackendConfig,
        platform: Platform,
        auth: Arc<AuthProvider>,
        source: Arc<dyn UserDataSource>,
        aggregator: Arc<UserDataAggregator>,
        store: Arc<Store>,
        navigator: Arc<dyn Navigator>,
        bus: EventBus,
    ) -> Self {
        Self {
            config,
            platform,
            auth,
            source,
            aggregator,
            store,
            navigator,
            bus,
            guard: Mutex::new(NavGuard {
                has_navigated: false,
                last_user: None,
            }),
        }
    }

    /// One-time mount sequence: configure billing, restore the persisted
    /// session, then run the settle reactions for whatever auth resolved to.
    pub async fn start(&self) {
        billing::configure(&self.config, self.platform);
        let user = self.auth.restore();
        self.on_auth_settled(user).await;
    }

    /// Consume auth transitions from the bus.
    ///
    /// Runs until the bus closes. Intended to be spawned after [`start`] in
    /// long-lived apps so sign-in/sign-out keep driving the same reactions.
    pub async fn run(&self) {
        let mut rx = self.bus.subscribe();
        while let Ok(event) = rx.recv().await {
            if let AppEvent::AuthChanged { user } = event {
                self.on_auth_settled(user).await;
            }
        }
    }

    /// Reactions to one auth settle: theme, data, navigation.
    pub async fn on_auth_settled(&self, user: Option<AuthUser>) {
        info!(user = ?user.as_ref().map(|u| u.id), "auth settled");
        self.load_theme(user.as_ref()).await;
        if let Some(user) = &user {
            self.load_user_data(user.id).await;
        } else {
            self.aggregator.cancel_all();
        }
        self.navigate_once(user.as_ref().map(|u| u.id));
    }

    /// Theme/settings load keyed on the user id. Falls back to dark when
    /// signed out or when the settings fetch fails; the error never
    /// propagates out of the shell.
    async fn load_theme(&self, user: Option<&AuthUser>) {
        let mode = match user {
            Some(user) => match self.source.load_settings(user.id).await {
                Ok(settings) => settings.theme,
                Err(error) => {
                    warn!(%error, "settings load failed, falling back to dark");
                    ThemeMode::Dark
                }
            },
            None => ThemeMode::Dark,
        };
        self.store.dispatch(Action::ThemeModeChanged(mode));
        self.bus.publish(AppEvent::ThemeResolved { mode });
    }

    /// Aggregate load, then one store dispatch per collection that loaded.
    /// Failed collections are skipped; the store keeps whatever it had.
    async fn load_user_data(&self, user_id: Uuid) {
        let outcome = self.aggregator.load(user_id).await;
        match outcome.tasks {
            Ok(tasks) => self.store.dispatch(Action::TasksLoaded(tasks)),
            Err(error) => debug!(%error, "tasks not dispatched"),
        }
        match outcome.habits {
            Ok(habits) => self.store.dispatch(Action::HabitsLoaded(habits)),
            Err(error) => debug!(%error, "habits not dispatched"),
        }
        match outcome.completions {
            Ok(completions) => self.store.dispatch(Action::CompletionsLoaded(completions)),
            Err(error) => debug!(%error, "completions not dispatched"),
        }
        match outcome.sessions {
            Ok(sessions) => self.store.dispatch(Action::SessionsLoaded(sessions)),
            Err(error) => debug!(%error, "sessions not dispatched"),
        }
    }

    fn navigate_once(&self, user_id: Option<Uuid>) {
        let mut guard = self.guard.lock().expect("nav guard lock poisoned");
        if guard.last_user != user_id {
            guard.has_navigated = false;
            guard.last_user = user_id;
        }
        if guard.has_navigated {
            return;
        }
        guard.has_navigated = true;
        let route = if user_id.is_some() {
            Route::Main
        } else {
            Route::SignIn
        };
        debug!(?route, "navigating");
        self.navigator.navigate(route);
    }
}
