//! Shell sequencing tests: navigation guard, theme fallback, and the
//! per-collection store dispatches, all against in-process fakes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use dayflow_core::{
    AppShell, AuthProvider, AuthUser, BackendConfig, EventBus, Habit, HabitCompletion, Navigator,
    Platform, PomodoroSession, RemoteClient, RemoteError, Route, SessionFile, Store, Task,
    TaskCategory, TaskPriority, TaskStatus, ThemeMode, UserDataAggregator, UserDataSource,
    UserSettings,
};

/// Records every navigation call.
#[derive(Default)]
struct RecordingNavigator {
    calls: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.calls.lock().unwrap().push(route);
    }
}

impl RecordingNavigator {
    fn calls(&self) -> Vec<Route> {
        self.calls.lock().unwrap().clone()
    }
}

/// Fake backend: one task per user, settings configurable.
struct FakeSource {
    settings_fail: AtomicBool,
    theme: ThemeMode,
}

impl FakeSource {
    fn new(theme: ThemeMode) -> Self {
        Self {
            settings_fail: AtomicBool::new(false),
            theme,
        }
    }
}

#[async_trait]
impl UserDataSource for FakeSource {
    async fn fetch_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, RemoteError> {
        Ok(vec![Task {
            id: Uuid::new_v4(),
            user_id,
            title: "from remote".to_string(),
            description: None,
            category: TaskCategory::Personal,
            priority: TaskPriority::Low,
            status: TaskStatus::Pending,
            start_date: None,
            end_date: None,
            scheduled_date: None,
            scheduled_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }])
    }

    async fn fetch_habits(&self, _user_id: Uuid) -> Result<Vec<Habit>, RemoteError> {
        Ok(Vec::new())
    }

    async fn fetch_completions(
        &self,
        _user_id: Uuid,
    ) -> Result<Vec<HabitCompletion>, RemoteError> {
        Err(RemoteError::Api {
            status: 500,
            message: "completions down".to_string(),
        })
    }

    async fn fetch_sessions(&self, _user_id: Uuid) -> Result<Vec<PomodoroSession>, RemoteError> {
        Ok(Vec::new())
    }

    async fn load_settings(&self, user_id: Uuid) -> Result<UserSettings, RemoteError> {
        if self.settings_fail.load(Ordering::SeqCst) {
            return Err(RemoteError::Api {
                status: 503,
                message: "settings down".to_string(),
            });
        }
        Ok(UserSettings {
            user_id,
            theme: self.theme,
            language: "en".to_string(),
        })
    }
}

struct Harness {
    shell: AppShell,
    navigator: Arc<RecordingNavigator>,
    store: Arc<Store>,
    source: Arc<FakeSource>,
}

fn harness(theme: ThemeMode) -> Harness {
    let config = BackendConfig::default();
    let bus = EventBus::default();
    let source = Arc::new(FakeSource::new(theme));
    let navigator = Arc::new(RecordingNavigator::default());
    let store = Arc::new(Store::new(bus.clone()));
    let aggregator = Arc::new(UserDataAggregator::new(
        source.clone() as Arc<dyn UserDataSource>,
        bus.clone(),
    ));
    let client = Arc::new(RemoteClient::new(&config));
    let dir = std::env::temp_dir().join(format!("dayflow-test-{}", Uuid::new_v4()));
    let auth = Arc::new(AuthProvider::new(
        client,
        config.clone(),
        bus.clone(),
        SessionFile::at(dir.join("session.json")),
    ));
    let shell = AppShell::new(
        config,
        Platform::Desktop,
        auth,
        source.clone() as Arc<dyn UserDataSource>,
        aggregator,
        store.clone(),
        navigator.clone() as Arc<dyn Navigator>,
        bus,
    );
    Harness {
        shell,
        navigator,
        store,
        source,
    }
}

fn user() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        name: None,
    }
}

/// Test: unauthenticated settle navigates to sign-in exactly once; signing in
/// resets the guard and navigates to main exactly once; repeated settles with
/// the unchanged user add nothing.
#[tokio::test]
async fn navigation_fires_once_per_settle_transition() {
    let h = harness(ThemeMode::Dark);

    h.shell.on_auth_settled(None).await;
    assert_eq!(h.navigator.calls(), vec![Route::SignIn]);

    // Re-render with unchanged (absent) user: no duplicate.
    h.shell.on_auth_settled(None).await;
    assert_eq!(h.navigator.calls(), vec![Route::SignIn]);

    let ada = user();
    h.shell.on_auth_settled(Some(ada.clone())).await;
    assert_eq!(h.navigator.calls(), vec![Route::SignIn, Route::Main]);

    // Repeated settles with the same user id: still one Main.
    h.shell.on_auth_settled(Some(ada.clone())).await;
    h.shell.on_auth_settled(Some(ada)).await;
    assert_eq!(h.navigator.calls(), vec![Route::SignIn, Route::Main]);
}

/// Test: logout then re-login navigates again (guard reset on identity
/// change), including to a different user.
#[tokio::test]
async fn guard_resets_when_user_identity_changes() {
    let h = harness(ThemeMode::Dark);

    let ada = user();
    h.shell.on_auth_settled(Some(ada)).await;
    h.shell.on_auth_settled(None).await;
    let grace = user();
    h.shell.on_auth_settled(Some(grace)).await;

    assert_eq!(
        h.navigator.calls(),
        vec![Route::Main, Route::SignIn, Route::Main]
    );
}

/// Test: settings theme lands in the store when the load succeeds.
#[tokio::test]
async fn theme_comes_from_settings() {
    let h = harness(ThemeMode::Light);
    h.shell.on_auth_settled(Some(user())).await;
    assert_eq!(h.store.with_state(|s| s.theme.mode), ThemeMode::Light);
    assert!(!h.store.with_state(|s| s.theme.is_dark()));
}

/// Test: a rejected settings fetch falls back to dark instead of failing the
/// shell.
#[tokio::test]
async fn theme_falls_back_to_dark_on_settings_error() {
    let h = harness(ThemeMode::Light);
    h.source.settings_fail.store(true, Ordering::SeqCst);

    h.shell.on_auth_settled(Some(user())).await;
    assert_eq!(h.store.with_state(|s| s.theme.mode), ThemeMode::Dark);
    // The failure was swallowed: navigation still happened.
    assert_eq!(h.navigator.calls(), vec![Route::Main]);
}

/// Test: unauthenticated settle also resolves dark.
#[tokio::test]
async fn theme_defaults_to_dark_when_signed_out() {
    let h = harness(ThemeMode::Light);
    h.shell.on_auth_settled(None).await;
    assert_eq!(h.store.with_state(|s| s.theme.mode), ThemeMode::Dark);
}

/// Test: collections dispatch independently -- the failing collection keeps
/// its previous local state while siblings are replaced.
#[tokio::test]
async fn collections_dispatch_independently() {
    let h = harness(ThemeMode::Dark);
    let ada = user();

    h.shell.on_auth_settled(Some(ada)).await;
    let state = h.store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].title, "from remote");
    assert!(state.habits.is_empty());
    // Completions fetch failed; the store kept its (empty) previous value
    // rather than being poisoned.
    assert!(state.completions.is_empty());
    assert!(state.sessions.is_empty());
}

/// Test: start() runs the whole mount sequence against a cold session store
/// and lands on sign-in.
#[tokio::test]
async fn start_sequences_cold_boot() {
    let h = harness(ThemeMode::Dark);
    h.shell.start().await;
    assert_eq!(h.navigator.calls(), vec![Route::SignIn]);
    assert!(h.store.with_state(|s| s.theme.is_dark()));
}
