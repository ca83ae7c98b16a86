use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::events::{AppEvent, EventBus};
use crate::model::{Task, TaskCategory, TaskPriority, TaskStatus, ThemeMode};

fn task(title: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        category: TaskCategory::Personal,
        priority: TaskPriority::Medium,
        status: TaskStatus::Pending,
        start_date: None,
        end_date: None,
        scheduled_date: None,
        scheduled_time: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn load_is_a_full_replace_not_a_merge() {
    let store = Store::new(EventBus::default());
    let a = task("a");
    let b = task("b");
    let c = task("c");

    store.dispatch(Action::TasksLoaded(vec![a.clone(), b.clone()]));
    assert_eq!(store.snapshot().tasks.len(), 2);

    // Local [A, B], fetched [B, C] -> exactly [B, C].
    store.dispatch(Action::TasksLoaded(vec![b.clone(), c.clone()]));
    let tasks = store.snapshot().tasks;
    let ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b.id, c.id]);
}

#[test]
fn load_is_idempotent() {
    let store = Store::new(EventBus::default());
    let a = task("a");
    store.dispatch(Action::TasksLoaded(vec![a.clone()]));
    store.dispatch(Action::TasksLoaded(vec![a.clone()]));
    assert_eq!(store.snapshot().tasks.len(), 1);
}

#[test]
fn theme_starts_dark_and_follows_mode() {
    let store = Store::new(EventBus::default());
    assert!(store.with_state(|s| s.theme.is_dark()));

    store.dispatch(Action::ThemeModeChanged(ThemeMode::Light));
    assert!(!store.with_state(|s| s.theme.is_dark()));

    store.dispatch(Action::ThemeModeChanged(ThemeMode::System));
    store.dispatch(Action::SystemSchemeChanged { dark: true });
    assert!(store.with_state(|s| s.theme.is_dark()));
    store.dispatch(Action::SystemSchemeChanged { dark: false });
    assert!(!store.with_state(|s| s.theme.is_dark()));
}

#[tokio::test]
async fn dispatch_publishes_state_changed() {
    let bus = EventBus::default();
    let mut rx = bus.subscribe();
    let store = Store::new(bus);
    store.dispatch(Action::TasksLoaded(Vec::new()));
    assert!(matches!(rx.recv().await.unwrap(), AppEvent::StateChanged));
}
