//! HTTP-level tests for the remote data client against a mock backend.

use mockito::Matcher;
use serde_json::json;
use uuid::Uuid;

use dayflow_core::remote::TaskPatch;
use dayflow_core::{
    BackendConfig, Direction, Query, RemoteClient, RemoteError, TaskCategory, TaskStatus,
    ThemeMode,
};

fn client_for(server: &mockito::ServerGuard) -> RemoteClient {
    RemoteClient::new(&BackendConfig {
        base_url: server.url(),
        anon_key: "anon-key".to_string(),
        ..Default::default()
    })
}

fn task_json(id: Uuid, user_id: Uuid, title: &str, category: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "title": title,
        "description": null,
        "category": category,
        "priority": "medium",
        "status": "pending",
        "start_date": null,
        "end_date": null,
        "scheduled_date": null,
        "scheduled_time": null,
        "created_at": "2026-01-10T08:00:00Z",
        "updated_at": "2026-01-10T08:00:00Z",
    })
}

fn completion_json(id: Uuid, user_id: Uuid, habit_id: Uuid, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "habit_id": habit_id,
        "date": "2026-01-10",
        "completed": completed,
    })
}

/// Test: list applies owner scoping, filters, sort, and pagination, and the
/// backend sees exactly those query parameters.
#[tokio::test]
async fn list_tasks_sends_filters_sort_and_pagination() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();

    let mock = server
        .mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("user_id".into(), format!("eq.{user_id}")),
            Matcher::UrlEncoded("category".into(), "eq.work".into()),
            Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("offset".into(), "20".into()),
        ]))
        .match_header("apikey", "anon-key")
        .with_body(json!([task_json(task_id, user_id, "Report", "work")]).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let query = Query::new()
        .eq("category", "work")
        .order("created_at", Direction::Desc)
        .limit(10)
        .offset(20);
    let tasks = client.list_tasks(user_id, query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task_id);
    assert_eq!(tasks[0].category, TaskCategory::Work);
}

/// Test: a one-field patch serializes exactly that field, nothing else.
#[tokio::test]
async fn update_task_sends_only_supplied_fields() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();

    let mock = server
        .mock("PATCH", "/rest/v1/tasks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), format!("eq.{task_id}")),
            Matcher::UrlEncoded("user_id".into(), format!("eq.{user_id}")),
        ]))
        .match_body(Matcher::JsonString(r#"{"status":"completed"}"#.to_string()))
        .with_body(json!([task_json(task_id, user_id, "Report", "work")]).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let patch = TaskPatch {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    client.update_task(user_id, task_id, &patch).await.unwrap();
    mock.assert_async().await;
}

/// Test: delete with zero matching rows is still success.
#[tokio::test]
async fn delete_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let task_id = Uuid::new_v4();

    server
        .mock("DELETE", "/rest/v1/tasks")
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server);
    client.delete_task(user_id, task_id).await.unwrap();
    // Same call again: nothing left to delete, still Ok.
    client.delete_task(user_id, task_id).await.unwrap();
}

/// Test: double toggle with a read between returns to the original value.
#[tokio::test]
async fn toggle_completion_round_trips() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let habit_id = Uuid::new_v4();
    let row_id = Uuid::new_v4();
    let date = "2026-01-10";

    // First toggle: no row yet -> insert with completed = true.
    server
        .mock("GET", "/rest/v1/habit_completions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("habit_id".into(), format!("eq.{habit_id}")),
            Matcher::UrlEncoded("date".into(), format!("eq.{date}")),
        ]))
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("POST", "/rest/v1/habit_completions")
        .match_body(Matcher::PartialJsonString(
            json!({ "habit_id": habit_id, "completed": true }).to_string(),
        ))
        .with_body(json!([completion_json(row_id, user_id, habit_id, true)]).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let first = client
        .toggle_completion(user_id, habit_id, date.parse().unwrap())
        .await
        .unwrap();
    assert!(first.completed);

    // Second toggle: row exists -> flag flips back to false.
    server.reset();
    server
        .mock("GET", "/rest/v1/habit_completions")
        .match_query(Matcher::Any)
        .with_body(json!([completion_json(row_id, user_id, habit_id, true)]).to_string())
        .create_async()
        .await;
    server
        .mock("PATCH", "/rest/v1/habit_completions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("id".into(), format!("eq.{row_id}")),
            Matcher::UrlEncoded("user_id".into(), format!("eq.{user_id}")),
        ]))
        .match_body(Matcher::JsonString(r#"{"completed":false}"#.to_string()))
        .with_body(json!([completion_json(row_id, user_id, habit_id, false)]).to_string())
        .create_async()
        .await;

    let second = client
        .toggle_completion(user_id, habit_id, date.parse().unwrap())
        .await
        .unwrap();
    assert!(!second.completed);
}

/// Test: first singleton access inserts the documented defaults; a later
/// access hits the duplicate path and reads the existing row back instead of
/// inserting a second one.
#[tokio::test]
async fn settings_get_or_create_is_single_row() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();
    let row = json!({ "user_id": user_id, "theme": "dark", "language": "en" });

    // Fresh user: the ignore-duplicates insert returns the new row.
    let insert = server
        .mock("POST", "/rest/v1/user_settings")
        .match_header(
            "Prefer",
            "return=representation,resolution=ignore-duplicates",
        )
        .match_body(Matcher::PartialJsonString(
            json!({ "user_id": user_id, "theme": "dark" }).to_string(),
        ))
        .with_body(json!([row]).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let settings = client.get_or_create_settings(user_id).await.unwrap();
    insert.assert_async().await;
    assert_eq!(settings.theme, ThemeMode::Dark);
    assert_eq!(settings.language, "en");

    // Existing user: insert is a no-op with an empty representation, and the
    // follow-up select returns the one existing row.
    server.reset();
    server
        .mock("POST", "/rest/v1/user_settings")
        .with_body("[]")
        .create_async()
        .await;
    let select = server
        .mock("GET", "/rest/v1/user_settings")
        .match_query(Matcher::UrlEncoded("user_id".into(), format!("eq.{user_id}")))
        .with_body(json!([row]).to_string())
        .create_async()
        .await;

    let again = client.get_or_create_settings(user_id).await.unwrap();
    select.assert_async().await;
    assert_eq!(again, settings);
}

/// Test: backend failures surface status and message, unretried.
#[tokio::test]
async fn api_errors_carry_the_backend_message() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    let mock = server
        .mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("JWT expired")
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.list_tasks(user_id, Query::new()).await.unwrap_err();
    match err {
        RemoteError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "JWT expired");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Exactly one request: no retry happened.
    mock.assert_async().await;
}

/// Test: server-side procedures are invoked by user id.
#[tokio::test]
async fn rpc_summary_and_clear() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    server
        .mock("POST", "/rest/v1/rpc/summarize_user_data")
        .match_body(Matcher::JsonString(json!({ "p_user_id": user_id }).to_string()))
        .with_body(
            json!({ "tasks": 3, "habits": 2, "habit_completions": 9, "pomodoro_sessions": 4 })
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/rest/v1/rpc/clear_all_user_data")
        .match_body(Matcher::JsonString(json!({ "p_user_id": user_id }).to_string()))
        .with_body("null")
        .create_async()
        .await;

    let client = client_for(&server);
    let summary = client.summarize_user_data(user_id).await.unwrap();
    assert_eq!(summary.tasks, 3);
    assert_eq!(summary.pomodoro_sessions, 4);
    client.clear_all_user_data(user_id).await.unwrap();
}

/// Test: avatar upload returns the public URL for the stored object.
#[tokio::test]
async fn avatar_upload_returns_public_url() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    let mock = server
        .mock(
            "POST",
            format!("/storage/v1/object/avatars/{user_id}/avatar.png").as_str(),
        )
        .match_header("x-upsert", "true")
        .match_header("content-type", "image/png")
        .with_body(json!({ "Key": "avatars/x" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let url = client
        .upload_avatar(user_id, vec![1, 2, 3], "image/png")
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(
        url,
        format!(
            "{}/storage/v1/object/public/avatars/{user_id}/avatar.png",
            server.url()
        )
    );
}

/// Test: bearer switches from the anon key to the user token after set.
#[tokio::test]
async fn bearer_token_is_used_once_set() {
    let mut server = mockito::Server::new_async().await;
    let user_id = Uuid::new_v4();

    let mock = server
        .mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer user-token")
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server);
    client.set_bearer("user-token");
    client.list_tasks(user_id, Query::new()).await.unwrap();
    mock.assert_async().await;
}
