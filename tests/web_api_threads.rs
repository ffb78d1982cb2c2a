//! Web API Thread Tests
//!
//! Integration tests for the /api/threads endpoints.

use axum::http::StatusCode;
use axum_test::TestServer;
use msgboard::config::WebConfig;
use msgboard::web::handlers::AppState;
use msgboard::web::router::create_router;
use msgboard::Database;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create a test server with an in-memory database.
async fn create_test_server() -> (TestServer, Arc<Database>) {
    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );
    let app_state = Arc::new(AppState::new(db.clone()));
    let router = create_router(app_state, &WebConfig::default());
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, db)
}

/// Post a thread and return the id of the newest thread on the board.
async fn create_thread(server: &TestServer, board: &str, text: &str, password: &str) -> String {
    let response = server
        .post(&format!("/api/threads/{}", board))
        .json(&json!({ "text": text, "delete_password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let threads = list_threads(server, board).await;
    threads[0]["_id"].as_str().unwrap().to_string()
}

async fn list_threads(server: &TestServer, board: &str) -> Vec<Value> {
    let response = server.get(&format!("/api/threads/{}", board)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Vec<Value>>()
}

async fn reply(server: &TestServer, board: &str, thread_id: &str, text: &str) {
    let response = server
        .post(&format!("/api/replies/{}", board))
        .json(&json!({ "thread_id": thread_id, "text": text, "delete_password": "rp" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_create_thread_redirects_to_board() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "hello", "delete_password": "pw" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/b/test/");
}

#[tokio::test]
async fn test_create_thread_from_form() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/forms")
        .form(&[("text", "posted from a form"), ("delete_password", "pw")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let threads = list_threads(&server, "forms").await;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["text"], "posted from a form");
}

#[tokio::test]
async fn test_create_thread_missing_field() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/threads/test")
        .json(&json!({ "text": "hello" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "missing required field(s): delete_password"
    );
    assert!(list_threads(&server, "test").await.is_empty());
}

#[tokio::test]
async fn test_create_then_list() {
    let (server, _db) = create_test_server().await;

    create_thread(&server, "test", "hello", "pw").await;

    let threads = list_threads(&server, "test").await;
    assert_eq!(threads.len(), 1);

    let thread = threads[0].as_object().unwrap();
    assert_eq!(thread["text"], "hello");
    assert_eq!(thread["replies"], json!([]));
    assert!(thread.contains_key("_id"));
    assert!(thread.contains_key("created_on"));
    assert!(thread.contains_key("bumped_on"));
    assert!(!thread.contains_key("delete_password"));
    assert!(!thread.contains_key("reported"));
}

#[tokio::test]
async fn test_list_unknown_board_is_empty() {
    let (server, _db) = create_test_server().await;

    assert!(list_threads(&server, "nobody-here").await.is_empty());
}

#[tokio::test]
async fn test_boards_are_separate() {
    let (server, _db) = create_test_server().await;

    create_thread(&server, "cats", "meow", "pw").await;
    create_thread(&server, "dogs", "woof", "pw").await;

    let cats = list_threads(&server, "cats").await;
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0]["text"], "meow");
}

#[tokio::test]
async fn test_list_limits_and_orders_threads() {
    let (server, _db) = create_test_server().await;

    for i in 0..12 {
        create_thread(&server, "busy", &format!("thread {i}"), "pw").await;
    }

    let threads = list_threads(&server, "busy").await;
    assert_eq!(threads.len(), 10);
    assert_eq!(threads[0]["text"], "thread 11");

    let bumped: Vec<&str> = threads
        .iter()
        .map(|t| t["bumped_on"].as_str().unwrap())
        .collect();
    let parsed: Vec<chrono::DateTime<chrono::Utc>> =
        bumped.iter().map(|b| b.parse().unwrap()).collect();
    assert!(parsed.windows(2).all(|w| w[0] >= w[1]));

    let texts: Vec<&str> = threads.iter().map(|t| t["text"].as_str().unwrap()).collect();
    assert!(!texts.contains(&"thread 0"));
    assert!(!texts.contains(&"thread 1"));
}

#[tokio::test]
async fn test_reply_bumps_thread_to_top() {
    let (server, _db) = create_test_server().await;

    let old = create_thread(&server, "test", "old", "pw").await;
    create_thread(&server, "test", "new", "pw").await;

    reply(&server, "test", &old, "necro").await;

    let threads = list_threads(&server, "test").await;
    assert_eq!(threads[0]["_id"], old.as_str());
    assert_eq!(threads[0]["replies"][0]["text"], "necro");
}

#[tokio::test]
async fn test_list_previews_three_newest_replies() {
    let (server, _db) = create_test_server().await;

    let thread_id = create_thread(&server, "test", "chatty", "pw").await;
    for i in 1..=5 {
        reply(&server, "test", &thread_id, &format!("reply {i}")).await;
    }

    let threads = list_threads(&server, "test").await;
    let replies = threads[0]["replies"].as_array().unwrap();
    let texts: Vec<&str> = replies.iter().map(|r| r["text"].as_str().unwrap()).collect();
    assert_eq!(texts, vec!["reply 5", "reply 4", "reply 3"]);

    for reply in replies {
        let reply = reply.as_object().unwrap();
        assert!(reply.contains_key("_id"));
        assert!(reply.contains_key("created_on"));
        assert!(!reply.contains_key("delete_password"));
        assert!(!reply.contains_key("reported"));
    }
}

#[tokio::test]
async fn test_delete_thread_wrong_password() {
    let (server, _db) = create_test_server().await;
    let thread_id = create_thread(&server, "test", "hello", "pw").await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({ "thread_id": thread_id, "delete_password": "wrong" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "incorrect password");
    assert_eq!(list_threads(&server, "test").await.len(), 1);
}

#[tokio::test]
async fn test_delete_thread_right_password() {
    let (server, _db) = create_test_server().await;
    let thread_id = create_thread(&server, "test", "hello", "pw").await;

    let response = server
        .delete("/api/threads/test")
        .json(&json!({ "thread_id": thread_id, "delete_password": "pw" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "success");
    assert!(list_threads(&server, "test").await.is_empty());

    let detail = server
        .get("/api/replies/test")
        .add_query_param("thread_id", &thread_id)
        .await;
    assert_eq!(detail.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_thread_is_incorrect_password() {
    let (server, _db) = create_test_server().await;

    for thread_id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = server
            .delete("/api/threads/test")
            .json(&json!({ "thread_id": thread_id, "delete_password": "pw" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "incorrect password");
    }
}

#[tokio::test]
async fn test_report_thread() {
    let (server, db) = create_test_server().await;
    let thread_id = create_thread(&server, "test", "hello", "pw").await;

    for _ in 0..2 {
        let response = server
            .put("/api/threads/test")
            .json(&json!({ "thread_id": thread_id }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "reported");
    }

    let stored = msgboard::ThreadRepository::new(db.pool())
        .get_by_id(thread_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.reported);

    // The flag never leaks into the listing
    let threads = list_threads(&server, "test").await;
    assert!(!threads[0].as_object().unwrap().contains_key("reported"));
}

#[tokio::test]
async fn test_report_unknown_thread() {
    let (server, _db) = create_test_server().await;

    let response = server
        .put("/api/threads/test")
        .json(&json!({ "thread_id": uuid::Uuid::new_v4().to_string() }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "not found");
}
