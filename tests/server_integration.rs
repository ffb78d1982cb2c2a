//! Integration tests for the HTTP server over a real socket.

use std::sync::Arc;

use msgboard::{Config, Database, WebServer};

async fn start_server() -> String {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;

    let db = Arc::new(Database::open_in_memory().await.unwrap());
    let server = WebServer::new(&config, db).unwrap();
    let addr = server.run_with_addr().await.unwrap();
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let base = start_server().await;

    let resp = client()
        .get(format!("{}/api/threads/test", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert_eq!(headers.get("x-dns-prefetch-control").unwrap(), "off");
    assert_eq!(headers.get("referrer-policy").unwrap(), "same-origin");
    assert_eq!(resp.text().await.unwrap(), "[]");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let base = start_server().await;

    let resp = client()
        .get(format!("{}/definitely/not/here", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(resp.text().await.unwrap(), "Not Found");
}

#[tokio::test]
async fn test_form_post_redirects() {
    let base = start_server().await;

    let resp = client()
        .post(format!("{}/api/threads/general", base))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("text=hello&delete_password=pw")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/b/general/");
}

#[tokio::test]
async fn test_redirect_escapes_board_name() {
    let base = start_server().await;

    let resp = client()
        .post(format!("{}/api/threads/two%20words", base))
        .header("content-type", "application/json")
        .body(r#"{"text":"hello","delete_password":"pw"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/b/two%20words/");
}
