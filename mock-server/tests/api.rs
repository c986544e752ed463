use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn get_is_echoed() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/items?page=2").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/items");
    assert_eq!(echo.query.as_deref(), Some("page=2"));
    assert!(echo.body.is_empty());
}

#[tokio::test]
async fn post_body_and_headers_are_echoed() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/items", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, r#"{"name":"x"}"#);
    assert_eq!(echo.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn every_method_is_accepted() {
    for method in ["PUT", "DELETE", "OPTIONS", "PATCH", "TRACE"] {
        let resp = app()
            .oneshot(Request::builder().method(method).uri("/any").body(String::new()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{method}");
        let echo: Echo = body_json(resp).await;
        assert_eq!(echo.method, method);
    }
}

#[tokio::test]
async fn status_path_sets_response_status() {
    let resp = app()
        .oneshot(Request::builder().uri("/status/418").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
}

// --- recorded ---

#[tokio::test]
async fn recorded_starts_empty() {
    let resp = app()
        .oneshot(Request::builder().uri("/_recorded").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let recorded: Vec<Echo> = body_json(resp).await;
    assert!(recorded.is_empty());
}

#[tokio::test]
async fn echoes_are_recorded_in_order() {
    let app = app();

    let first = app
        .clone()
        .oneshot(json_request("POST", "/a", "1"))
        .await
        .unwrap();
    let first: Echo = body_json(first).await;
    let second = app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri("/b").body(String::new()).unwrap())
        .await
        .unwrap();
    let second: Echo = body_json(second).await;

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/_recorded").body(String::new()).unwrap())
        .await
        .unwrap();
    let recorded: Vec<Echo> = body_json(resp).await;
    assert_eq!(recorded, vec![first, second]);
}

#[tokio::test]
async fn recorded_can_be_cleared() {
    let app = app();
    app.clone()
        .oneshot(json_request("PUT", "/a", "{}"))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(Request::builder().method("DELETE").uri("/_recorded").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app
        .oneshot(Request::builder().uri("/_recorded").body(String::new()).unwrap())
        .await
        .unwrap();
    let recorded: Vec<Echo> = body_json(resp).await;
    assert!(recorded.is_empty());
}
