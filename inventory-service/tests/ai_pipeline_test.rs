mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use inventory_service::build_router;
use tower::util::ServiceExt;

fn extract_request(cookie: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ai/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie.to_string())
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn extract_shapes_model_output_into_items() {
    let stub = common::spawn_openai_stub(vec![(
        200,
        common::chat_completion(r#"{"items":["Milk","Eggs",""," "]}"#),
    )])
    .await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(&cookie, r#"{"text":"milk, eggs and stuff"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let latency = response
        .headers()
        .get("x-openai-latency-ms")
        .expect("latency header")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .unwrap();
    assert!(latency < 60_000);
    let body = common::body_json(response).await;
    assert_eq!(body["items"], serde_json::json!(["Milk", "Eggs"]));
    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn extract_toc_keeps_a_single_line() {
    let stub = common::spawn_openai_stub(vec![(
        200,
        common::chat_completion(r#"{"items":["Sofa wall, reading lamp, two bookcases"]}"#),
    )])
    .await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(
            &cookie,
            r#"{"text":"sofa wall with the lamp and bookcases","kind":"toc"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(
        body["items"],
        serde_json::json!(["Sofa wall, reading lamp, two bookcases"])
    );
}

#[tokio::test]
async fn extract_rejects_blank_text_before_spending_budget() {
    let stub = common::spawn_openai_stub(vec![]).await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(&cookie, r#"{"text":"   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "text required");
    assert_eq!(stub.hit_count(), 0);
}

#[tokio::test]
async fn extract_retries_upstream_server_errors() {
    let stub = common::spawn_openai_stub(vec![
        (500, serde_json::json!({"error": "boom"})),
        (500, serde_json::json!({"error": "boom"})),
        (200, common::chat_completion(r#"{"items":["Butter"]}"#)),
    ])
    .await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(&cookie, r#"{"text":"butter"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["items"], serde_json::json!(["Butter"]));
    assert_eq!(stub.hit_count(), 3);
}

#[tokio::test]
async fn extract_passes_client_errors_through_without_retry() {
    let stub = common::spawn_openai_stub(vec![(
        400,
        serde_json::json!({"message": "bad api key"}),
    )])
    .await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(&cookie, r#"{"text":"butter"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("bad api key"));
    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn extract_degrades_to_empty_items_on_prose_output() {
    let stub = common::spawn_openai_stub(vec![(
        200,
        common::chat_completion("Sorry, I cannot help with that."),
    )])
    .await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let response = app
        .oneshot(extract_request(&cookie, r#"{"text":"milk"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["items"], serde_json::json!([]));
}

#[tokio::test]
async fn transcribe_relays_audio_and_returns_text() {
    let stub =
        common::spawn_openai_stub(vec![(200, serde_json::json!({"text": "hello world"}))]).await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/transcribe")
                .header(header::CONTENT_TYPE, "audio/webm")
                .header("x-filename", "note.webm")
                .body(Body::from("fake-audio-bytes"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-openai-latency-ms"));
    let body = common::body_json(response).await;
    assert_eq!(body["text"], "hello world");
    assert_eq!(stub.hit_count(), 1);
}

#[tokio::test]
async fn transcribe_decodes_base64_bodies() {
    let stub = common::spawn_openai_stub(vec![(200, serde_json::json!({"text": "ok"}))]).await;

    let mut config = common::test_config();
    config.openai.base_url = stub.base_url.clone();
    let state = common::test_state(config);
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/transcribe")
                .header(header::CONTENT_TYPE, "audio/ogg")
                .header("x-base64", "1")
                .body(Body::from("aGVsbG8="))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["text"], "ok");
}

#[tokio::test]
async fn transcribe_rejects_invalid_base64() {
    let state = common::test_state(common::test_config());
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/transcribe")
                .header("x-base64", "1")
                .body(Body::from("!!! not base64 !!!"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid base64 body")
    );
}

#[tokio::test]
async fn transcribe_rejects_an_empty_body() {
    let state = common::test_state(common::test_config());
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/transcribe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "No audio");
}

#[tokio::test]
async fn transcribe_rejects_oversized_audio() {
    let mut config = common::test_config();
    config.openai.stt_max_bytes = 4;
    let state = common::test_state(config);
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/ai/transcribe")
                .header(header::CONTENT_TYPE, "audio/webm")
                .body(Body::from("aaaaaaaa"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Audio too large");
}
