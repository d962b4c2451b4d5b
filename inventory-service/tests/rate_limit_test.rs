mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use inventory_service::build_router;
use tower::util::ServiceExt;

fn transcribe_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ai/transcribe")
        .header(header::CONTENT_TYPE, "audio/webm")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn transcribe_is_throttled_by_client_address() {
    let mut config = common::test_config();
    config.rate_limit.stt_per_minute = 2;
    let state = common::test_state(config);
    let app = build_router(state);

    // The limiter sits in front of the handler, so even rejected bodies
    // spend budget. Without connection info every request keys to the
    // same address.
    for _ in 0..2 {
        let response = app.clone().oneshot(transcribe_request("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app.clone().oneshot(transcribe_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "Too Many Requests");
}

#[tokio::test]
async fn forwarded_addresses_get_their_own_budget() {
    let mut config = common::test_config();
    config.rate_limit.stt_per_minute = 1;
    let state = common::test_state(config);
    let app = build_router(state);

    let first = app
        .clone()
        .oneshot({
            let mut req = transcribe_request("");
            req.headers_mut()
                .insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let exhausted = app
        .clone()
        .oneshot({
            let mut req = transcribe_request("");
            req.headers_mut()
                .insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(exhausted.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app
        .oneshot({
            let mut req = transcribe_request("");
            req.headers_mut()
                .insert("x-forwarded-for", "10.0.0.2".parse().unwrap());
            req
        })
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extract_is_throttled_per_household() {
    let mut config = common::test_config();
    config.rate_limit.nlp_per_minute = 1;
    let state = common::test_state(config);
    let app = build_router(state.clone());
    let cookie = common::session_cookie(&state);

    let extract_request = |cookie: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/ai/extract")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie.to_string())
            .body(Body::from(r#"{"text":"milk and eggs"}"#))
            .unwrap()
    };

    // First call spends the budget and dies at the unreachable upstream.
    let response = app
        .clone()
        .oneshot(extract_request(&cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app.oneshot(extract_request(&cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "60");
}
