//! Shared fixtures for inventory-service integration tests.
//!
//! Configs are built literally (no environment reads) so tests cannot race
//! each other, and the database points at a guaranteed-refused port: the
//! routes under test either never reach PostgreSQL or are expected to
//! tolerate its absence.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use inventory_service::{
    AppState,
    config::{
        DatabaseConfig, Environment, FeatureFlags, InventoryConfig, LoginConfig, OpenAiConfig,
        RateLimitConfig, SecurityConfig, SessionConfig, StorageConfig,
    },
    db::create_lazy_pool,
    services::SESSION_COOKIE,
};
use secrecy::SecretString;
use service_core::config::Config;
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

pub fn test_config() -> InventoryConfig {
    InventoryConfig {
        common: Config::default(),
        environment: Environment::Dev,
        service_name: "inventory-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        database: DatabaseConfig {
            url: "postgres://127.0.0.1:1/inventory_test".to_string(),
            max_connections: 2,
            min_connections: 0,
        },
        storage: StorageConfig {
            url: "http://127.0.0.1:1".to_string(),
            service_key: SecretString::new("test-service-key".to_string()),
            signed_url_ttl_secs: 300,
        },
        openai: OpenAiConfig {
            api_key: SecretString::new("test-api-key".to_string()),
            base_url: "http://127.0.0.1:1/v1".to_string(),
            nlp_model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
            transcribe_model: "gpt-4o-mini-transcribe".to_string(),
            text_timeout_ms: 2_000,
            media_timeout_ms: 2_000,
            stt_max_bytes: 1_000_000,
        },
        session: SessionConfig {
            jwt_secret: SecretString::new("test-session-secret-0123456789abcdef".to_string()),
            ttl_hours: 12,
        },
        login: LoginConfig {
            allowed_emails: vec!["resident@example.com".to_string()],
            passphrase: SecretString::new("household-pass".to_string()),
            household_slug: "old-rectory".to_string(),
        },
        rate_limit: RateLimitConfig {
            nlp_per_minute: 100,
            scan_per_minute: 100,
            stt_per_minute: 100,
        },
        features: FeatureFlags { scan_cache: false },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:8888".to_string()],
        },
    }
}

pub fn test_state(config: InventoryConfig) -> AppState {
    let pool = create_lazy_pool(&config.database).expect("Failed to create lazy pool");
    AppState::new(config, pool).expect("Failed to create app state")
}

/// Mints a session cookie directly, bypassing the login route. The token is
/// self-contained, so protected routes accept it without a database.
pub fn session_cookie(state: &AppState) -> String {
    let token = state
        .sessions
        .issue(Uuid::new_v4(), Uuid::new_v4(), "resident@example.com")
        .expect("Failed to issue session token");
    format!("{}={}", SESSION_COOKIE, token)
}

pub async fn body_text(response: axum::response::Response) -> String {
    use http_body_util::BodyExt;
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).expect("Body is not JSON")
}

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
    replies: Arc<Mutex<VecDeque<(u16, serde_json::Value)>>>,
}

pub struct UpstreamStub {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl UpstreamStub {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Spawns a scripted stand-in for the OpenAI API on an ephemeral port.
/// Each request pops the next `(status, body)` reply; an exhausted script
/// answers 200 with an empty object.
pub async fn spawn_openai_stub(replies: Vec<(u16, serde_json::Value)>) -> UpstreamStub {
    let state = StubState {
        hits: Arc::new(AtomicUsize::new(0)),
        replies: Arc::new(Mutex::new(VecDeque::from(replies))),
    };
    let hits = state.hits.clone();

    let app = Router::new()
        .route("/chat/completions", post(stub_reply))
        .route("/audio/transcriptions", post(stub_reply))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub has no local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server died");
    });

    UpstreamStub {
        base_url: format!("http://{}", addr),
        hits,
    }
}

async fn stub_reply(State(state): State<StubState>) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state
        .replies
        .lock()
        .expect("Stub script lock poisoned")
        .pop_front()
        .unwrap_or((200, serde_json::json!({})));
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
        Json(body),
    )
}

/// Chat completion envelope whose assistant message carries `content`.
pub fn chat_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}
