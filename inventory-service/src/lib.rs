pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, Request, header},
    middleware::{from_fn, from_fn_with_state, map_response},
    routing::{delete, get, post},
};
use service_core::error::AppError;
use service_core::middleware::{
    method_not_allowed::method_not_allowed_body,
    rate_limit::{SharedSlidingWindow, SlidingWindow, ip_rate_limit_middleware},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use sqlx::PgPool;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Environment, InventoryConfig};
use crate::middleware::session_middleware;
use crate::services::{Database, OpenAiClient, SessionService, StorageClient};

const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub config: InventoryConfig,
    pub db: Database,
    pub sessions: SessionService,
    pub openai: OpenAiClient,
    pub storage: StorageClient,
    pub nlp_limiter: SharedSlidingWindow,
    pub scan_limiter: SharedSlidingWindow,
    pub stt_limiter: SharedSlidingWindow,
}

impl AppState {
    pub fn new(config: InventoryConfig, pool: PgPool) -> Result<Self, AppError> {
        let sessions = SessionService::new(
            &config.session,
            matches!(config.environment, Environment::Prod),
        );
        let openai = OpenAiClient::new(&config.openai)?;
        let storage = StorageClient::new(&config.storage)?;
        let nlp_limiter = SlidingWindow::new(config.rate_limit.nlp_per_minute, RATE_LIMIT_WINDOW);
        let scan_limiter = SlidingWindow::new(config.rate_limit.scan_per_minute, RATE_LIMIT_WINDOW);
        let stt_limiter = SlidingWindow::new(config.rate_limit.stt_per_minute, RATE_LIMIT_WINDOW);

        Ok(Self {
            config,
            db: Database::new(pool),
            sessions,
            openai,
            storage,
            nlp_limiter,
            scan_limiter,
            stt_limiter,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    // No session on these: login issues the cookie, logout must clear an
    // expired one, and the share view is keyed by its token alone.
    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/shopping/shared", get(handlers::shopping::shared_list));

    // Transcription is also sessionless (recorded before login on mobile),
    // so it is throttled by client address instead. The body limit leaves
    // headroom for base64 overhead on top of the raw audio cap.
    let stt_limiter = state.stt_limiter.clone();
    let transcribe_route = Router::new()
        .route("/api/ai/transcribe", post(handlers::ai::transcribe))
        .layer(DefaultBodyLimit::max(state.config.openai.stt_max_bytes * 2))
        .layer(from_fn_with_state(stt_limiter, ip_rate_limit_middleware));

    let protected_routes = Router::new()
        .route("/api/auth/whoami", get(handlers::auth::whoami))
        .route(
            "/api/rooms",
            get(handlers::rooms::list_rooms).post(handlers::rooms::upsert_room),
        )
        .route(
            "/api/rooms/media/upload-url",
            post(handlers::media::create_upload_url),
        )
        .route(
            "/api/rooms/media",
            get(handlers::media::list_media).post(handlers::media::save_media),
        )
        .route(
            "/api/rooms/photos/hero",
            post(handlers::media::set_hero_photo),
        )
        .route(
            "/api/rooms/toc",
            get(handlers::media::list_toc).post(handlers::media::add_toc_entry),
        )
        .route("/api/rooms/:id", get(handlers::rooms::get_room))
        .route(
            "/api/assets",
            get(handlers::assets::list_assets).post(handlers::assets::upsert_asset),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::upsert_task),
        )
        .route("/api/tasks/:id", delete(handlers::tasks::delete_task))
        .route(
            "/api/shopping/lists",
            get(handlers::shopping::list_lists).post(handlers::shopping::create_list),
        )
        .route("/api/shopping/lists/:id", get(handlers::shopping::get_list))
        .route(
            "/api/shopping/items/toggle",
            post(handlers::shopping::toggle_item),
        )
        .route(
            "/api/shopping/meta",
            get(handlers::shopping::list_item_meta).post(handlers::shopping::upsert_item_meta),
        )
        .route(
            "/api/shopping/meta/reset",
            post(handlers::shopping::reset_item_meta),
        )
        .route(
            "/api/storage/redirect",
            get(handlers::media::storage_redirect),
        )
        .route(
            "/api/reports/assets-summary",
            get(handlers::reports::assets_summary),
        )
        .route("/api/ai/extract", post(handlers::ai::extract))
        .route("/api/ai/scan", post(handlers::ai::scan))
        .layer(from_fn_with_state(state.clone(), session_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(transcribe_route)
        .merge(protected_routes)
        .with_state(state.clone())
        .layer(map_response(method_not_allowed_body))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
}

/// Credentialed CORS for the browser frontend. Wildcards cannot carry
/// cookies, so unparseable origins are dropped rather than widened.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-filename"),
            header::HeaderName::from_static("x-base64"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([
            header::HeaderName::from_static(handlers::ai::LATENCY_HEADER),
            header::HeaderName::from_static(handlers::ai::CACHE_HEADER),
        ])
}

/// Service health check
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}
