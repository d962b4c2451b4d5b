use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use service_core::error::AppError;

use crate::AppState;
use crate::dtos::ai::{
    ExtractKind, ExtractRequest, ExtractResponse, ScanRequest, ScanResponse, TranscribeResponse,
};
use crate::middleware::CurrentSession;
use crate::services::{ContentPart, ImageUrl, PHOTOS_BUCKET, sanitize_suggestions, shape_string_items};
use crate::utils::ValidatedJson;

/// Wall-clock latency of the upstream call, retries included.
pub const LATENCY_HEADER: &str = "x-openai-latency-ms";
/// `hit` when suggestions came from the cache, `miss` otherwise.
pub const CACHE_HEADER: &str = "x-cache";

const SHOPPING_SYSTEM_PROMPT: &str = "You clean grocery notes. Extract only concrete grocery \
items (singular or common label). Remove non-relevant words and chit-chat. Return JSON \
{\"items\":[string]}. Max 30.";

const TOC_SYSTEM_PROMPT: &str = "You clean room notes. Produce one short, clear ToC entry \
capturing the key content. No filler. Return JSON {\"items\": [string]} with exactly one entry.";

const SCAN_SYSTEM_PROMPT: &str = "You are a home inventory vision assistant. Given a household \
room photo, identify distinct, countable items visible. Return a JSON object with an 'items' \
array; each item has: name (concise, generic), category (one of: Painting, Picture frame, \
Furniture, Electronics, Appliance, Lighting, Textiles, Decorative, Tableware, Tools, \
Book/Media, Rug/Carpet, Fixed fitting, Other), and confidence (0..1). Prefer durable assets \
over consumables. Limit to top 12 items. Avoid duplicates. If uncertain, still propose with \
lower confidence.";

const SCAN_USER_PROMPT: &str = "Extract a concise list of household items visible in this \
photo. Respond ONLY with JSON in this shape: {\n  \"items\": [\n    { \"name\": string, \
\"category\": string, \"confidence\": number }\n  ]\n}\n";

/// POST /api/ai/extract
///
/// Cleans a free-form note into discrete items (shopping) or a single ToC
/// line (toc). Unusable model output degrades to an empty list.
pub async fn extract(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<ExtractRequest>,
) -> Result<Response, AppError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("text required")));
    }

    if !state
        .nlp_limiter
        .allow(&format!("nlp:{}", session.household_id))
    {
        return Err(AppError::TooManyRequests(
            "Too Many Requests".to_string(),
            Some(state.nlp_limiter.retry_after_secs()),
        ));
    }

    let (system, user, max_tokens, max_items) = match request.kind {
        ExtractKind::Shopping => (
            SHOPPING_SYSTEM_PROMPT,
            format!("TEXT:\n{text}\nReturn only JSON: {{\"items\":[\"item1\",\"item2\", ...]}}"),
            200,
            30,
        ),
        ExtractKind::Toc => (
            TOC_SYSTEM_PROMPT,
            format!("TEXT:\n{text}\nReturn only JSON: {{\"items\":[\"single cleaned line\"]}}"),
            80,
            1,
        ),
    };

    let outcome = state
        .openai
        .chat_text(&state.config.openai.nlp_model, system, &user, max_tokens)
        .await?;
    let items = shape_string_items(&outcome.content, max_items);

    let mut response = Json(ExtractResponse { items }).into_response();
    response
        .headers_mut()
        .insert(LATENCY_HEADER, HeaderValue::from(outcome.latency_ms));
    Ok(response)
}

/// POST /api/ai/scan
///
/// Proposes inventory items visible in a room photo. Results are cached per
/// (photo, storage path) so a re-open does not re-bill the vision model.
pub async fn scan(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<ScanRequest>,
) -> Result<Response, AppError> {
    if !state
        .scan_limiter
        .allow(&format!("scan:{}", session.household_id))
    {
        return Err(AppError::TooManyRequests(
            "Too Many Requests".to_string(),
            Some(state.scan_limiter.retry_after_secs()),
        ));
    }

    let photo = state
        .db
        .find_photo(request.photo_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Photo not found")))?;
    if photo.household_id != session.household_id || photo.room_id != request.room_id {
        return Err(AppError::Forbidden(anyhow::anyhow!("Forbidden")));
    }

    let cache_enabled = state.config.features.scan_cache;
    if cache_enabled && !request.force {
        if let Some(items) = state
            .db
            .find_scan_cache(photo.id, &photo.storage_path)
            .await
        {
            let mut response = Json(serde_json::json!({ "items": items })).into_response();
            let headers = response.headers_mut();
            headers.insert(CACHE_HEADER, HeaderValue::from_static("hit"));
            headers.insert(LATENCY_HEADER, HeaderValue::from_static("0"));
            return Ok(response);
        }
    }

    let image_url = state
        .storage
        .create_signed_url(PHOTOS_BUCKET, &photo.storage_path)
        .await?;

    let outcome = match state
        .openai
        .chat_vision(
            &state.config.openai.vision_model,
            SCAN_SYSTEM_PROMPT,
            vec![
                ContentPart::Text {
                    text: SCAN_USER_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: image_url },
                },
            ],
            300,
        )
        .await
    {
        Ok(outcome) => outcome,
        Err(AppError::Upstream(_, body)) => {
            return Err(AppError::BadGateway(format!("Vision API error: {}", body)));
        }
        Err(err) => return Err(err),
    };

    let items = sanitize_suggestions(&outcome.content);

    if cache_enabled {
        let cached = serde_json::to_value(&items).unwrap_or_default();
        state
            .db
            .upsert_scan_cache(photo.id, &photo.storage_path, &cached)
            .await;
    }

    tracing::info!(
        household_id = %session.household_id,
        photo_id = %photo.id,
        model = %state.config.openai.vision_model,
        latency_ms = outcome.latency_ms,
        items = items.len(),
        "Photo scan complete"
    );

    let mut response = Json(ScanResponse { items }).into_response();
    let headers = response.headers_mut();
    headers.insert(CACHE_HEADER, HeaderValue::from_static("miss"));
    headers.insert(LATENCY_HEADER, HeaderValue::from(outcome.latency_ms));
    Ok(response)
}

/// POST /api/ai/transcribe
///
/// Sessionless speech-to-text relay, rate limited by client address at the
/// route layer. The body is raw audio, or base64 when `x-base64: 1`.
pub async fn transcribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let filename = headers
        .get("x-filename")
        .and_then(|v| v.to_str().ok())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("audio.{}", audio_extension(&content_type)));

    let is_base64 = headers
        .get("x-base64")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1")
        .unwrap_or(false);
    let audio = if is_base64 {
        BASE64
            .decode(body.as_ref())
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid base64 body: {}", e)))?
    } else {
        body.to_vec()
    };

    if audio.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("No audio")));
    }
    if audio.len() > state.config.openai.stt_max_bytes {
        return Err(AppError::PayloadTooLarge("Audio too large".to_string()));
    }

    let outcome = state
        .openai
        .transcribe(
            &state.config.openai.transcribe_model,
            &filename,
            &content_type,
            audio,
        )
        .await?;

    let mut response = Json(TranscribeResponse { text: outcome.text }).into_response();
    response
        .headers_mut()
        .insert(LATENCY_HEADER, HeaderValue::from(outcome.latency_ms));
    Ok(response)
}

fn audio_extension(content_type: &str) -> &'static str {
    if content_type.contains("ogg") {
        "ogg"
    } else if content_type.contains("mp3") {
        "mp3"
    } else {
        "webm"
    }
}
