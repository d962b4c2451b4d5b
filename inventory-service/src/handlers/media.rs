use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use service_core::error::AppError;

use crate::AppState;
use crate::dtos::OkResponse;
use crate::dtos::media::{
    AddTocEntryRequest, MediaKind, MediaListQuery, MediaListResponse, SaveMediaRequest,
    SetHeroRequest, StorageRedirectQuery, TocListQuery, UploadUrlQuery, UploadUrlResponse,
};
use crate::middleware::CurrentSession;
use crate::models::RoomTocEntry;
use crate::utils::ValidatedJson;

/// POST /api/rooms/media/upload-url?kind=&room_id=&filename=
///
/// Mints a signed upload slot; the object body never passes through here.
pub async fn create_upload_url(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<UploadUrlQuery>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let filename = query
        .filename
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| format!("upload-{}", Utc::now().timestamp_millis()));
    let storage_path = format!(
        "{}/rooms/{}/{}",
        session.household_id, query.room_id, filename
    );

    let bucket = query.kind.bucket();
    let upload = state
        .storage
        .create_signed_upload_url(bucket, &storage_path)
        .await?;

    Ok(Json(UploadUrlResponse {
        bucket: bucket.to_string(),
        storage_path,
        signed_url: upload.signed_url,
        token: upload.token,
    }))
}

/// POST /api/rooms/media
///
/// Records an uploaded object against its room.
pub async fn save_media(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<SaveMediaRequest>,
) -> Result<StatusCode, AppError> {
    match request.kind {
        MediaKind::Doc => {
            let title = request.title.as_deref().unwrap_or("Document");
            state
                .db
                .insert_document(
                    session.household_id,
                    request.room_id,
                    title,
                    &request.storage_path,
                    request.caption.as_deref(),
                )
                .await?;
        }
        MediaKind::Photo => {
            state
                .db
                .insert_room_photo(
                    session.household_id,
                    request.room_id,
                    &request.storage_path,
                    request.caption.as_deref(),
                )
                .await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/rooms/media?room_id=
pub async fn list_media(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<MediaListQuery>,
) -> Result<Json<MediaListResponse>, AppError> {
    let (photos, documents) = tokio::try_join!(
        state.db.list_room_photos(session.household_id, query.room_id),
        state
            .db
            .list_room_documents(session.household_id, query.room_id),
    )?;
    Ok(Json(MediaListResponse { photos, documents }))
}

/// POST /api/rooms/photos/hero
pub async fn set_hero_photo(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<SetHeroRequest>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .db
        .set_hero_photo(session.household_id, request.room_id, request.photo_id)
        .await?;
    Ok(Json(OkResponse::new()))
}

/// POST /api/rooms/toc
pub async fn add_toc_entry(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<AddTocEntryRequest>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .db
        .insert_toc_entry(session.household_id, request.room_id, &request.line)
        .await?;
    Ok(Json(OkResponse::new()))
}

/// GET /api/rooms/toc?room_id=
pub async fn list_toc(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<TocListQuery>,
) -> Result<Json<Vec<RoomTocEntry>>, AppError> {
    let entries = state
        .db
        .list_toc_entries(session.household_id, query.room_id)
        .await?;
    Ok(Json(entries))
}

/// GET /api/storage/redirect?bucket=&path=
///
/// 302 to a freshly signed download URL.
pub async fn storage_redirect(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
    Query(query): Query<StorageRedirectQuery>,
) -> Result<Response, AppError> {
    if query.bucket.is_empty() || query.path.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "bucket and path required"
        )));
    }

    let signed = state
        .storage
        .create_signed_url(&query.bucket, &query.path)
        .await?;

    let location = HeaderValue::from_str(&signed)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Invalid signed URL: {}", e)))?;
    let mut response = StatusCode::FOUND.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    Ok(response)
}
