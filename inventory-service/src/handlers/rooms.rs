use axum::{
    Json,
    extract::{Path, State},
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::room::UpsertRoomRequest;
use crate::middleware::CurrentSession;
use crate::models::Room;
use crate::utils::ValidatedJson;

/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<Room>>, AppError> {
    let rooms = state.db.list_rooms(session.household_id).await?;
    Ok(Json(rooms))
}

/// POST /api/rooms
///
/// Creates when `id` is absent, otherwise rewrites the addressed row.
pub async fn upsert_room(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<UpsertRoomRequest>,
) -> Result<Json<Room>, AppError> {
    let room = match request.id {
        Some(id) => state
            .db
            .update_room(session.household_id, id, &request)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Not found")))?,
        None => state.db.insert_room(session.household_id, &request).await?,
    };
    Ok(Json(room))
}

/// GET /api/rooms/:id
pub async fn get_room(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, AppError> {
    state
        .db
        .find_room(session.household_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Not found")))
}
