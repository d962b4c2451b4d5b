use axum::{Json, extract::State};
use service_core::error::AppError;
use std::collections::HashMap;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::report::AssetsSummaryResponse;
use crate::middleware::CurrentSession;

/// GET /api/reports/assets-summary
///
/// Sums purchase prices per room, per floor, and for the whole house.
/// Assets not assigned to a room are excluded, matching the room list the
/// client renders against.
pub async fn assets_summary(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<AssetsSummaryResponse>, AppError> {
    let rooms = state.db.list_room_headers(session.household_id).await?;
    let room_ids: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();
    let values = state
        .db
        .list_asset_values(session.household_id, &room_ids)
        .await?;

    let mut by_room: HashMap<Uuid, f64> = HashMap::new();
    for value in values {
        let amount = value.purchase_price.unwrap_or(0.0);
        if amount.is_finite() {
            *by_room.entry(value.room_id).or_insert(0.0) += amount;
        }
    }

    let mut by_floor: HashMap<String, f64> = HashMap::new();
    let mut by_house = 0.0;
    for room in &rooms {
        let room_total = by_room.get(&room.id).copied().unwrap_or(0.0);
        by_house += room_total;
        let floor = room.floor.clone().unwrap_or_else(|| "Unknown".to_string());
        *by_floor.entry(floor).or_insert(0.0) += room_total;
    }

    Ok(Json(AssetsSummaryResponse {
        by_room,
        by_floor,
        by_house,
        rooms,
    }))
}
