use axum::{
    Json,
    extract::{Query, State},
};
use service_core::error::AppError;

use crate::AppState;
use crate::dtos::asset::{AssetIdResponse, AssetListQuery, UpsertAssetRequest};
use crate::middleware::CurrentSession;
use crate::models::Asset;
use crate::utils::ValidatedJson;

/// GET /api/assets?room_id=
pub async fn list_assets(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<AssetListQuery>,
) -> Result<Json<Vec<Asset>>, AppError> {
    let assets = state
        .db
        .list_assets(session.household_id, query.room_id)
        .await?;
    Ok(Json(assets))
}

/// POST /api/assets
pub async fn upsert_asset(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<UpsertAssetRequest>,
) -> Result<Json<AssetIdResponse>, AppError> {
    let id = match request.id {
        Some(id) => {
            let updated = state
                .db
                .update_asset(
                    session.household_id,
                    id,
                    &request.name,
                    request.category.as_deref(),
                    request.purchase_price,
                    request.room_id,
                )
                .await?;
            if !updated {
                return Err(AppError::NotFound(anyhow::anyhow!("Not found")));
            }
            id
        }
        None => {
            state
                .db
                .insert_asset(
                    session.household_id,
                    &request.name,
                    request.category.as_deref(),
                    request.purchase_price,
                    request.room_id,
                )
                .await?
        }
    };
    Ok(Json(AssetIdResponse { id }))
}
