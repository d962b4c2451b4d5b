use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::OkResponse;
use crate::dtos::shopping::{
    CreateShoppingListRequest, MetaListQuery, MetaResetQuery, ShareQuery, SharedListDetail,
    ShoppingListDetail, ToggleItemRequest, UpsertItemMetaRequest,
};
use crate::middleware::CurrentSession;
use crate::models::{ShoppingItemMeta, ShoppingList, ShoppingListCreated};
use crate::utils::ValidatedJson;

/// GET /api/shopping/lists
pub async fn list_lists(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<Vec<ShoppingList>>, AppError> {
    let lists = state.db.list_shopping_lists(session.household_id).await?;
    Ok(Json(lists))
}

/// POST /api/shopping/lists
pub async fn create_list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<CreateShoppingListRequest>,
) -> Result<Json<ShoppingListCreated>, AppError> {
    let title = request
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Shopping List");
    let last_bought = request
        .set_last_bought_on_save
        .then(|| Utc::now().date_naive());

    let created = state
        .db
        .create_shopping_list(
            session.household_id,
            title,
            request.description.as_deref(),
            &request.items,
            last_bought,
        )
        .await?;

    tracing::info!(list_id = %created.id, items = request.items.len(), "Shopping list created");
    Ok(Json(created))
}

/// GET /api/shopping/lists/:id
pub async fn get_list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ShoppingListDetail>, AppError> {
    let list = state
        .db
        .find_shopping_list(session.household_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Not found")))?;
    let items = state.db.list_shopping_list_items(list.id).await?;
    Ok(Json(ShoppingListDetail { list, items }))
}

/// POST /api/shopping/items/toggle
///
/// The item row carries no household id, so ownership goes through its list.
pub async fn toggle_item(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<ToggleItemRequest>,
) -> Result<StatusCode, AppError> {
    let item = state
        .db
        .find_shopping_item(request.item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Item not found")))?;

    if !state
        .db
        .household_owns_list(session.household_id, item.list_id)
        .await?
    {
        return Err(AppError::Forbidden(anyhow::anyhow!("Forbidden")));
    }

    state.db.set_item_checked(item.id, request.checked).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/shopping/shared?t=
///
/// Sessionless read-only view; the unguessable token is the capability.
pub async fn shared_list(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<SharedListDetail>, AppError> {
    let list = state
        .db
        .find_list_by_share_token(&query.t)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Not found")))?;
    let items = state.db.list_shared_items(list.id).await?;
    Ok(Json(SharedListDetail { list, items }))
}

/// GET /api/shopping/meta?favorites=1
pub async fn list_item_meta(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<MetaListQuery>,
) -> Result<Json<Vec<ShoppingItemMeta>>, AppError> {
    let mut rows = state.db.list_item_meta(session.household_id).await?;
    if query.favorites.as_deref() == Some("1") {
        rows.retain(|meta| meta.favorite);
    }
    Ok(Json(rows))
}

/// POST /api/shopping/meta
pub async fn upsert_item_meta(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<UpsertItemMetaRequest>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .db
        .upsert_item_meta(
            session.household_id,
            &request.item_key,
            request.favorite,
            request.last_bought,
        )
        .await?;
    Ok(Json(OkResponse::new()))
}

/// POST /api/shopping/meta/reset?scope=all|favorites|dates
pub async fn reset_item_meta(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<MetaResetQuery>,
) -> Result<Json<OkResponse>, AppError> {
    state
        .db
        .reset_item_meta(session.household_id, query.scope)
        .await?;
    Ok(Json(OkResponse::new()))
}
