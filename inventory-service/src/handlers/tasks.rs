use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::task::{TaskListQuery, UpsertTaskRequest};
use crate::middleware::CurrentSession;
use crate::models::Task;
use crate::utils::ValidatedJson;

/// GET /api/tasks?room_id=
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state
        .db
        .list_tasks(session.household_id, query.room_id)
        .await?;
    Ok(Json(tasks))
}

/// POST /api/tasks
///
/// Creates when `id` is absent, otherwise patches the addressed row.
pub async fn upsert_task(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(request): ValidatedJson<UpsertTaskRequest>,
) -> Result<StatusCode, AppError> {
    match request.id {
        Some(id) => {
            let updated = state
                .db
                .update_task(session.household_id, id, &request)
                .await?;
            if !updated {
                return Err(AppError::NotFound(anyhow::anyhow!("Not found")));
            }
        }
        None => state.db.insert_task(session.household_id, &request).await?,
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/tasks/:id
///
/// Idempotent: deleting an id that is already gone still answers 204.
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.db.delete_task(session.household_id, id).await?;
    if deleted == 0 {
        tracing::debug!(task_id = %id, "Delete matched no task");
    }
    Ok(StatusCode::NO_CONTENT)
}
