use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::{TaskPriority, TaskStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertTaskRequest {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
    pub room_id: Option<Uuid>,
    pub asset_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub room_id: Option<Uuid>,
}
