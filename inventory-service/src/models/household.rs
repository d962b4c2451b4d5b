use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The tenant boundary. Every other record hangs off a household id and
/// every query is scoped by it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Household {
    pub id: Uuid,
    pub slug: String,
}
