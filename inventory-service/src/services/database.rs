//! All PostgreSQL access. Every query that touches household data binds the
//! session's household id; the tenant is never taken from request input.

use chrono::NaiveDate;
use serde_json::Value;
use service_core::error::AppError;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dtos::room::UpsertRoomRequest;
use crate::dtos::shopping::{ResetScope, ShoppingListItemInput};
use crate::dtos::task::UpsertTaskRequest;
use crate::models::{
    Asset, AssetValue, Document, Household, PhotoRef, Room, RoomHeader, RoomPhoto, RoomTocEntry,
    SharedList, SharedListItem, ShoppingItemMeta, ShoppingItemRef, ShoppingList,
    ShoppingListCreated, ShoppingListHeader, ShoppingListItem, Task,
};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

#[derive(FromRow)]
struct ScanCacheRow {
    items: Value,
}

#[derive(FromRow)]
struct IdRow {
    id: Uuid,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Household Operations ====================

    pub async fn find_household_by_slug(&self, slug: &str) -> Result<Option<Household>, AppError> {
        sqlx::query_as::<_, Household>("SELECT id, slug FROM households WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Room Operations ====================

    pub async fn list_rooms(&self, household_id: Uuid) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>(
            "SELECT id, name, floor, dimensions, notes, created_at
             FROM rooms WHERE household_id = $1 ORDER BY name ASC",
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn find_room(&self, household_id: Uuid, id: Uuid) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>(
            "SELECT id, name, floor, dimensions, notes, created_at
             FROM rooms WHERE household_id = $1 AND id = $2",
        )
        .bind(household_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn insert_room(
        &self,
        household_id: Uuid,
        req: &UpsertRoomRequest,
    ) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (household_id, name, floor, dimensions, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, floor, dimensions, notes, created_at",
        )
        .bind(household_id)
        .bind(&req.name)
        .bind(&req.floor)
        .bind(&req.dimensions)
        .bind(&req.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn update_room(
        &self,
        household_id: Uuid,
        id: Uuid,
        req: &UpsertRoomRequest,
    ) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET name = $3, floor = $4, dimensions = $5, notes = $6
             WHERE household_id = $1 AND id = $2
             RETURNING id, name, floor, dimensions, notes, created_at",
        )
        .bind(household_id)
        .bind(id)
        .bind(&req.name)
        .bind(&req.floor)
        .bind(&req.dimensions)
        .bind(&req.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Asset Operations ====================

    pub async fn list_assets(
        &self,
        household_id: Uuid,
        room_id: Option<Uuid>,
    ) -> Result<Vec<Asset>, AppError> {
        sqlx::query_as::<_, Asset>(
            "SELECT id, name, category, purchase_price::float8 AS purchase_price, room_id
             FROM assets
             WHERE household_id = $1 AND ($2::uuid IS NULL OR room_id = $2)
             ORDER BY created_at DESC",
        )
        .bind(household_id)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn insert_asset(
        &self,
        household_id: Uuid,
        name: &str,
        category: Option<&str>,
        purchase_price: Option<f64>,
        room_id: Option<Uuid>,
    ) -> Result<Uuid, AppError> {
        let row = sqlx::query_as::<_, IdRow>(
            "INSERT INTO assets (household_id, name, category, purchase_price, room_id)
             VALUES ($1, $2, $3, $4::float8, $5)
             RETURNING id",
        )
        .bind(household_id)
        .bind(name)
        .bind(category)
        .bind(purchase_price)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(row.id)
    }

    /// Name, category and price are always overwritten; the room assignment
    /// is kept when not resent.
    pub async fn update_asset(
        &self,
        household_id: Uuid,
        id: Uuid,
        name: &str,
        category: Option<&str>,
        purchase_price: Option<f64>,
        room_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE assets
             SET name = $3, category = $4, purchase_price = $5::float8,
                 room_id = COALESCE($6, room_id)
             WHERE household_id = $1 AND id = $2",
        )
        .bind(household_id)
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(purchase_price)
        .bind(room_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== Task Operations ====================

    pub async fn list_tasks(
        &self,
        household_id: Uuid,
        room_id: Option<Uuid>,
    ) -> Result<Vec<Task>, AppError> {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, description, priority, due_date, status, room_id, asset_id, created_at
             FROM tasks
             WHERE household_id = $1 AND ($2::uuid IS NULL OR room_id = $2)
             ORDER BY created_at DESC",
        )
        .bind(household_id)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn insert_task(
        &self,
        household_id: Uuid,
        req: &UpsertTaskRequest,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tasks (household_id, title, description, priority, due_date, status, room_id, asset_id)
             VALUES ($1, $2, $3, COALESCE($4, 'normal'), $5, COALESCE($6, 'open'), $7, $8)",
        )
        .bind(household_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.priority.map(|p| p.as_str()))
        .bind(req.due_date)
        .bind(req.status.map(|s| s.as_str()))
        .bind(req.room_id)
        .bind(req.asset_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Patches only the provided fields; absent ones keep their stored values.
    pub async fn update_task(
        &self,
        household_id: Uuid,
        id: Uuid,
        req: &UpsertTaskRequest,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tasks
             SET title = $3, description = COALESCE($4, description),
                 priority = COALESCE($5, priority), due_date = COALESCE($6, due_date),
                 status = COALESCE($7, status), room_id = COALESCE($8, room_id),
                 asset_id = COALESCE($9, asset_id)
             WHERE household_id = $1 AND id = $2",
        )
        .bind(household_id)
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.priority.map(|p| p.as_str()))
        .bind(req.due_date)
        .bind(req.status.map(|s| s.as_str()))
        .bind(req.room_id)
        .bind(req.asset_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_task(&self, household_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE household_id = $1 AND id = $2")
            .bind(household_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected())
    }

    // ==================== Shopping List Operations ====================

    pub async fn list_shopping_lists(
        &self,
        household_id: Uuid,
    ) -> Result<Vec<ShoppingList>, AppError> {
        sqlx::query_as::<_, ShoppingList>(
            "SELECT id, title, description, created_at
             FROM shopping_lists WHERE household_id = $1 ORDER BY created_at DESC",
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Creates the list, its items, and (optionally) today's `last_bought`
    /// stamps in one transaction.
    pub async fn create_shopping_list(
        &self,
        household_id: Uuid,
        title: &str,
        description: Option<&str>,
        items: &[ShoppingListItemInput],
        last_bought: Option<NaiveDate>,
    ) -> Result<ShoppingListCreated, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        let created = sqlx::query_as::<_, ShoppingListCreated>(
            "INSERT INTO shopping_lists (household_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING id, share_token, description",
        )
        .bind(household_id)
        .bind(title)
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        for item in items {
            sqlx::query(
                "INSERT INTO shopping_list_items (list_id, item_key, name, source)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(created.id)
            .bind(&item.id)
            .bind(&item.name)
            .bind(&item.source)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

            if let Some(date) = last_bought {
                sqlx::query(
                    "INSERT INTO shopping_item_meta (household_id, item_key, last_bought)
                     VALUES ($1, $2, $3)
                     ON CONFLICT (household_id, item_key)
                     DO UPDATE SET last_bought = EXCLUDED.last_bought",
                )
                .bind(household_id)
                .bind(&item.id)
                .bind(date)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(created)
    }

    pub async fn find_shopping_list(
        &self,
        household_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ShoppingListHeader>, AppError> {
        sqlx::query_as::<_, ShoppingListHeader>(
            "SELECT id, title, created_at
             FROM shopping_lists WHERE household_id = $1 AND id = $2",
        )
        .bind(household_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_shopping_list_items(
        &self,
        list_id: Uuid,
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        sqlx::query_as::<_, ShoppingListItem>(
            "SELECT id, item_key, name, source, checked
             FROM shopping_list_items WHERE list_id = $1 ORDER BY created_at ASC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Unscoped item lookup; the caller must verify list ownership before
    /// acting on the result.
    pub async fn find_shopping_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<ShoppingItemRef>, AppError> {
        sqlx::query_as::<_, ShoppingItemRef>(
            "SELECT id, list_id FROM shopping_list_items WHERE id = $1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn household_owns_list(
        &self,
        household_id: Uuid,
        list_id: Uuid,
    ) -> Result<bool, AppError> {
        let row = sqlx::query_as::<_, IdRow>(
            "SELECT id FROM shopping_lists WHERE household_id = $1 AND id = $2",
        )
        .bind(household_id)
        .bind(list_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(row.is_some())
    }

    pub async fn set_item_checked(&self, item_id: Uuid, checked: bool) -> Result<(), AppError> {
        sqlx::query("UPDATE shopping_list_items SET checked = $2 WHERE id = $1")
            .bind(item_id)
            .bind(checked)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn find_list_by_share_token(
        &self,
        token: &str,
    ) -> Result<Option<SharedList>, AppError> {
        sqlx::query_as::<_, SharedList>(
            "SELECT id, title, description, created_at
             FROM shopping_lists WHERE share_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_shared_items(&self, list_id: Uuid) -> Result<Vec<SharedListItem>, AppError> {
        sqlx::query_as::<_, SharedListItem>(
            "SELECT id, name, source, checked
             FROM shopping_list_items WHERE list_id = $1 ORDER BY created_at ASC",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Shopping Item Meta Operations ====================

    pub async fn list_item_meta(
        &self,
        household_id: Uuid,
    ) -> Result<Vec<ShoppingItemMeta>, AppError> {
        sqlx::query_as::<_, ShoppingItemMeta>(
            "SELECT item_key, favorite, last_bought
             FROM shopping_item_meta WHERE household_id = $1
             ORDER BY last_bought DESC NULLS LAST",
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Patch-style upsert: absent fields keep their stored value.
    pub async fn upsert_item_meta(
        &self,
        household_id: Uuid,
        item_key: &str,
        favorite: Option<bool>,
        last_bought: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO shopping_item_meta (household_id, item_key, favorite, last_bought)
             VALUES ($1, $2, COALESCE($3, false), $4)
             ON CONFLICT (household_id, item_key)
             DO UPDATE SET favorite = COALESCE($3, shopping_item_meta.favorite),
                           last_bought = COALESCE($4, shopping_item_meta.last_bought)",
        )
        .bind(household_id)
        .bind(item_key)
        .bind(favorite)
        .bind(last_bought)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn reset_item_meta(
        &self,
        household_id: Uuid,
        scope: ResetScope,
    ) -> Result<(), AppError> {
        let sql = match scope {
            ResetScope::All => {
                "UPDATE shopping_item_meta SET favorite = false, last_bought = NULL
                 WHERE household_id = $1"
            }
            ResetScope::Favorites => {
                "UPDATE shopping_item_meta SET favorite = false WHERE household_id = $1"
            }
            ResetScope::Dates => {
                "UPDATE shopping_item_meta SET last_bought = NULL WHERE household_id = $1"
            }
        };
        sqlx::query(sql)
            .bind(household_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Room Media Operations ====================

    pub async fn list_room_photos(
        &self,
        household_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<RoomPhoto>, AppError> {
        sqlx::query_as::<_, RoomPhoto>(
            "SELECT id, storage_path, caption, created_at
             FROM room_photos WHERE household_id = $1 AND room_id = $2
             ORDER BY created_at DESC",
        )
        .bind(household_id)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_room_documents(
        &self,
        household_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<Document>, AppError> {
        sqlx::query_as::<_, Document>(
            "SELECT id, title, storage_path, uploaded_at
             FROM documents WHERE household_id = $1 AND room_id = $2
             ORDER BY uploaded_at DESC",
        )
        .bind(household_id)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn insert_room_photo(
        &self,
        household_id: Uuid,
        room_id: Uuid,
        storage_path: &str,
        caption: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO room_photos (household_id, room_id, storage_path, caption)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(household_id)
        .bind(room_id)
        .bind(storage_path)
        .bind(caption)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn insert_document(
        &self,
        household_id: Uuid,
        room_id: Uuid,
        title: &str,
        storage_path: &str,
        notes: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO documents (household_id, room_id, title, storage_path, notes)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(household_id)
        .bind(room_id)
        .bind(title)
        .bind(storage_path)
        .bind(notes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn find_photo(&self, photo_id: Uuid) -> Result<Option<PhotoRef>, AppError> {
        sqlx::query_as::<_, PhotoRef>(
            "SELECT id, household_id, room_id, storage_path FROM room_photos WHERE id = $1",
        )
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Makes `photo_id` the room's single hero image.
    pub async fn set_hero_photo(
        &self,
        household_id: Uuid,
        room_id: Uuid,
        photo_id: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        sqlx::query(
            "UPDATE room_photos SET is_hero = false WHERE household_id = $1 AND room_id = $2",
        )
        .bind(household_id)
        .bind(room_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        sqlx::query(
            "UPDATE room_photos SET is_hero = true
             WHERE household_id = $1 AND room_id = $2 AND id = $3",
        )
        .bind(household_id)
        .bind(room_id)
        .bind(photo_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn insert_toc_entry(
        &self,
        household_id: Uuid,
        room_id: Uuid,
        line: &str,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO room_toc (household_id, room_id, line) VALUES ($1, $2, $3)")
            .bind(household_id)
            .bind(room_id)
            .bind(line)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    pub async fn list_toc_entries(
        &self,
        household_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<RoomTocEntry>, AppError> {
        sqlx::query_as::<_, RoomTocEntry>(
            "SELECT id, line, position, created_at
             FROM room_toc WHERE household_id = $1 AND room_id = $2
             ORDER BY position ASC",
        )
        .bind(household_id)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Scan Cache Operations ====================
    //
    // The cache is best-effort: lookups and writes never fail a scan, and a
    // deployment without the cache table degrades to cache misses.

    pub async fn find_scan_cache(&self, photo_id: Uuid, storage_path: &str) -> Option<Value> {
        let result = sqlx::query_as::<_, ScanCacheRow>(
            "SELECT items FROM room_photo_scan_cache
             WHERE photo_id = $1 AND storage_path = $2",
        )
        .bind(photo_id)
        .bind(storage_path)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => row.map(|r| r.items),
            Err(err) => {
                log_scan_cache_error("lookup", &err);
                None
            }
        }
    }

    pub async fn upsert_scan_cache(&self, photo_id: Uuid, storage_path: &str, items: &Value) {
        let result = sqlx::query(
            "INSERT INTO room_photo_scan_cache (photo_id, storage_path, items)
             VALUES ($1, $2, $3)
             ON CONFLICT (photo_id, storage_path) DO UPDATE SET items = EXCLUDED.items",
        )
        .bind(photo_id)
        .bind(storage_path)
        .bind(items)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            log_scan_cache_error("write", &err);
        }
    }

    // ==================== Report Operations ====================

    pub async fn list_room_headers(&self, household_id: Uuid) -> Result<Vec<RoomHeader>, AppError> {
        sqlx::query_as::<_, RoomHeader>(
            "SELECT id, name, floor FROM rooms WHERE household_id = $1",
        )
        .bind(household_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_asset_values(
        &self,
        household_id: Uuid,
        room_ids: &[Uuid],
    ) -> Result<Vec<AssetValue>, AppError> {
        sqlx::query_as::<_, AssetValue>(
            "SELECT room_id, purchase_price::float8 AS purchase_price
             FROM assets WHERE household_id = $1 AND room_id = ANY($2)",
        )
        .bind(household_id)
        .bind(room_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }
}

fn log_scan_cache_error(op: &str, err: &sqlx::Error) {
    if err.to_string().to_lowercase().contains("does not exist") {
        tracing::debug!(op, "Scan cache table not provisioned, skipping");
    } else {
        tracing::warn!(op, error = %err, "Scan cache access failed");
    }
}
