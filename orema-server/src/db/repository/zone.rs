//! Zone Repository

use super::{RepoError, RepoResult};
use shared::models::{Zone, ZoneCreate, ZoneUpdate};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

pub async fn find_all<'e, E>(executor: E, establishment_id: i64) -> RepoResult<Vec<Zone>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let zones = sqlx::query_as::<_, Zone>(
        "SELECT * FROM zones WHERE establishment_id = ? ORDER BY display_order, name",
    )
    .bind(establishment_id)
    .fetch_all(executor)
    .await?;
    Ok(zones)
}

pub async fn find_by_id<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<Option<Zone>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let zone = sqlx::query_as::<_, Zone>("SELECT * FROM zones WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .fetch_optional(executor)
        .await?;
    Ok(zone)
}

pub async fn create<'e, E>(executor: E, establishment_id: i64, data: ZoneCreate) -> RepoResult<Zone>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let zone = sqlx::query_as::<_, Zone>(
        "INSERT INTO zones (establishment_id, name, description, color, display_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(establishment_id)
    .bind(data.name)
    .bind(data.description)
    .bind(data.color)
    .bind(data.display_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(zone)
}

pub async fn update<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    data: ZoneUpdate,
) -> RepoResult<Zone>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Zone>(
        "UPDATE zones SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         color = COALESCE(?3, color), display_order = COALESCE(?4, display_order), \
         is_active = COALESCE(?5, is_active), updated_at = ?6 \
         WHERE id = ?7 AND establishment_id = ?8 RETURNING *",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.color)
    .bind(data.display_order)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Zone {id} not found")))
}

pub async fn count_active_tables<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tables_salle WHERE zone_id = ? AND establishment_id = ? AND is_active = 1",
    )
    .bind(id)
    .bind(establishment_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

pub async fn delete<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM zones WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
