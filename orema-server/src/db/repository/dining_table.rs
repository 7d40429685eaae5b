//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

pub async fn find_all<'e, E>(
    executor: E,
    establishment_id: i64,
    zone_id: Option<i64>,
) -> RepoResult<Vec<DiningTable>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tables = sqlx::query_as::<_, DiningTable>(
        "SELECT * FROM tables_salle WHERE establishment_id = ?1 AND (?2 IS NULL OR zone_id = ?2) \
         ORDER BY zone_id, number",
    )
    .bind(establishment_id)
    .bind(zone_id)
    .fetch_all(executor)
    .await?;
    Ok(tables)
}

pub async fn find_by_id<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<DiningTable>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let table = sqlx::query_as::<_, DiningTable>(
        "SELECT * FROM tables_salle WHERE id = ? AND establishment_id = ?",
    )
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?;
    Ok(table)
}

pub async fn create<'e, E>(
    executor: E,
    establishment_id: i64,
    data: DiningTableCreate,
) -> RepoResult<DiningTable>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let table = sqlx::query_as::<_, DiningTable>(
        "INSERT INTO tables_salle (establishment_id, zone_id, number, capacity, shape, position_x, position_y, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(establishment_id)
    .bind(data.zone_id)
    .bind(data.number)
    .bind(data.capacity.unwrap_or(4))
    .bind(data.shape.unwrap_or_default())
    .bind(data.position_x.unwrap_or(0.0))
    .bind(data.position_y.unwrap_or(0.0))
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(table)
}

pub async fn update<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    data: DiningTableUpdate,
) -> RepoResult<DiningTable>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DiningTable>(
        "UPDATE tables_salle SET number = COALESCE(?1, number), zone_id = COALESCE(?2, zone_id), \
         capacity = COALESCE(?3, capacity), shape = COALESCE(?4, shape), \
         position_x = COALESCE(?5, position_x), position_y = COALESCE(?6, position_y), \
         is_active = COALESCE(?7, is_active), updated_at = ?8 \
         WHERE id = ?9 AND establishment_id = ?10 RETURNING *",
    )
    .bind(data.number)
    .bind(data.zone_id)
    .bind(data.capacity)
    .bind(data.shape)
    .bind(data.position_x)
    .bind(data.position_y)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

pub async fn set_status<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    status: TableStatus,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE tables_salle SET status = ?, updated_at = ? WHERE id = ? AND establishment_id = ?",
    )
    .bind(status)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .execute(executor)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    Ok(())
}

pub async fn delete<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM tables_salle WHERE id = ? AND establishment_id = ?")
        .bind(id)
        .bind(establishment_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
