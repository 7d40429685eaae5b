//! Supplement Repository

use super::{RepoError, RepoResult};
use shared::models::{Supplement, SupplementCreate, SupplementUpdate};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

pub async fn find_all<'e, E>(executor: E, establishment_id: i64) -> RepoResult<Vec<Supplement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let supplements = sqlx::query_as::<_, Supplement>(
        "SELECT * FROM supplements WHERE establishment_id = ? ORDER BY name",
    )
    .bind(establishment_id)
    .fetch_all(executor)
    .await?;
    Ok(supplements)
}

pub async fn find_by_id<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
) -> RepoResult<Option<Supplement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let supplement =
        sqlx::query_as::<_, Supplement>("SELECT * FROM supplements WHERE id = ? AND establishment_id = ?")
            .bind(id)
            .bind(establishment_id)
            .fetch_optional(executor)
            .await?;
    Ok(supplement)
}

pub async fn create<'e, E>(
    executor: E,
    establishment_id: i64,
    data: SupplementCreate,
) -> RepoResult<Supplement>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let supplement = sqlx::query_as::<_, Supplement>(
        "INSERT INTO supplements (establishment_id, name, price, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(establishment_id)
    .bind(data.name)
    .bind(data.price)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(supplement)
}

pub async fn update<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    data: SupplementUpdate,
) -> RepoResult<Supplement>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Supplement>(
        "UPDATE supplements SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
         is_active = COALESCE(?3, is_active), updated_at = ?4 \
         WHERE id = ?5 AND establishment_id = ?6 RETURNING *",
    )
    .bind(data.name)
    .bind(data.price)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Supplement {id} not found")))
}
