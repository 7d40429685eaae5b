//! Establishment Repository

use super::RepoResult;
use shared::models::Establishment;
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Establishment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let establishment =
        sqlx::query_as::<_, Establishment>("SELECT * FROM etablissements WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(establishment)
}

pub async fn count<'e, E>(executor: E) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM etablissements")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

pub async fn create<'e, E>(executor: E, name: &str) -> RepoResult<Establishment>
where
    E: Executor<'e, Database = Sqlite>,
{
    let establishment = sqlx::query_as::<_, Establishment>(
        "INSERT INTO etablissements (name, created_at) VALUES (?, ?) RETURNING *",
    )
    .bind(name)
    .bind(now_millis())
    .fetch_one(executor)
    .await?;
    Ok(establishment)
}
