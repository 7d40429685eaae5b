//! Product Repository (produits)

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use sqlx::{Executor, Sqlite};

pub async fn find_all<'e, E>(executor: E, establishment_id: i64) -> RepoResult<Vec<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM produits WHERE establishment_id = ? ORDER BY name",
    )
    .bind(establishment_id)
    .fetch_all(executor)
    .await?;
    Ok(products)
}

pub async fn find_by_id<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let product =
        sqlx::query_as::<_, Product>("SELECT * FROM produits WHERE id = ? AND establishment_id = ?")
            .bind(id)
            .bind(establishment_id)
            .fetch_optional(executor)
            .await?;
    Ok(product)
}

pub async fn create<'e, E>(executor: E, establishment_id: i64, data: ProductCreate) -> RepoResult<Product>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO produits (establishment_id, name, price, tax_rate, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(establishment_id)
    .bind(data.name)
    .bind(data.price)
    .bind(data.tax_rate)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(product)
}

pub async fn update<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<Product>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Product>(
        "UPDATE produits SET name = COALESCE(?1, name), price = COALESCE(?2, price), \
         tax_rate = COALESCE(?3, tax_rate), is_active = COALESCE(?4, is_active), updated_at = ?5 \
         WHERE id = ?6 AND establishment_id = ?7 RETURNING *",
    )
    .bind(data.name)
    .bind(data.price)
    .bind(data.tax_rate)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}
