//! Role Permission Override Repository (permissions_roles)

use std::collections::BTreeSet;

use super::{RepoError, RepoResult};
use shared::models::{Permission, Role};
use shared::util::now_millis;
use sqlx::{Executor, FromRow, Sqlite};

#[derive(Debug, FromRow)]
struct OverrideRow {
    role: Role,
    permissions: String,
}

/// All stored overrides of an establishment
///
/// Strings that no longer name a permission are skipped with a warning.
pub async fn find_overrides<'e, E>(
    executor: E,
    establishment_id: i64,
) -> RepoResult<Vec<(Role, BTreeSet<Permission>)>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, OverrideRow>(
        "SELECT role, permissions FROM permissions_roles WHERE establishment_id = ?",
    )
    .bind(establishment_id)
    .fetch_all(executor)
    .await?;

    rows.into_iter()
        .map(|row| {
            let raw: Vec<String> = serde_json::from_str(&row.permissions).map_err(|e| {
                RepoError::Database(format!("Invalid permissions JSON for {}: {e}", row.role))
            })?;
            let permissions = raw
                .iter()
                .filter_map(|s| match s.parse::<Permission>() {
                    Ok(p) => Some(p),
                    Err(_) => {
                        tracing::warn!(establishment_id, role = %row.role, permission = %s, "Ignoring unknown stored permission");
                        None
                    }
                })
                .collect();
            Ok((row.role, permissions))
        })
        .collect()
}

/// Insert or replace the override of `role`
pub async fn upsert<'e, E>(
    executor: E,
    establishment_id: i64,
    role: Role,
    permissions: &BTreeSet<Permission>,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let names: Vec<&str> = permissions.iter().map(|p| p.as_str()).collect();
    let json = serde_json::to_string(&names).map_err(|e| RepoError::Validation(e.to_string()))?;
    sqlx::query(
        "INSERT INTO permissions_roles (establishment_id, role, permissions, updated_at) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(establishment_id, role) DO UPDATE SET permissions = ?3, updated_at = ?4",
    )
    .bind(establishment_id)
    .bind(role)
    .bind(json)
    .bind(now_millis())
    .execute(executor)
    .await?;
    Ok(())
}

/// Remove the override; returns whether one existed
pub async fn delete<'e, E>(executor: E, establishment_id: i64, role: Role) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM permissions_roles WHERE establishment_id = ? AND role = ?")
        .bind(establishment_id)
        .bind(role)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::establishment;

    #[tokio::test]
    async fn test_upsert_replaces_and_delete_restores() {
        let db = DbService::in_memory().await.unwrap();
        let est = establishment::create(&db.pool, "Bistro").await.unwrap();

        upsert(&db.pool, est.id, Role::Serveur, &BTreeSet::from([Permission::TableVoir]))
            .await
            .unwrap();
        upsert(&db.pool, est.id, Role::Serveur, &BTreeSet::new()).await.unwrap();

        let overrides = find_overrides(&db.pool, est.id).await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].0, Role::Serveur);
        assert!(overrides[0].1.is_empty());

        assert!(delete(&db.pool, est.id, Role::Serveur).await.unwrap());
        assert!(!delete(&db.pool, est.id, Role::Serveur).await.unwrap());
        assert!(find_overrides(&db.pool, est.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_stored_permission_is_skipped() {
        let db = DbService::in_memory().await.unwrap();
        let est = establishment::create(&db.pool, "Bistro").await.unwrap();
        sqlx::query(
            "INSERT INTO permissions_roles (establishment_id, role, permissions, updated_at) VALUES (?, ?, ?, 0)",
        )
        .bind(est.id)
        .bind(Role::Caissier)
        .bind(r#"["vente:voir","obsolete:action"]"#)
        .execute(&db.pool)
        .await
        .unwrap();

        let overrides = find_overrides(&db.pool, est.id).await.unwrap();
        assert_eq!(overrides[0].1, BTreeSet::from([Permission::VenteVoir]));
    }
}
