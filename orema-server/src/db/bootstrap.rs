//! First-start data
//!
//! An empty database gets one establishment and a SUPER_ADMIN employee
//! taken from [`BootstrapConfig`]. Without a configured password nothing
//! is created.

use shared::models::{Establishment, Role};
use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::core::BootstrapConfig;
use crate::db::repository::{self, employee, establishment};
use crate::utils::AppResult;

/// Returns the establishment created, if any
pub async fn bootstrap_if_empty(
    pool: &SqlitePool,
    config: &BootstrapConfig,
) -> AppResult<Option<Establishment>> {
    if establishment::count(pool).await? > 0 {
        return Ok(None);
    }

    let Some(password) = config.admin_password.as_deref() else {
        tracing::warn!("Empty database and BOOTSTRAP_ADMIN_PASSWORD not set; nobody can log in");
        return Ok(None);
    };

    let password_hash = hash_password(password)?;

    let mut tx = repository::begin(pool).await?;
    let created = establishment::create(&mut *tx, &config.establishment_name).await?;
    employee::create(
        &mut *tx,
        created.id,
        employee::NewEmployee {
            username: config.admin_username.clone(),
            display_name: "Super Admin".to_string(),
            password_hash,
            pin_hash: None,
            role: Role::SuperAdmin,
            allowed_routes: None,
        },
    )
    .await?;
    repository::commit(tx).await?;

    tracing::info!(
        establishment_id = created.id,
        username = %config.admin_username,
        "Bootstrap establishment and super admin created"
    );
    Ok(Some(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn config(password: Option<&str>) -> BootstrapConfig {
        BootstrapConfig {
            establishment_name: "Chez Test".to_string(),
            admin_username: "admin".to_string(),
            admin_password: password.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_creates_once() {
        let db = DbService::in_memory().await.unwrap();
        let created = bootstrap_if_empty(&db.pool, &config(Some("secret123")))
            .await
            .unwrap()
            .expect("should create");
        assert_eq!(created.name, "Chez Test");

        let admin = employee::find_credentials(&db.pool, "admin").await.unwrap().unwrap();
        assert_eq!(admin.employee.role, Role::SuperAdmin);

        let again = bootstrap_if_empty(&db.pool, &config(Some("secret123"))).await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_without_password_skips() {
        let db = DbService::in_memory().await.unwrap();
        assert!(bootstrap_if_empty(&db.pool, &config(None)).await.unwrap().is_none());
        assert_eq!(establishment::count(&db.pool).await.unwrap(), 0);
    }
}
