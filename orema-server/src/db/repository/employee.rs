//! Employee Repository (employes)
//!
//! `allowed_routes` is stored as a JSON array in a TEXT column. Hashes never
//! leave this module except through [`EmployeeCredentials`].

use super::{RepoError, RepoResult};
use shared::models::{Employee, Role};
use shared::util::now_millis;
use sqlx::{Executor, FromRow, Sqlite};

#[derive(Debug, Clone, FromRow)]
struct EmployeeRow {
    id: i64,
    establishment_id: i64,
    username: String,
    display_name: String,
    password_hash: String,
    pin_hash: Option<String>,
    role: Role,
    allowed_routes: Option<String>,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

/// Employee plus stored hashes, for login
#[derive(Debug, Clone)]
pub struct EmployeeCredentials {
    pub employee: Employee,
    pub password_hash: String,
    pub pin_hash: Option<String>,
}

/// Insert data; hashes are computed by the caller
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub pin_hash: Option<String>,
    pub role: Role,
    pub allowed_routes: Option<Vec<String>>,
}

/// Column changes; `allowed_routes: Some(None)` clears the whitelist
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
    pub pin_hash: Option<String>,
    pub role: Option<Role>,
    pub allowed_routes: Option<Option<Vec<String>>>,
    pub is_active: Option<bool>,
}

impl EmployeeRow {
    fn into_credentials(self) -> RepoResult<EmployeeCredentials> {
        let allowed_routes = match self.allowed_routes.as_deref() {
            Some(raw) => Some(serde_json::from_str::<Vec<String>>(raw).map_err(|e| {
                RepoError::Database(format!("Invalid allowed_routes for employee {}: {e}", self.id))
            })?),
            None => None,
        };
        let employee = Employee {
            id: self.id,
            establishment_id: self.establishment_id,
            username: self.username,
            display_name: self.display_name,
            role: self.role,
            allowed_routes,
            has_pin: self.pin_hash.is_some(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        Ok(EmployeeCredentials {
            employee,
            password_hash: self.password_hash,
            pin_hash: self.pin_hash,
        })
    }

    fn into_employee(self) -> RepoResult<Employee> {
        self.into_credentials().map(|c| c.employee)
    }
}

fn encode_routes(routes: &Option<Vec<String>>) -> RepoResult<Option<String>> {
    routes
        .as_ref()
        .map(|r| serde_json::to_string(r).map_err(|e| RepoError::Validation(e.to_string())))
        .transpose()
}

pub async fn find_all<'e, E>(executor: E, establishment_id: i64) -> RepoResult<Vec<Employee>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, EmployeeRow>(
        "SELECT * FROM employes WHERE establishment_id = ? ORDER BY username",
    )
    .bind(establishment_id)
    .fetch_all(executor)
    .await?;
    rows.into_iter().map(EmployeeRow::into_employee).collect()
}

pub async fn find_by_id<'e, E>(executor: E, establishment_id: i64, id: i64) -> RepoResult<Option<Employee>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, EmployeeRow>(
        "SELECT * FROM employes WHERE id = ? AND establishment_id = ?",
    )
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?;
    row.map(EmployeeRow::into_employee).transpose()
}

/// Login lookup; usernames are unique across establishments
pub async fn find_credentials<'e, E>(executor: E, username: &str) -> RepoResult<Option<EmployeeCredentials>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, EmployeeRow>(
        "SELECT * FROM employes WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;
    row.map(EmployeeRow::into_credentials).transpose()
}

pub async fn create<'e, E>(executor: E, establishment_id: i64, data: NewEmployee) -> RepoResult<Employee>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = now_millis();
    let routes = encode_routes(&data.allowed_routes)?;
    let row = sqlx::query_as::<_, EmployeeRow>(
        "INSERT INTO employes (establishment_id, username, display_name, password_hash, pin_hash, role, \
         allowed_routes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(establishment_id)
    .bind(data.username)
    .bind(data.display_name)
    .bind(data.password_hash)
    .bind(data.pin_hash)
    .bind(data.role)
    .bind(routes)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await?;
    row.into_employee()
}

pub async fn update<'e, E>(
    executor: E,
    establishment_id: i64,
    id: i64,
    changes: EmployeeChanges,
) -> RepoResult<Employee>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ?6 = 1 means "write ?7 into allowed_routes", NULL included
    let (routes_set, routes) = match &changes.allowed_routes {
        Some(routes) => (true, encode_routes(routes)?),
        None => (false, None),
    };
    let row = sqlx::query_as::<_, EmployeeRow>(
        "UPDATE employes SET display_name = COALESCE(?1, display_name), \
         password_hash = COALESCE(?2, password_hash), pin_hash = COALESCE(?3, pin_hash), \
         role = COALESCE(?4, role), is_active = COALESCE(?5, is_active), \
         allowed_routes = CASE WHEN ?6 THEN ?7 ELSE allowed_routes END, updated_at = ?8 \
         WHERE id = ?9 AND establishment_id = ?10 RETURNING *",
    )
    .bind(changes.display_name)
    .bind(changes.password_hash)
    .bind(changes.pin_hash)
    .bind(changes.role)
    .bind(changes.is_active)
    .bind(routes_set)
    .bind(routes)
    .bind(now_millis())
    .bind(id)
    .bind(establishment_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))?;
    row.into_employee()
}

pub async fn count<'e, E>(executor: E, establishment_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employes WHERE establishment_id = ?")
        .bind(establishment_id)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::establishment;

    fn new_employee(username: &str, routes: Option<Vec<String>>) -> NewEmployee {
        NewEmployee {
            username: username.to_string(),
            display_name: "Marie".to_string(),
            password_hash: "hash".to_string(),
            pin_hash: None,
            role: Role::Caissier,
            allowed_routes: routes,
        }
    }

    #[tokio::test]
    async fn test_allowed_routes_tri_state() {
        let db = DbService::in_memory().await.unwrap();
        let est = establishment::create(&db.pool, "Bistro").await.unwrap();
        let created = create(&db.pool, est.id, new_employee("marie", Some(vec!["/caisse".into()])))
            .await
            .unwrap();
        assert_eq!(created.allowed_routes, Some(vec!["/caisse".to_string()]));

        // None leaves the whitelist untouched
        let kept = update(&db.pool, est.id, created.id, EmployeeChanges {
            display_name: Some("Marie C.".into()),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(kept.display_name, "Marie C.");
        assert_eq!(kept.allowed_routes, Some(vec!["/caisse".to_string()]));

        // Some(Some([])) stores an empty whitelist, distinct from none
        let emptied = update(&db.pool, est.id, created.id, EmployeeChanges {
            allowed_routes: Some(Some(Vec::new())),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(emptied.allowed_routes, Some(Vec::new()));

        let cleared = update(&db.pool, est.id, created.id, EmployeeChanges {
            allowed_routes: Some(None),
            ..Default::default()
        })
        .await
        .unwrap();
        assert_eq!(cleared.allowed_routes, None);
    }

    #[tokio::test]
    async fn test_credentials_and_duplicates() {
        let db = DbService::in_memory().await.unwrap();
        let est = establishment::create(&db.pool, "Bistro").await.unwrap();
        create(&db.pool, est.id, new_employee("marie", None)).await.unwrap();

        let creds = find_credentials(&db.pool, "marie").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "hash");
        assert!(creds.pin_hash.is_none());
        assert!(!creds.employee.has_pin);
        assert!(find_credentials(&db.pool, "inconnu").await.unwrap().is_none());

        let err = create(&db.pool, est.id, new_employee("marie", None)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let other = establishment::create(&db.pool, "Brasserie").await.unwrap();
        let err = create(&db.pool, other.id, new_employee("marie", None)).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = update(&db.pool, est.id, 999, EmployeeChanges::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
