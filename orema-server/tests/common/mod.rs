//! Shared fixtures: in-memory database, one establishment, a small catalog.

#![allow(dead_code)]

use orema_server::auth::password::hash_password;
use orema_server::db::DbService;
use orema_server::db::repository::{dining_table, employee, establishment, product, supplement, zone};
use orema_server::{Config, ServerState};
use shared::models::{
    DiningTable, DiningTableCreate, Product, ProductCreate, Role, Supplement, SupplementCreate,
    ZoneCreate,
};
use sqlx::SqlitePool;

pub const PASSWORD: &str = "motdepasse";
pub const PIN: &str = "1234";

pub struct Fixture {
    pub state: ServerState,
    pub establishment_id: i64,
}

impl Fixture {
    pub fn pool(&self) -> &SqlitePool {
        self.state.pool()
    }
}

pub async fn setup() -> Fixture {
    let db = DbService::in_memory().await.expect("in-memory database");
    let created = establishment::create(&db.pool, "Le Petit Bistro")
        .await
        .expect("establishment");
    Fixture {
        state: ServerState::with_pool(Config::for_tests(), db.pool),
        establishment_id: created.id,
    }
}

pub async fn second_establishment(pool: &SqlitePool) -> i64 {
    establishment::create(pool, "Autre Maison").await.unwrap().id
}

pub async fn table(pool: &SqlitePool, establishment_id: i64, number: &str) -> DiningTable {
    dining_table::create(
        pool,
        establishment_id,
        DiningTableCreate {
            number: number.to_string(),
            zone_id: None,
            capacity: Some(4),
            shape: None,
            position_x: None,
            position_y: None,
        },
    )
    .await
    .unwrap()
}

pub async fn zone(pool: &SqlitePool, establishment_id: i64, name: &str) -> i64 {
    zone::create(
        pool,
        establishment_id,
        ZoneCreate {
            name: name.to_string(),
            description: None,
            color: None,
            display_order: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn product(pool: &SqlitePool, establishment_id: i64, name: &str, price: f64, tax_rate: f64) -> Product {
    product::create(
        pool,
        establishment_id,
        ProductCreate {
            name: name.to_string(),
            price,
            tax_rate,
        },
    )
    .await
    .unwrap()
}

pub async fn supplement(pool: &SqlitePool, establishment_id: i64, name: &str, price: f64) -> Supplement {
    supplement::create(
        pool,
        establishment_id,
        SupplementCreate {
            name: name.to_string(),
            price,
        },
    )
    .await
    .unwrap()
}

pub async fn employee(pool: &SqlitePool, establishment_id: i64, username: &str, role: Role) -> i64 {
    employee::create(
        pool,
        establishment_id,
        employee::NewEmployee {
            username: username.to_string(),
            display_name: username.to_uppercase(),
            password_hash: hash_password(PASSWORD).unwrap(),
            pin_hash: Some(hash_password(PIN).unwrap()),
            role,
            allowed_routes: None,
        },
    )
    .await
    .unwrap()
    .id
}
