//! Product Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity (produit)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub establishment_id: i64,
    pub name: String,
    /// Price excluding tax
    pub price: f64,
    /// Percent (10.0 = 10%)
    pub tax_rate: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub tax_rate: f64,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub tax_rate: Option<f64>,
    pub is_active: Option<bool>,
}

/// Catalog supplement (supplément)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplement {
    pub id: i64,
    pub establishment_id: i64,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create supplement payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplementCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Update supplement payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SupplementUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}
