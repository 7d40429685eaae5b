//! Order Model (vente)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderType {
    #[default]
    DineIn,
    Takeaway,
    Delivery,
    Direct,
}

/// Order status
///
/// `Paid` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    InProgress,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::InProgress)
    }
}

/// Kitchen preparation status of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PreparationStatus {
    #[default]
    Pending,
    InPreparation,
    Ready,
    Served,
}

/// Payment method (moyen de paiement)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    Cash,
    Card,
    Cheque,
    MealVoucher,
    Other,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub establishment_id: i64,
    /// Sequential per establishment
    pub ticket_number: i64,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub table_id: Option<i64>,
    pub subtotal: f64,
    pub tax_total: f64,
    pub discount_total: f64,
    pub total: f64,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub opened_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub closed_at: Option<i64>,
}

/// Order line (ligne de vente)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Product name at the time of sale
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    /// Percent (10.0 = 10%)
    pub tax_rate: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub preparation_status: PreparationStatus,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// Supplement attached to a line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LineSupplement {
    pub id: i64,
    pub line_id: i64,
    /// Catalog supplement, if the supplement came from the catalog
    pub supplement_id: Option<i64>,
    pub name: String,
    pub price: f64,
}

/// Line with its supplements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineDetail {
    #[serde(flatten)]
    pub line: OrderLine,
    pub supplements: Vec<LineSupplement>,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLineDetail>,
}

/// Open order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderOpen {
    pub table_id: Option<i64>,
    pub order_type: Option<OrderType>,
    pub notes: Option<String>,
}

/// Add line payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLineCreate {
    pub product_id: i64,
    #[validate(range(min = 1, max = 999))]
    pub quantity: i32,
    /// Catalog supplement ids
    #[serde(default)]
    pub supplement_ids: Vec<i64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Change a line's preparation status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineStatusUpdate {
    pub preparation_status: PreparationStatus,
}

/// Apply a discount amount to an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderDiscount {
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

/// Pay an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPay {
    pub payment_method: PaymentMethod,
}

/// Order list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
}
