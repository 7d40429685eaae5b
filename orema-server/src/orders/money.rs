//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` (rounded to 2 places, half away from zero) for storage.

use rust_decimal::prelude::*;
use shared::models::{Order, OrderLine};

use crate::db::repository::order::OrderTotals;

const DECIMAL_PLACES: u32 = 2;

/// Amounts of one order line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAmounts {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
}

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

#[inline]
fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = %value, "Decimal out of f64 range, defaulting to zero");
        0.0
    })
}

/// Line amounts: `(unit + Σ supplements) × quantity`, tax on the rounded subtotal
pub fn line_amounts(unit_price: f64, supplement_prices: &[f64], quantity: i32, tax_rate: f64) -> LineAmounts {
    let unit = supplement_prices
        .iter()
        .fold(to_decimal(unit_price), |acc, p| acc + to_decimal(*p));
    let subtotal = round(unit * Decimal::from(quantity));
    let tax = round(subtotal * to_decimal(tax_rate) / Decimal::ONE_HUNDRED);

    LineAmounts {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax),
        total: to_f64(subtotal + tax),
    }
}

/// Order totals re-derived from its lines; total never goes below zero
pub fn order_totals(lines: &[OrderLine], discount_total: f64) -> OrderTotals {
    let subtotal: Decimal = lines.iter().map(|l| to_decimal(l.subtotal)).sum();
    let tax: Decimal = lines.iter().map(|l| to_decimal(l.tax_amount)).sum();
    let discount = to_decimal(discount_total);
    let total = (subtotal + tax - discount).max(Decimal::ZERO);

    OrderTotals {
        subtotal: to_f64(subtotal),
        tax_total: to_f64(tax),
        discount_total: to_f64(discount),
        total: to_f64(total),
    }
}

/// Field-wise sum of two orders' stored totals (merge)
pub fn merged_totals(target: &Order, source: &Order) -> OrderTotals {
    let sum = |a: f64, b: f64| to_f64(to_decimal(a) + to_decimal(b));
    OrderTotals {
        subtotal: sum(target.subtotal, source.subtotal),
        tax_total: sum(target.tax_total, source.tax_total),
        discount_total: sum(target.discount_total, source.discount_total),
        total: sum(target.total, source.total),
    }
}

/// Largest discount an order accepts: subtotal + tax
pub fn max_discount(subtotal: f64, tax_total: f64) -> f64 {
    to_f64(to_decimal(subtotal) + to_decimal(tax_total))
}
