//! Order lifecycle: open, lines, discount, pay, cancel

mod common;

use common::{Fixture, product, setup, supplement, table};
use orema_server::db::DbService;
use orema_server::db::repository::{dining_table, establishment, order};
use orema_server::orders;
use shared::error::ErrorCode;
use shared::models::{
    OrderLineCreate, OrderOpen, OrderStatus, OrderType, PaymentMethod, TableStatus,
};

fn line(product_id: i64, quantity: i32, supplement_ids: Vec<i64>) -> OrderLineCreate {
    OrderLineCreate {
        product_id,
        quantity,
        supplement_ids,
        notes: None,
    }
}

async fn open_at_table(fx: &Fixture, table_id: i64) -> i64 {
    orders::open_order(
        fx.pool(),
        fx.establishment_id,
        None,
        OrderOpen {
            table_id: Some(table_id),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

async fn table_status(fx: &Fixture, table_id: i64) -> TableStatus {
    dining_table::find_by_id(fx.pool(), fx.establishment_id, table_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn test_open_order_occupies_table() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "5").await;

    let opened = orders::open_order(
        fx.pool(),
        fx.establishment_id,
        None,
        OrderOpen {
            table_id: Some(t1.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(opened.status, OrderStatus::InProgress);
    assert_eq!(opened.order_type, OrderType::DineIn);
    assert_eq!(opened.total, 0.0);
    assert_eq!(table_status(&fx, t1.id).await, TableStatus::Occupied);
}

#[tokio::test]
async fn test_ticket_numbers_are_sequential() {
    let fx = setup().await;
    let first = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap();
    let second = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap();

    assert_eq!(first.order_type, OrderType::Direct);
    assert_eq!(second.ticket_number, first.ticket_number + 1);
}

#[tokio::test]
async fn test_open_on_occupied_table_is_rejected() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "5").await;
    open_at_table(&fx, t1.id).await;

    let err = orders::open_order(
        fx.pool(),
        fx.establishment_id,
        None,
        OrderOpen {
            table_id: Some(t1.id),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableOccupied);
}

#[tokio::test]
async fn test_line_amounts_include_supplements() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "5").await;
    let burger = product(fx.pool(), fx.establishment_id, "Burger", 12.5, 10.0).await;
    let bacon = supplement(fx.pool(), fx.establishment_id, "Bacon", 2.0).await;
    let order_id = open_at_table(&fx, t1.id).await;

    let detail = orders::add_line(fx.pool(), fx.establishment_id, order_id, line(burger.id, 2, vec![bacon.id]))
        .await
        .unwrap();

    assert_eq!(detail.lines.len(), 1);
    let added = &detail.lines[0];
    assert_eq!(added.line.product_name, "Burger");
    assert_eq!(added.line.subtotal, 29.0);
    assert_eq!(added.line.tax_amount, 2.9);
    assert_eq!(added.line.total, 31.9);
    assert_eq!(added.supplements.len(), 1);

    assert_eq!(detail.order.subtotal, 29.0);
    assert_eq!(detail.order.tax_total, 2.9);
    assert_eq!(detail.order.total, 31.9);
}

#[tokio::test]
async fn test_remove_line_recomputes_totals() {
    let fx = setup().await;
    let cafe = product(fx.pool(), fx.establishment_id, "Café", 2.0, 10.0).await;
    let tarte = product(fx.pool(), fx.establishment_id, "Tarte", 6.0, 10.0).await;
    let order_id = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap()
        .id;
    orders::add_line(fx.pool(), fx.establishment_id, order_id, line(cafe.id, 1, vec![]))
        .await
        .unwrap();
    let detail = orders::add_line(fx.pool(), fx.establishment_id, order_id, line(tarte.id, 1, vec![]))
        .await
        .unwrap();
    let tarte_line = detail
        .lines
        .iter()
        .find(|l| l.line.product_id == tarte.id)
        .unwrap()
        .line
        .id;

    let detail = orders::remove_line(fx.pool(), fx.establishment_id, order_id, tarte_line)
        .await
        .unwrap();
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.order.total, 2.2);

    let err = orders::remove_line(fx.pool(), fx.establishment_id, order_id, tarte_line)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderLineNotFound);
}

#[tokio::test]
async fn test_inactive_product_cannot_be_sold() {
    let fx = setup().await;
    let order_id = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap()
        .id;

    let err = orders::add_line(fx.pool(), fx.establishment_id, order_id, line(4_242, 1, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
}

#[tokio::test]
async fn test_discount_is_bounded_by_order_amount() {
    let fx = setup().await;
    let plat = product(fx.pool(), fx.establishment_id, "Plat", 10.0, 10.0).await;
    let order_id = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap()
        .id;
    orders::add_line(fx.pool(), fx.establishment_id, order_id, line(plat.id, 1, vec![]))
        .await
        .unwrap();

    let err = orders::apply_discount(fx.pool(), fx.establishment_id, order_id, 20.0)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderDiscountTooLarge);

    let discounted = orders::apply_discount(fx.pool(), fx.establishment_id, order_id, 1.0)
        .await
        .unwrap();
    assert_eq!(discounted.discount_total, 1.0);
    assert_eq!(discounted.total, 10.0);
}

#[tokio::test]
async fn test_pay_closes_order_and_table_needs_cleaning() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "5").await;
    let cafe = product(fx.pool(), fx.establishment_id, "Café", 2.0, 10.0).await;
    let order_id = open_at_table(&fx, t1.id).await;
    orders::add_line(fx.pool(), fx.establishment_id, order_id, line(cafe.id, 2, vec![]))
        .await
        .unwrap();

    let paid = orders::pay_order(fx.pool(), fx.establishment_id, order_id, PaymentMethod::Card)
        .await
        .unwrap();

    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Card));
    assert!(paid.closed_at.is_some());
    assert_eq!(table_status(&fx, t1.id).await, TableStatus::NeedsCleaning);
    assert!(
        order::find_open_by_table(fx.pool(), fx.establishment_id, t1.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_closed_orders_reject_changes() {
    let fx = setup().await;
    let cafe = product(fx.pool(), fx.establishment_id, "Café", 2.0, 10.0).await;
    let order_id = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap()
        .id;
    orders::pay_order(fx.pool(), fx.establishment_id, order_id, PaymentMethod::Cash)
        .await
        .unwrap();

    let err = orders::add_line(fx.pool(), fx.establishment_id, order_id, line(cafe.id, 1, vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotInProgress);

    let err = orders::cancel_order(fx.pool(), fx.establishment_id, order_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotInProgress);
}

#[tokio::test]
async fn test_cancel_frees_table() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "5").await;
    let order_id = open_at_table(&fx, t1.id).await;

    let cancelled = orders::cancel_order(fx.pool(), fx.establishment_id, order_id)
        .await
        .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(table_status(&fx, t1.id).await, TableStatus::Free);
}

#[tokio::test]
async fn test_orders_are_scoped_to_establishment() {
    let fx = setup().await;
    let other = common::second_establishment(fx.pool()).await;
    let order_id = orders::open_order(fx.pool(), fx.establishment_id, None, OrderOpen::default())
        .await
        .unwrap()
        .id;

    let err = orders::get_detail(fx.pool(), other, order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_file_database_persists_orders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orema.db");
    let path = path.to_string_lossy();

    let (establishment_id, order_id) = {
        let db = DbService::new(&path).await.unwrap();
        let est = establishment::create(&db.pool, "Fichier").await.unwrap();
        let opened = orders::open_order(&db.pool, est.id, None, OrderOpen::default())
            .await
            .unwrap();
        db.pool.close().await;
        (est.id, opened.id)
    };

    let db = DbService::new(&path).await.unwrap();
    let found = order::find_by_id(&db.pool, establishment_id, order_id).await.unwrap();
    assert!(found.is_some());
}
