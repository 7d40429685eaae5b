//! Transfer and merge workflows against an in-memory database

mod common;

use common::{Fixture, product, setup, supplement, table};
use orema_server::db::DbService;
use orema_server::db::repository::{dining_table, establishment, order};
use orema_server::orders;
use orema_server::tables::{merge_table_orders, transfer_table};
use shared::error::ErrorCode;
use shared::models::{
    OrderLineCreate, OrderMerge, OrderOpen, OrderQuery, OrderStatus, PreparationStatus, TableStatus,
    TableTransfer, TransferOutcome,
};

async fn open_on(fx: &Fixture, table_id: i64) -> i64 {
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

async fn add(fx: &Fixture, order_id: i64, product_id: i64, quantity: i32, supplement_ids: Vec<i64>) {
    orders::add_line(
        fx.pool(),
        fx.establishment_id,
        order_id,
        OrderLineCreate {
            product_id,
            quantity,
            supplement_ids,
            notes: None,
        },
    )
    .await
    .unwrap();
}

async fn status_of(fx: &Fixture, table_id: i64) -> TableStatus {
    dining_table::find_by_id(fx.pool(), fx.establishment_id, table_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

fn transfer(from: i64, to: i64, clean: Option<bool>) -> TableTransfer {
    TableTransfer {
        from_table_id: from,
        to_table_id: to,
        mark_source_as_clean: clean,
    }
}

// ========== transfer_table ==========

#[tokio::test]
async fn test_transfer_moves_order_and_statuses() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let order_id = open_on(&fx, t1.id).await;
    dining_table::set_status(fx.pool(), fx.establishment_id, t1.id, TableStatus::BillRequested)
        .await
        .unwrap();

    let outcome = transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, t2.id, None))
        .await
        .unwrap();

    match outcome {
        TransferOutcome::Transferred { order_id: moved, to_table_id, .. } => {
            assert_eq!(moved, order_id);
            assert_eq!(to_table_id, t2.id);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let moved = order::find_by_id(fx.pool(), fx.establishment_id, order_id).await.unwrap().unwrap();
    assert_eq!(moved.table_id, Some(t2.id));
    assert_eq!(status_of(&fx, t1.id).await, TableStatus::NeedsCleaning);
    // destination takes the source's pre-transfer status
    assert_eq!(status_of(&fx, t2.id).await, TableStatus::BillRequested);
}

#[tokio::test]
async fn test_transfer_mark_source_clean() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    open_on(&fx, t1.id).await;

    transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, t2.id, Some(true)))
        .await
        .unwrap();

    assert_eq!(status_of(&fx, t1.id).await, TableStatus::Free);
    assert_eq!(status_of(&fx, t2.id).await, TableStatus::Occupied);
}

#[tokio::test]
async fn test_transfer_into_occupied_table_requires_merge_and_changes_nothing() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let source_order = open_on(&fx, t1.id).await;
    let target_order = open_on(&fx, t2.id).await;
    dining_table::set_status(fx.pool(), fx.establishment_id, t2.id, TableStatus::InPreparation)
        .await
        .unwrap();

    let outcome = transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, t2.id, Some(true)))
        .await
        .unwrap();

    match outcome {
        TransferOutcome::MergeRequired {
            source_order_id,
            target_order_id,
            ..
        } => {
            assert_eq!(source_order_id, source_order);
            assert_eq!(target_order_id, target_order);
        }
        other => panic!("expected MergeRequired, got {other:?}"),
    }

    let source = order::find_by_id(fx.pool(), fx.establishment_id, source_order).await.unwrap().unwrap();
    assert_eq!(source.table_id, Some(t1.id));
    assert_eq!(status_of(&fx, t1.id).await, TableStatus::Occupied);
    assert_eq!(status_of(&fx, t2.id).await, TableStatus::InPreparation);
}

#[tokio::test]
async fn test_transfer_without_open_order() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;

    let err = transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, t2.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNoOpenOrder);
}

#[tokio::test]
async fn test_transfer_to_same_table_is_rejected() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    open_on(&fx, t1.id).await;

    let err = transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, t1.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn test_transfer_to_other_establishment_table_is_not_found() {
    let fx = setup().await;
    let other = common::second_establishment(fx.pool()).await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let foreign = table(fx.pool(), other, "1").await;
    open_on(&fx, t1.id).await;

    let err = transfer_table(fx.pool(), fx.establishment_id, transfer(t1.id, foreign.id, None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);
    assert_eq!(status_of(&fx, t1.id).await, TableStatus::Occupied);
}

// ========== merge_table_orders ==========

#[tokio::test]
async fn test_merge_sums_totals_and_frees_source() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let burger = product(fx.pool(), fx.establishment_id, "Burger", 12.5, 10.0).await;
    let cafe = product(fx.pool(), fx.establishment_id, "Café", 2.0, 10.0).await;
    let cheddar = supplement(fx.pool(), fx.establishment_id, "Cheddar", 1.5).await;

    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;
    add(&fx, source_id, burger.id, 2, vec![cheddar.id]).await;
    add(&fx, source_id, cafe.id, 1, vec![]).await;
    add(&fx, target_id, cafe.id, 3, vec![]).await;
    dining_table::set_status(fx.pool(), fx.establishment_id, t1.id, TableStatus::BillRequested)
        .await
        .unwrap();

    let source = order::find_by_id(fx.pool(), fx.establishment_id, source_id).await.unwrap().unwrap();
    let target = order::find_by_id(fx.pool(), fx.establishment_id, target_id).await.unwrap().unwrap();

    let outcome = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: t1.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.merged_lines, 2);
    let merged = &outcome.target_order;
    assert!((merged.total - (source.total + target.total)).abs() < 0.001);
    assert!((merged.subtotal - (source.subtotal + target.subtotal)).abs() < 0.001);
    assert!(merged.notes.as_deref().unwrap_or_default().contains("Fusion depuis la table 1"));

    // source order and lines are gone
    assert!(order::find_by_id(fx.pool(), fx.establishment_id, source_id).await.unwrap().is_none());
    assert!(order::find_lines(fx.pool(), source_id).await.unwrap().is_empty());

    // lines and supplements copied
    let detail = orders::get_detail(fx.pool(), fx.establishment_id, target_id).await.unwrap();
    assert_eq!(detail.lines.len(), 3);
    let burger_line = detail
        .lines
        .iter()
        .find(|l| l.line.product_name == "Burger")
        .expect("burger copied");
    assert_eq!(burger_line.line.quantity, 2);
    assert_eq!(burger_line.supplements.len(), 1);
    assert_eq!(burger_line.supplements[0].name, "Cheddar");
    assert_eq!(burger_line.supplements[0].supplement_id, Some(cheddar.id));

    assert_eq!(status_of(&fx, t1.id).await, TableStatus::Free);
}

#[tokio::test]
async fn test_merge_keeps_line_state_verbatim() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let plat = product(fx.pool(), fx.establishment_id, "Plat du jour", 14.0, 10.0).await;
    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;
    add(&fx, source_id, plat.id, 1, vec![]).await;

    let line_id = order::find_lines(fx.pool(), source_id).await.unwrap()[0].id;
    orders::set_line_status(fx.pool(), fx.establishment_id, source_id, line_id, PreparationStatus::Served)
        .await
        .unwrap();

    merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: t1.id,
        },
    )
    .await
    .unwrap();

    let lines = order::find_lines(fx.pool(), target_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].preparation_status, PreparationStatus::Served);
    assert_eq!(lines[0].subtotal, 14.0);
    assert_eq!(lines[0].tax_amount, 1.4);
}

#[tokio::test]
async fn test_merge_adds_stored_totals_without_recomputing() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let cafe = product(fx.pool(), fx.establishment_id, "Café", 2.0, 10.0).await;
    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;
    add(&fx, source_id, cafe.id, 1, vec![]).await;
    add(&fx, target_id, cafe.id, 2, vec![]).await;

    // stored source totals no longer match its single line (2.00 + 0.20)
    order::update_totals(
        fx.pool(),
        source_id,
        order::OrderTotals {
            subtotal: 50.0,
            tax_total: 5.0,
            discount_total: 0.0,
            total: 55.0,
        },
    )
    .await
    .unwrap();

    let outcome = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: t1.id,
        },
    )
    .await
    .unwrap();

    // 55.00 + 4.40, not the 6.60 the merged lines add up to
    assert_eq!(outcome.target_order.total, 59.4);
    assert_eq!(outcome.target_order.subtotal, 54.0);
    assert_eq!(outcome.target_order.tax_total, 5.4);
}

#[tokio::test]
async fn test_merge_rejects_table_of_another_order() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let t3 = table(fx.pool(), fx.establishment_id, "3").await;
    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;
    let bystander = open_on(&fx, t3.id).await;

    let err = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: t3.id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // nothing moved, the third table keeps its order
    assert_eq!(status_of(&fx, t3.id).await, TableStatus::Occupied);
    assert!(order::find_by_id(fx.pool(), fx.establishment_id, source_id).await.unwrap().is_some());
    let still_open = order::find_open_by_table(fx.pool(), fx.establishment_id, t3.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_open.id, bystander);
}

#[tokio::test]
async fn test_merge_rejects_terminal_orders() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;
    orders::cancel_order(fx.pool(), fx.establishment_id, target_id).await.unwrap();

    let err = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: t1.id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotInProgress);

    let source = order::find_by_id(fx.pool(), fx.establishment_id, source_id).await.unwrap().unwrap();
    assert_eq!(source.status, OrderStatus::InProgress);
}

#[tokio::test]
async fn test_merge_same_order_is_rejected() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let order_id = open_on(&fx, t1.id).await;

    let err = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: order_id,
            target_order_id: order_id,
            source_table_id: t1.id,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderMergeSelf);
}

#[tokio::test]
async fn test_merge_unknown_source_table() {
    let fx = setup().await;
    let t1 = table(fx.pool(), fx.establishment_id, "1").await;
    let t2 = table(fx.pool(), fx.establishment_id, "2").await;
    let source_id = open_on(&fx, t1.id).await;
    let target_id = open_on(&fx, t2.id).await;

    let err = merge_table_orders(
        fx.pool(),
        fx.establishment_id,
        OrderMerge {
            source_order_id: source_id,
            target_order_id: target_id,
            source_table_id: 9_999,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::TableNotFound);
    assert!(order::find_by_id(fx.pool(), fx.establishment_id, source_id).await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_into_one_table_serialize() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    let db = DbService::new(&path.to_string_lossy()).await.unwrap();
    let est = establishment::create(&db.pool, "Concurrence").await.unwrap().id;

    for round in 0..10 {
        let a = table(&db.pool, est, &format!("A{round}")).await;
        let b = table(&db.pool, est, &format!("B{round}")).await;
        let d = table(&db.pool, est, &format!("D{round}")).await;
        for table_id in [a.id, b.id] {
            orders::open_order(&db.pool, est, None, OrderOpen {
                table_id: Some(table_id),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let (a, b, d) = (a.id, b.id, d.id);
        let first = tokio::spawn({
            let pool = db.pool.clone();
            async move { transfer_table(&pool, est, transfer(a, d, None)).await }
        });
        let second = tokio::spawn({
            let pool = db.pool.clone();
            async move { transfer_table(&pool, est, transfer(b, d, None)).await }
        });
        let outcomes = [first.await.unwrap(), second.await.unwrap()];

        let mut transferred = 0;
        let mut merge_required = 0;
        for outcome in outcomes {
            match outcome {
                Ok(TransferOutcome::Transferred { .. }) => transferred += 1,
                Ok(TransferOutcome::MergeRequired { .. }) => merge_required += 1,
                Err(e) => panic!("round {round}: transfer failed with {:?}: {}", e.code, e.message),
            }
        }
        assert_eq!((transferred, merge_required), (1, 1), "round {round}");

        let open_on_d = order::find_all(&db.pool, est, &OrderQuery {
            status: Some(OrderStatus::InProgress),
            table_id: Some(d),
        })
        .await
        .unwrap();
        assert_eq!(open_on_d.len(), 1, "round {round}");
    }
}
