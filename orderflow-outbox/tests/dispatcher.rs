//! Integration tests against a real Postgres instance, provisioned by
//! `sqlx::test` from the workspace migrations.
//!
//! Run with: `cargo test -p orderflow-outbox` with `DATABASE_URL` set to
//! a Postgres instance `sqlx::test` is allowed to create scratch
//! databases against.

use orderflow_broker::StubProducer;
use orderflow_outbox::{insert_event_tx, lease_next, mark_sent, try_mark_processed_tx, OutboxDispatcher, OutboxTable, ProcessedTable};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[sqlx::test(migrations = "../migrations")]
async fn appended_row_is_visible_only_after_commit(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = insert_event_tx(
        &mut tx,
        OutboxTable::OrderEvents,
        "order.created",
        &json!({"order_id": 1, "user_id": 1, "total_amount": 200}),
        1,
    )
    .await
    .unwrap();

    // Not committed yet: a fresh connection sees nothing.
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM order_events WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    tx.commit().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM order_events WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn lease_then_mark_sent_follows_the_state_machine(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = insert_event_tx(
        &mut tx,
        OutboxTable::OrderEvents,
        "order.created",
        &json!({"order_id": 1}),
        1,
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let leased = lease_next(&pool, OutboxTable::OrderEvents, 60)
        .await
        .unwrap()
        .expect("row should be eligible");
    assert_eq!(leased.id, id);

    // A second lease attempt before the first lease expires sees nothing.
    let second = lease_next(&pool, OutboxTable::OrderEvents, 60).await.unwrap();
    assert!(second.is_none());

    mark_sent(&pool, OutboxTable::OrderEvents, id).await.unwrap();

    let sent_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT sent_at FROM order_events WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(sent_at.is_some());

    // Sent rows are never leased again.
    let after_sent = lease_next(&pool, OutboxTable::OrderEvents, 60).await.unwrap();
    assert!(after_sent.is_none());
}

#[sqlx::test(migrations = "../migrations")]
async fn two_dispatchers_never_lease_the_same_row(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    for i in 0..5 {
        insert_event_tx(
            &mut tx,
            OutboxTable::OrderEvents,
            "order.created",
            &json!({"order_id": i}),
            i,
        )
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();

    let a = lease_next(&pool, OutboxTable::OrderEvents, 60).await.unwrap().unwrap();
    let b = lease_next(&pool, OutboxTable::OrderEvents, 60).await.unwrap().unwrap();
    assert_ne!(a.id, b.id);
}

#[sqlx::test(migrations = "../migrations")]
async fn expired_lease_is_reclaimable(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = insert_event_tx(
        &mut tx,
        OutboxTable::OrderEvents,
        "order.created",
        &json!({"order_id": 1}),
        1,
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let leased = lease_next(&pool, OutboxTable::OrderEvents, 60).await.unwrap().unwrap();
    assert_eq!(leased.id, id);

    // With a zero-second lease timeout, the just-taken lease is already
    // expired and is reclaimable immediately.
    let reclaimed = lease_next(&pool, OutboxTable::OrderEvents, 0).await.unwrap();
    assert_eq!(reclaimed.unwrap().id, id);
}

#[sqlx::test(migrations = "../migrations")]
async fn ledger_first_observation_then_duplicate(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let first = try_mark_processed_tx(&mut tx, ProcessedTable::PaymentProcessedEvents, 42)
        .await
        .unwrap();
    assert!(first);
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let second = try_mark_processed_tx(&mut tx, ProcessedTable::PaymentProcessedEvents, 42)
        .await
        .unwrap();
    assert!(!second);
    tx.commit().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM payment_processed_events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn dispatcher_assigns_event_id_from_leased_row_and_marks_sent(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let id = insert_event_tx(
        &mut tx,
        OutboxTable::OrderEvents,
        "order.created",
        &json!({"order_id": 7, "user_id": 1, "total_amount": 100}),
        7,
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let producer = Arc::new(StubProducer::new());
    let dispatcher = OutboxDispatcher::new(pool.clone(), OutboxTable::OrderEvents, "orders", producer.clone())
        .with_tick_period(Duration::from_millis(20));

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(dispatcher.run(shutdown_clone));

    // Give the dispatcher a few ticks to drain the one row.
    tokio::time::sleep(Duration::from_millis(150)).await;
    shutdown.cancel();
    handle.await.unwrap();

    let sent: Vec<(String, Vec<u8>)> = producer.sent_messages();
    assert_eq!(sent.len(), 1);
    let (topic, payload) = &sent[0];
    assert_eq!(topic, "orders");
    let decoded: serde_json::Value = serde_json::from_slice(payload).unwrap();
    assert_eq!(decoded["event_id"], json!(id));
    assert_eq!(decoded["order_id"], json!(7));

    let sent_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT sent_at FROM order_events WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(sent_at.is_some());
}
