//! Integration tests for the payment consumer handler (§4.3, §4.7).

use payment_service::handler::handle_order_created;
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn settles_and_enqueues_status(pool: PgPool) {
    let payload = br#"{"event_id":1,"order_id":2,"user_id":7,"total_amount":1500}"#;

    handle_order_created(&pool, payload).await.unwrap();

    let status: String = sqlx::query_scalar("SELECT status FROM payments WHERE order_id = 2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "succeeded");

    let outbox_count: i64 = sqlx::query_scalar("SELECT count(*) FROM payment_events WHERE aggregate_id = 2")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(outbox_count, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn odd_order_id_fails(pool: PgPool) {
    let payload = br#"{"event_id":1,"order_id":3,"user_id":7,"total_amount":1500}"#;

    handle_order_created(&pool, payload).await.unwrap();

    let status: String = sqlx::query_scalar("SELECT status FROM payments WHERE order_id = 3")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(status, "failed");
}

#[sqlx::test(migrations = "../migrations")]
async fn duplicate_event_id_is_a_no_op(pool: PgPool) {
    let payload = br#"{"event_id":9,"order_id":4,"user_id":7,"total_amount":1500}"#;

    handle_order_created(&pool, payload).await.unwrap();
    handle_order_created(&pool, payload).await.unwrap();

    let outbox_count: i64 = sqlx::query_scalar("SELECT count(*) FROM payment_events WHERE aggregate_id = 4")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(outbox_count, 1);
}

#[sqlx::test(migrations = "../migrations")]
async fn malformed_payload_is_rejected_for_redelivery(pool: PgPool) {
    let payload = br#"{"not":"an order event"}"#;

    let result = handle_order_created(&pool, payload).await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM payments").fetch_one(&pool).await.unwrap();
    assert_eq!(count, 0);
}
