//! Integration tests for the order core's write/read path (§4.1).

use order_service::repository::{create_order, get_order};
use orderflow_domain::OrderItem;
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn create_and_read_round_trip(pool: PgPool) {
    let items = vec![
        OrderItem::new(1, 2, 500).unwrap(),
        OrderItem::new(2, 1, 750).unwrap(),
    ];

    let (order_id, _created_at) = create_order(&pool, 42, items).await.unwrap();

    let order = get_order(&pool, order_id).await.unwrap();
    assert_eq!(order.user_id, 42);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount.as_minor_units(), 1750);

    let outbox_count: i64 =
        sqlx::query_scalar("SELECT count(*) FROM order_events WHERE aggregate_id = $1")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(outbox_count, 1);

    let payload: serde_json::Value =
        sqlx::query_scalar("SELECT payload FROM order_events WHERE aggregate_id = $1")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(payload.get("event_id").is_none());
}

#[sqlx::test(migrations = "../migrations")]
async fn get_missing_order_is_not_found(pool: PgPool) {
    let result = get_order(&pool, 999_999).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../migrations")]
async fn create_order_rejects_empty_items(pool: PgPool) {
    let result = create_order(&pool, 1, vec![]).await;
    assert!(result.is_err());
}
