//! Integration test for `RedisNotificationStore` against a live Redis.
//!
//! Skips if `REDIS_URL` is not set, the same pattern the order core's
//! original Postgres storage tests use for their DSN.

use orderflow_store::{NotificationRecord, NotificationStore, RedisNotificationStore};

#[tokio::test]
async fn put_then_get_round_trips_through_redis() {
    let Ok(redis_url) = std::env::var("REDIS_URL") else {
        eprintln!("REDIS_URL is not set, skipping");
        return;
    };

    let store = RedisNotificationStore::connect(&redis_url)
        .await
        .expect("failed to connect to redis");

    let record = NotificationRecord {
        order_id: 123_456,
        user_id: 1,
        order_status: "succeeded".to_string(),
    };

    store.put(123_456, &record, Some(30)).await.unwrap();

    let fetched = store.get(123_456).await.unwrap();
    assert_eq!(fetched, Some(record));
}
