//! Order core: the write path (§4.1) and its read contract.

use crate::error::OrderServiceError;
use chrono::{DateTime, Utc};
use orderflow_domain::{Order, OrderItem};
use orderflow_outbox::{insert_event_tx, OutboxTable};
use serde::Serialize;
use sqlx::PgPool;

/// The `OrderCreated` payload written into the outbox, matching the
/// broker wire format in §6. `event_id` is deliberately absent here: the
/// dispatcher assigns it from the outbox row id at publish time.
#[derive(Debug, Serialize)]
struct OrderCreatedPayload {
    order_id: i64,
    user_id: i64,
    total_amount: i64,
    created_at: DateTime<Utc>,
}

/// Accept `(user_id, items)`, persist the order and its items, and
/// write the `OrderCreated` outbox row, all inside one transaction.
///
/// Either both the order (with items) and its outbox row exist after
/// this returns `Ok`, or neither does.
pub async fn create_order(
    pool: &PgPool,
    user_id: i64,
    items: Vec<OrderItem>,
) -> Result<(i64, DateTime<Utc>), OrderServiceError> {
    Order::validate_request(user_id, &items)?;

    let mut tx = pool.begin().await?;

    let (order_id, created_at): (i64, DateTime<Utc>) =
        sqlx::query_as("INSERT INTO orders (user_id, status) VALUES ($1, 'NEW') RETURNING id, created_at")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    for item in &items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price.as_minor_units())
        .execute(&mut *tx)
        .await?;
    }

    // Total is derived from the rows just inserted, read back inside
    // the same transaction, rather than recomputed in memory.
    let total_amount: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(price * quantity), 0) FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?;

    let payload = OrderCreatedPayload {
        order_id,
        user_id,
        total_amount,
        created_at,
    };

    insert_event_tx(&mut tx, OutboxTable::OrderEvents, "order.created", &payload, order_id).await?;

    tx.commit().await?;

    Ok((order_id, created_at))
}

/// Fetch an order with its items, or `NotFound` if no such id exists.
/// A non-positive id fails fast without touching storage.
pub async fn get_order(pool: &PgPool, id: i64) -> Result<Order, OrderServiceError> {
    Order::validate_id(id)?;

    let rows = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT
            o.id, o.user_id, o.status, o.created_at, o.updated_at,
            i.product_id, i.quantity, i.price
        FROM orders AS o
        LEFT JOIN order_items AS i ON o.id = i.order_id
        WHERE o.id = $1
        ORDER BY i.id
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let Some(first) = rows.first() else {
        return Err(OrderServiceError::NotFound);
    };

    let items = rows
        .iter()
        .filter_map(|row| {
            let product_id = row.product_id?;
            let quantity = row.quantity?;
            let price = row.price?;
            OrderItem::new(product_id, quantity, price).ok()
        })
        .collect();

    Ok(Order::new(
        first.id,
        first.user_id,
        &first.status,
        items,
        first.created_at,
        first.updated_at,
    ))
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_id: Option<i64>,
    quantity: Option<i32>,
    price: Option<i64>,
}

#[cfg(test)]
mod from_outbox_event_id_tests {
    use super::OrderCreatedPayload;
    use serde_json::json;

    #[test]
    fn payload_has_no_event_id_field() {
        let payload = OrderCreatedPayload {
            order_id: 1,
            user_id: 1,
            total_amount: 100,
            created_at: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value.get("event_id"), None);
        assert_eq!(value["order_id"], json!(1));
    }
}
