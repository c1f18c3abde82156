use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres, Transaction};

#[tracing::instrument(skip(transaction))]
pub async fn insert_order(
    transaction: &mut Transaction<'_, Postgres>,
    customer_id: i64,
    created_at: DateTime<Utc>,
) -> Result<i64, anyhow::Error> {
    let order_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO orders (customer_id, created_at)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(customer_id)
    .bind(created_at)
    .fetch_one(&mut **transaction)
    .await
    .context("Failed to insert new order")?;

    Ok(order_id)
}

#[tracing::instrument(skip_all, fields(customers = customer_ids.len()))]
pub async fn archive_orders_for_customers(
    transaction: &mut Transaction<'_, Postgres>,
    customer_ids: &[i64],
    archived_at: DateTime<Utc>,
) -> Result<u64, anyhow::Error> {
    let query = sqlx::query(
        r#"
        INSERT INTO archived_orders (id, customer_id, created_at, archived_at)
        SELECT id, customer_id, created_at, $2
        FROM orders
        WHERE customer_id = ANY($1)
        "#,
    )
    .bind(customer_ids)
    .bind(archived_at);

    let archived = transaction
        .execute(query)
        .await
        .context("Failed to archive orders")?
        .rows_affected();
    Ok(archived)
}

#[tracing::instrument(skip_all, fields(customers = customer_ids.len()))]
pub async fn delete_orders_for_customers(
    transaction: &mut Transaction<'_, Postgres>,
    customer_ids: &[i64],
) -> Result<u64, anyhow::Error> {
    let query = sqlx::query(
        r#"
        DELETE FROM orders
        WHERE customer_id = ANY($1)
        "#,
    )
    .bind(customer_ids);

    let deleted = transaction
        .execute(query)
        .await
        .context("Failed to delete orders")?
        .rows_affected();
    Ok(deleted)
}
