use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres, Transaction};

use crate::domain::{InactiveCustomer, NewCustomer};

#[tracing::instrument(skip_all, fields(customer_email = %customer.email))]
pub async fn insert_customer(
    customer: &NewCustomer,
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<i64, anyhow::Error> {
    let customer_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO customers (name, email, phone)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(customer.name.as_ref())
    .bind(customer.email.as_ref())
    .bind(customer.phone.as_ref().map(AsRef::<str>::as_ref))
    .fetch_one(&mut **transaction)
    .await
    .context("Failed to insert new customer")?;

    Ok(customer_id)
}

/// Customers without any order created at or after `cutoff`.
#[tracing::instrument(skip(pool))]
pub async fn find_inactive_customers(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<InactiveCustomer>, anyhow::Error> {
    let customers = sqlx::query_as::<_, InactiveCustomer>(
        r#"
        SELECT c.id, c.name, c.email, c.phone, c.created_at,
            (SELECT COUNT(*) FROM orders o WHERE o.customer_id = c.id) AS historical_orders
        FROM customers c
        WHERE c.id NOT IN (
            SELECT DISTINCT customer_id
            FROM orders
            WHERE created_at >= $1
        )
        ORDER BY c.id
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
    .context("Failed to fetch inactive customers")?;

    Ok(customers)
}

/// Same selection as [`find_inactive_customers`], but locks the selected rows until
/// the transaction ends so no order can be attached to them meanwhile.
#[tracing::instrument(skip(transaction))]
pub async fn lock_inactive_customers(
    transaction: &mut Transaction<'_, Postgres>,
    cutoff: DateTime<Utc>,
) -> Result<Vec<InactiveCustomer>, anyhow::Error> {
    let customers = sqlx::query_as::<_, InactiveCustomer>(
        r#"
        SELECT c.id, c.name, c.email, c.phone, c.created_at,
            (SELECT COUNT(*) FROM orders o WHERE o.customer_id = c.id) AS historical_orders
        FROM customers c
        WHERE c.id NOT IN (
            SELECT DISTINCT customer_id
            FROM orders
            WHERE created_at >= $1
        )
        ORDER BY c.id
        FOR UPDATE OF c
        "#,
    )
    .bind(cutoff)
    .fetch_all(&mut **transaction)
    .await
    .context("Failed to lock inactive customers")?;

    Ok(customers)
}

/// Re-reads locked customers in a fresh snapshot. Orders committed while
/// [`lock_inactive_customers`] waited on a row lock are invisible to that
/// statement; this one drops customers that became active and refreshes
/// the order counts of the rest.
#[tracing::instrument(skip_all, fields(customers = customer_ids.len()))]
pub async fn recheck_inactive_customers(
    transaction: &mut Transaction<'_, Postgres>,
    customer_ids: &[i64],
    cutoff: DateTime<Utc>,
) -> Result<Vec<InactiveCustomer>, anyhow::Error> {
    let customers = sqlx::query_as::<_, InactiveCustomer>(
        r#"
        SELECT c.id, c.name, c.email, c.phone, c.created_at,
            (SELECT COUNT(*) FROM orders o WHERE o.customer_id = c.id) AS historical_orders
        FROM customers c
        WHERE c.id = ANY($1)
        AND NOT EXISTS (
            SELECT 1
            FROM orders o
            WHERE o.customer_id = c.id AND o.created_at >= $2
        )
        ORDER BY c.id
        "#,
    )
    .bind(customer_ids)
    .bind(cutoff)
    .fetch_all(&mut **transaction)
    .await
    .context("Failed to recheck inactive customers")?;

    Ok(customers)
}

#[tracing::instrument(skip_all, fields(customers = customer_ids.len()))]
pub async fn delete_customers(
    transaction: &mut Transaction<'_, Postgres>,
    customer_ids: &[i64],
) -> Result<u64, anyhow::Error> {
    let query = sqlx::query(
        r#"
        DELETE FROM customers
        WHERE id = ANY($1)
        "#,
    )
    .bind(customer_ids);

    let deleted = transaction
        .execute(query)
        .await
        .context("Failed to delete inactive customers")?
        .rows_affected();
    Ok(deleted)
}

/// Removes every customer, order and archived order. Used by `seed --reset`.
#[tracing::instrument(skip_all)]
pub async fn clear_all(transaction: &mut Transaction<'_, Postgres>) -> Result<(), anyhow::Error> {
    for table in ["orders", "archived_orders", "customers"] {
        transaction
            .execute(format!("DELETE FROM {table}").as_str())
            .await
            .with_context(|| format!("Failed to clear {table}"))?;
    }
    Ok(())
}
