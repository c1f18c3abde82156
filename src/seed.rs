use anyhow::Context;
use chrono::{DateTime, Duration, Utc};

use crate::domain::{CustomerHistory, NewCustomer};
use crate::store::CustomerStore;

/// Sample customers with the age in days of each of their orders.
const SAMPLE_CUSTOMERS: &[(&str, &str, &str, &[i64])] = &[
    ("Alice Johnson", "alice@example.com", "+1234567890", &[0, 3]),
    ("Bob Smith", "bob@example.com", "123-456-7890", &[10]),
    ("Carol Davis", "carol@example.com", "", &[400]),
    ("David Wilson", "david@example.com", "+1987654321", &[]),
    ("Eva Brown", "eva@example.com", "555-123-4567", &[700, 364]),
];

pub fn sample_customers(now: DateTime<Utc>) -> Result<Vec<CustomerHistory>, String> {
    SAMPLE_CUSTOMERS
        .iter()
        .map(|(name, email, phone, order_ages)| -> Result<CustomerHistory, String> {
            Ok(CustomerHistory {
                customer: NewCustomer::new(
                    name.to_string(),
                    email.to_string(),
                    Some(phone.to_string()),
                )?,
                order_dates: order_ages
                    .iter()
                    .map(|age| now - Duration::days(*age))
                    .collect(),
            })
        })
        .collect()
}

/// Loads the sample customers. With `reset`, existing customers and orders are removed first.
#[tracing::instrument(skip(store))]
pub async fn seed<S: CustomerStore>(
    store: &S,
    now: DateTime<Utc>,
    reset: bool,
) -> Result<Vec<i64>, anyhow::Error> {
    let customers = sample_customers(now)
        .map_err(anyhow::Error::msg)
        .context("Sample customers failed validation")?;

    let customer_ids = store
        .import_customers(&customers, reset)
        .await
        .context("Failed to store sample customers")?;

    let orders: usize = customers.iter().map(|c| c.order_dates.len()).sum();
    tracing::info!(customers = customer_ids.len(), orders, "Database seeding completed");
    Ok(customer_ids)
}
