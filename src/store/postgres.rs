use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CustomerStore, PurgeOutcome, select_for_deletion};
use crate::configuration::DatabaseConfigs;
use crate::domain::{CustomerHistory, InactiveCustomer, OrderPolicy};
use crate::repository;

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect_lazy_with(config.connect_options())
}

#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CustomerStore for PgCustomerStore {
    async fn find_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<InactiveCustomer>, anyhow::Error> {
        repository::find_inactive_customers(&self.pool, cutoff).await
    }

    #[tracing::instrument(name = "Purge inactive customers in Postgres", skip(self))]
    async fn purge_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
        policy: OrderPolicy,
        now: DateTime<Utc>,
    ) -> Result<PurgeOutcome, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction")?;

        let locked = repository::lock_inactive_customers(&mut transaction, cutoff).await?;
        let locked_ids: Vec<i64> = locked.iter().map(|c| c.customer.id).collect();
        let candidates = if locked_ids.is_empty() {
            locked
        } else {
            repository::recheck_inactive_customers(&mut transaction, &locked_ids, cutoff).await?
        };
        if candidates.len() != locked_ids.len() {
            tracing::info!(
                reactivated = locked_ids.len() - candidates.len(),
                "Skipping customers that placed an order during the purge"
            );
        }
        let (customer_ids, retained_customers) = select_for_deletion(&candidates, policy);
        let mut outcome = PurgeOutcome {
            retained_customers,
            ..PurgeOutcome::default()
        };

        if !customer_ids.is_empty() {
            match policy {
                OrderPolicy::Cascade => {
                    outcome.deleted_orders =
                        repository::delete_orders_for_customers(&mut transaction, &customer_ids)
                            .await?;
                }
                OrderPolicy::Archive => {
                    outcome.archived_orders = repository::archive_orders_for_customers(
                        &mut transaction,
                        &customer_ids,
                        now,
                    )
                    .await?;
                    repository::delete_orders_for_customers(&mut transaction, &customer_ids)
                        .await?;
                }
                // Selected customers have no orders left to resolve
                OrderPolicy::Protect => {}
            }

            let deleted = repository::delete_customers(&mut transaction, &customer_ids).await?;
            // Dropping the transaction rolls everything back
            if deleted != customer_ids.len() as u64 {
                anyhow::bail!(
                    "Deleted {deleted} customers but {} were selected",
                    customer_ids.len()
                );
            }
            outcome.deleted_customers = deleted;
        }

        transaction
            .commit()
            .await
            .context("Failed to commit a transaction")?;
        Ok(outcome)
    }

    #[tracing::instrument(skip_all, fields(customers = customers.len(), reset))]
    async fn import_customers(
        &self,
        customers: &[CustomerHistory],
        reset: bool,
    ) -> Result<Vec<i64>, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction")?;

        if reset {
            repository::clear_all(&mut transaction).await?;
        }

        let mut customer_ids = Vec::with_capacity(customers.len());
        for history in customers {
            let customer_id = repository::insert_customer(&history.customer, &mut transaction).await?;
            for created_at in &history.order_dates {
                repository::insert_order(&mut transaction, customer_id, *created_at).await?;
            }
            customer_ids.push(customer_id);
        }

        transaction
            .commit()
            .await
            .context("Failed to commit a transaction")?;
        Ok(customer_ids)
    }
}
