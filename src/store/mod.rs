//! Storage seam for the purge job.
//!
//! The purge never reaches for a global connection: callers construct a store
//! ([`PgCustomerStore`] in production, [`InMemoryStore`] in tests) and hand it in.

mod memory;
mod postgres;

use std::future::Future;

use chrono::{DateTime, Utc};

pub use memory::InMemoryStore;
pub use postgres::{PgCustomerStore, get_connection_pool};

use crate::domain::{CustomerHistory, InactiveCustomer, OrderPolicy};

/// Counts reported by a single purge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub deleted_customers: u64,
    pub deleted_orders: u64,
    pub archived_orders: u64,
    /// Inactive customers kept because [`OrderPolicy::Protect`] forbids dropping their history.
    pub retained_customers: u64,
}

pub trait CustomerStore: Send + Sync {
    /// Customers with no order created at or after `cutoff`, ordered by id.
    fn find_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<InactiveCustomer>, anyhow::Error>> + Send;

    /// Atomically deletes the inactive customers, resolving their orders per `policy`.
    /// `now` stamps archived orders.
    fn purge_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
        policy: OrderPolicy,
        now: DateTime<Utc>,
    ) -> impl Future<Output = Result<PurgeOutcome, anyhow::Error>> + Send;

    /// Stores customers and their orders in one go, returning the new customer ids.
    /// With `reset`, every existing customer and order is removed first.
    fn import_customers(
        &self,
        customers: &[CustomerHistory],
        reset: bool,
    ) -> impl Future<Output = Result<Vec<i64>, anyhow::Error>> + Send;
}

/// Splits the inactive customers into the ids to delete and the number retained.
pub(crate) fn select_for_deletion(
    candidates: &[InactiveCustomer],
    policy: OrderPolicy,
) -> (Vec<i64>, u64) {
    let mut retained = 0;
    let mut customer_ids = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if policy == OrderPolicy::Protect && candidate.has_order_history() {
            retained += 1;
        } else {
            customer_ids.push(candidate.customer.id);
        }
    }
    (customer_ids, retained)
}
