use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{CustomerStore, PurgeOutcome, select_for_deletion};
use crate::domain::{
    ArchivedOrder, Customer, CustomerHistory, InactiveCustomer, NewCustomer, Order, OrderPolicy,
};

/// Process-local store with the same semantics as the Postgres one.
/// Every operation holds the lock for its whole duration, which makes each one atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_customer_id: i64,
    last_order_id: i64,
    customers: BTreeMap<i64, Customer>,
    orders: Vec<Order>,
    archived_orders: Vec<ArchivedOrder>,
}

impl State {
    fn insert_customer(&mut self, customer: &NewCustomer, created_at: DateTime<Utc>) -> i64 {
        self.last_customer_id += 1;
        let id = self.last_customer_id;
        self.customers.insert(
            id,
            Customer {
                id,
                name: customer.name.to_string(),
                email: customer.email.to_string(),
                phone: customer.phone.as_ref().map(|p| p.to_string()),
                created_at,
            },
        );
        id
    }

    fn insert_order(
        &mut self,
        customer_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<i64, anyhow::Error> {
        if !self.customers.contains_key(&customer_id) {
            anyhow::bail!("Customer {customer_id} does not exist");
        }
        self.last_order_id += 1;
        self.orders.push(Order {
            id: self.last_order_id,
            customer_id,
            created_at,
        });
        Ok(self.last_order_id)
    }

    fn inactive_customers(&self, cutoff: DateTime<Utc>) -> Vec<InactiveCustomer> {
        self.customers
            .values()
            .filter(|customer| {
                !self
                    .orders
                    .iter()
                    .any(|o| o.customer_id == customer.id && o.is_active_since(cutoff))
            })
            .map(|customer| InactiveCustomer {
                customer: customer.clone(),
                historical_orders: self
                    .orders
                    .iter()
                    .filter(|o| o.customer_id == customer.id)
                    .count() as i64,
            })
            .collect()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(&self, customer: &NewCustomer) -> i64 {
        self.state.lock().await.insert_customer(customer, Utc::now())
    }

    /// Fails like a foreign-key violation when the customer does not exist.
    pub async fn add_order(
        &self,
        customer_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<i64, anyhow::Error> {
        self.state.lock().await.insert_order(customer_id, created_at)
    }

    pub async fn customer_ids(&self) -> Vec<i64> {
        self.state.lock().await.customers.keys().copied().collect()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.state.lock().await.orders.clone()
    }

    pub async fn archived_orders(&self) -> Vec<ArchivedOrder> {
        self.state.lock().await.archived_orders.clone()
    }
}

impl CustomerStore for InMemoryStore {
    async fn find_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<InactiveCustomer>, anyhow::Error> {
        Ok(self.state.lock().await.inactive_customers(cutoff))
    }

    async fn purge_inactive_customers(
        &self,
        cutoff: DateTime<Utc>,
        policy: OrderPolicy,
        now: DateTime<Utc>,
    ) -> Result<PurgeOutcome, anyhow::Error> {
        let mut state = self.state.lock().await;
        let candidates = state.inactive_customers(cutoff);
        let (customer_ids, retained_customers) = select_for_deletion(&candidates, policy);

        let (removed, kept): (Vec<Order>, Vec<Order>) = std::mem::take(&mut state.orders)
            .into_iter()
            .partition(|o| customer_ids.contains(&o.customer_id));
        state.orders = kept;

        let mut outcome = PurgeOutcome {
            retained_customers,
            ..PurgeOutcome::default()
        };
        match policy {
            OrderPolicy::Cascade => outcome.deleted_orders = removed.len() as u64,
            OrderPolicy::Archive => {
                outcome.archived_orders = removed.len() as u64;
                state
                    .archived_orders
                    .extend(removed.iter().map(|o| o.archive(now)));
            }
            OrderPolicy::Protect => {}
        }

        for id in &customer_ids {
            if state.customers.remove(id).is_some() {
                outcome.deleted_customers += 1;
            }
        }
        Ok(outcome)
    }

    async fn import_customers(
        &self,
        customers: &[CustomerHistory],
        reset: bool,
    ) -> Result<Vec<i64>, anyhow::Error> {
        let mut state = self.state.lock().await;

        // Reject the whole batch up front, like a failed transaction would
        let mut emails: Vec<&str> = if reset {
            Vec::new()
        } else {
            state.customers.values().map(|c| c.email.as_str()).collect()
        };
        for history in customers {
            let email: &str = history.customer.email.as_ref();
            if emails.contains(&email) {
                anyhow::bail!("A customer with email {email} already exists");
            }
            emails.push(email);
        }
        drop(emails);

        if reset {
            state.customers.clear();
            state.orders.clear();
            state.archived_orders.clear();
        }

        let mut customer_ids = Vec::with_capacity(customers.len());
        for history in customers {
            let customer_id = state.insert_customer(&history.customer, Utc::now());
            for created_at in &history.order_dates {
                state.insert_order(customer_id, *created_at)?;
            }
            customer_ids.push(customer_id);
        }
        Ok(customer_ids)
    }
}
