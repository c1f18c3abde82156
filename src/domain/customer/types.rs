use chrono::{DateTime, Utc};

/// A stored customer row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A customer with no order inside the activity window, together with the
/// number of older orders still referencing it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InactiveCustomer {
    #[sqlx(flatten)]
    pub customer: Customer,
    pub historical_orders: i64,
}

impl InactiveCustomer {
    pub fn has_order_history(&self) -> bool {
        self.historical_orders > 0
    }
}
