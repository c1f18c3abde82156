use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ArchivedOrder {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub archived_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order keeps its customer active for a window starting at `cutoff`.
    /// The bound is inclusive.
    pub fn is_active_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at >= cutoff
    }

    pub fn archive(&self, archived_at: DateTime<Utc>) -> ArchivedOrder {
        ArchivedOrder {
            id: self.id,
            customer_id: self.customer_id,
            created_at: self.created_at,
            archived_at,
        }
    }
}
