use std::fmt::{self, Display, Formatter};

use serde::Deserialize;

/// What happens to the orders of a customer selected for purging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Delete the customer's orders along with the customer.
    #[default]
    Cascade,
    /// Move the customer's orders to `archived_orders`, then delete the customer.
    Archive,
    /// Keep customers that still have any order on record.
    Protect,
}

impl OrderPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPolicy::Cascade => "cascade",
            OrderPolicy::Archive => "archive",
            OrderPolicy::Protect => "protect",
        }
    }
}

impl Display for OrderPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
