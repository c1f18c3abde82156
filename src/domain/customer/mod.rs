mod customer_email;
mod customer_name;
mod customer_phone;
mod types;

pub use customer_email::CustomerEmail;
pub use customer_name::CustomerName;
pub use customer_phone::CustomerPhone;
pub use types::*;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: CustomerName,
    pub email: CustomerEmail,
    pub phone: Option<CustomerPhone>,
}

impl NewCustomer {
    pub fn new(name: String, email: String, phone: Option<String>) -> Result<Self, String> {
        Ok(Self {
            name: CustomerName::parse(name)?,
            email: CustomerEmail::parse(email)?,
            phone: CustomerPhone::parse(phone)?,
        })
    }
}

/// A customer to be stored together with the creation times of its orders.
#[derive(Debug, Clone)]
pub struct CustomerHistory {
    pub customer: NewCustomer,
    pub order_dates: Vec<DateTime<Utc>>,
}
