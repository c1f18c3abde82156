mod customer;
mod order;
mod order_policy;

pub use customer::*;
pub use order::*;
pub use order_policy::OrderPolicy;
