mod customer;
mod order;

pub use customer::*;
pub use order::*;
