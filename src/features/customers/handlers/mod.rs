pub mod customer_handler;

pub use customer_handler::*;
