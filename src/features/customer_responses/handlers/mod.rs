pub mod customer_response_handler;

pub use customer_response_handler::*;
