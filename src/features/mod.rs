pub mod auth;
pub mod cases;
pub mod customer_responses;
pub mod customers;
pub mod dashboard;
pub mod reports;
