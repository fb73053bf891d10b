mod customer_response_dto;

pub use customer_response_dto::*;
