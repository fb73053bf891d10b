mod customer_link_service;
mod link_token_service;
mod response_service;

pub use customer_link_service::CustomerLinkService;
pub use link_token_service::{LinkGrant, LinkTokenService, LinkTokenValidator};
pub use response_service::ResponseService;
