mod authenticator;
mod session_service;

pub use authenticator::{AccountAuthenticator, Authenticator};
pub use session_service::SessionService;
