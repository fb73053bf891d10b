pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use handlers::AuthState;
pub use services::{AccountAuthenticator, Authenticator, SessionService};
