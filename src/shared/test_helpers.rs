#[cfg(test)]
use crate::core::config::CustomerLinkConfig;
#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn create_staff_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: "emp-123".to_string(),
        name: "Test Employee".to_string(),
        email: "employee@riskcase.test".to_string(),
        role: "employee".to_string(),
        session_id: "test-session-id".to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}

#[cfg(test)]
async fn inject_staff_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_staff_user());
    next.run(request).await
}

/// Wrap a router so every request carries an authenticated staff user
#[cfg(test)]
pub fn with_staff_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_staff_middleware))
}

#[cfg(test)]
pub fn customer_link_config() -> CustomerLinkConfig {
    CustomerLinkConfig {
        secret: "test-link-secret-with-32-characters!".to_string(),
        issuer: "riskcase-test".to_string(),
        audience: "customer-report".to_string(),
        ttl: std::time::Duration::from_secs(60 * 60),
    }
}
