use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, RequestLocale};
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto, SessionResponseDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::{Authenticator, SessionService};
use crate::shared::i18n::t;
use crate::shared::types::ApiResponse;

/// State shared by the auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
    pub sessions: Arc<SessionService>,
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    RequestLocale(locale): RequestLocale,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .authenticator
        .authenticate(&dto.email, &dto.password)
        .await?;
    let session = state.sessions.create(&user, dto.remember_me).await?;

    let response = LoginResponseDto {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_at: session.expires_at,
        remember_me: dto.remember_me,
        user: user.into(),
    };

    Ok(Json(ApiResponse::success(
        Some(response),
        Some(t(locale, "auth.logged_in").to_string()),
        None,
    )))
}

/// Sign out and end the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session ended"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    user: AuthenticatedUser,
    State(state): State<AuthState>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<ApiResponse<()>>> {
    state.sessions.destroy(&user.session_id).await;
    Ok(Json(ApiResponse::success(
        None,
        Some(t(locale, "auth.logged_out").to_string()),
        None,
    )))
}

/// Get the current session, used by clients at start-up
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn get_session(user: AuthenticatedUser) -> Result<Json<ApiResponse<SessionResponseDto>>> {
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AccountsConfig, SessionConfig};
    use crate::core::middleware::auth_middleware;
    use crate::features::auth::routes::{protected_routes, public_routes};
    use crate::features::auth::services::AccountAuthenticator;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sha2::{Digest, Sha256};

    const PASSWORD: &str = "correct horse battery";

    fn state() -> AuthState {
        let digest = hex::encode(Sha256::digest(PASSWORD.as_bytes()));
        let accounts =
            AccountsConfig::parse(&format!("anna@riskcase.test|{}|Anna Berger|admin", digest))
                .unwrap();
        let sessions = SessionService::new(SessionConfig {
            secret: "handler-test-secret-of-enough-length".to_string(),
            issuer: "riskcase-test".to_string(),
            ttl: std::time::Duration::from_secs(3600),
            remember_ttl: std::time::Duration::from_secs(7200),
            leeway: std::time::Duration::from_secs(0),
        });

        AuthState {
            authenticator: Arc::new(AccountAuthenticator::new(&accounts)),
            sessions: Arc::new(sessions),
        }
    }

    fn server() -> TestServer {
        let state = state();
        let protected = protected_routes(state.clone()).route_layer(
            axum::middleware::from_fn_with_state(Arc::clone(&state.sessions), auth_middleware),
        );
        let app = Router::new().merge(public_routes(state)).merge(protected);
        TestServer::new(app).unwrap()
    }

    async fn login_token(server: &TestServer) -> String {
        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "anna@riskcase.test", "password": PASSWORD }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_login_session_logout_flow() {
        let server = server();
        let token = login_token(&server).await;

        let session = server
            .get("/api/auth/session")
            .authorization_bearer(&token)
            .await;
        session.assert_status_ok();
        let body: Value = session.json();
        assert_eq!(body["data"]["user"]["email"], "anna@riskcase.test");

        server
            .post("/api/auth/logout")
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        server
            .get("/api/auth/session")
            .authorization_bearer(&token)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let response = server()
            .post("/api/auth/login")
            .json(&json!({ "email": "anna@riskcase.test", "password": "nope" }))
            .await;
        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_invalid_email_is_validation_error() {
        let response = server()
            .post("/api/auth/login")
            .json(&json!({ "email": "not-an-email", "password": PASSWORD }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_session_requires_token() {
        server()
            .get("/api/auth/session")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_message_is_localized() {
        let response = server()
            .post("/api/auth/login?lang=de")
            .json(&json!({ "email": "anna@riskcase.test", "password": PASSWORD }))
            .await;
        let body: Value = response.json();
        assert_eq!(body["message"], "Angemeldet");
    }
}
