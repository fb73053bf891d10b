use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, SessionClaims, StaffUser};

/// A freshly created session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Staff session lifecycle: created at login, checked on every protected
/// request, destroyed at logout.
///
/// Tokens are HS256 JWTs; a token is only accepted while its session id is
/// still registered here, so logout takes effect before expiry.
pub struct SessionService {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// session id -> expiry
    active: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionService {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
            active: RwLock::new(HashMap::new()),
        }
    }

    fn lifetime(&self, remember_me: bool) -> Duration {
        let ttl = if remember_me {
            self.config.remember_ttl
        } else {
            self.config.ttl
        };
        Duration::seconds(ttl.as_secs() as i64)
    }

    pub async fn create(&self, user: &StaffUser, remember_me: bool) -> Result<IssuedSession> {
        let now = Utc::now();
        let expires_at = now + self.lifetime(remember_me);
        let session_id = Uuid::now_v7().to_string();

        let claims = SessionClaims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            jti: session_id.clone(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        let mut active = self.active.write().await;
        // Drop sessions that ran out without a logout
        active.retain(|_, expiry| *expiry > now);
        active.insert(session_id.clone(), expires_at);

        tracing::info!(
            "Session created for {} (remember_me={}, active_sessions={})",
            user.id,
            remember_me,
            active.len()
        );

        Ok(IssuedSession {
            token,
            session_id,
            expires_at,
        })
    }

    pub async fn validate(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = self.config.leeway.as_secs();

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))?
            .claims;

        if !self.active.read().await.contains_key(&claims.jti) {
            return Err(AppError::Unauthorized(
                "Session has ended, please sign in again".to_string(),
            ));
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
            session_id: claims.jti,
            expires_at,
        })
    }

    /// End a session. Returns false when it was not active.
    pub async fn destroy(&self, session_id: &str) -> bool {
        let removed = self.active.write().await.remove(session_id).is_some();
        if removed {
            tracing::info!("Session {} destroyed", session_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::ROLE_ADMIN;
    use tokio_test::assert_ok;

    fn session_config() -> SessionConfig {
        SessionConfig {
            secret: "test-session-secret-with-32-chars!!".to_string(),
            issuer: "riskcase-test".to_string(),
            ttl: std::time::Duration::from_secs(24 * 60 * 60),
            remember_ttl: std::time::Duration::from_secs(30 * 24 * 60 * 60),
            leeway: std::time::Duration::from_secs(0),
        }
    }

    fn staff() -> StaffUser {
        StaffUser {
            id: "emp-1".to_string(),
            email: "anna@riskcase.test".to_string(),
            name: "Anna Berger".to_string(),
            role: ROLE_ADMIN.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_validate() {
        let service = SessionService::new(session_config());
        let session = service.create(&staff(), false).await.unwrap();

        let user = assert_ok!(service.validate(&session.token).await);
        assert_eq!(user.user_id, "emp-1");
        assert_eq!(user.session_id, session.session_id);
        assert_eq!(user.role, ROLE_ADMIN);
    }

    #[tokio::test]
    async fn test_remember_me_lasts_longer() {
        let service = SessionService::new(session_config());
        let short = service.create(&staff(), false).await.unwrap();
        let long = service.create(&staff(), true).await.unwrap();

        let diff = long.expires_at - short.expires_at;
        assert!(diff > Duration::days(28));
    }

    #[tokio::test]
    async fn test_destroyed_session_is_rejected() {
        let service = SessionService::new(session_config());
        let session = service.create(&staff(), false).await.unwrap();

        assert!(service.destroy(&session.session_id).await);
        assert!(!service.destroy(&session.session_id).await);

        let result = service.validate(&session.token).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let service = SessionService::new(session_config());
        let mut other_config = session_config();
        other_config.secret = "another-secret-that-is-long-enough!!".to_string();
        let other = SessionService::new(other_config);

        let session = other.create(&staff(), false).await.unwrap();
        assert!(matches!(
            service.validate(&session.token).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            service.validate("not-a-token").await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
