use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::CustomerLinkConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::CUSTOMER_LINK_SCOPE;

/// Claims of a customer response link token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkClaims {
    pub case_id: i64,
    pub scope: String,
    pub iss: String,
    pub aud: String,
    /// Link id; response drafts are keyed by it
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed link token
#[derive(Debug, Clone)]
pub struct IssuedLinkToken {
    pub token: String,
    pub link_id: String,
    pub expires_at: DateTime<Utc>,
}

/// What a valid link token grants access to
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGrant {
    pub case_id: i64,
    pub link_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Checks a (case id, token) pair presented by a customer
#[async_trait]
pub trait LinkTokenValidator: Send + Sync {
    /// Any failure is reported as `AccessDenied`
    async fn validate(&self, case_id: i64, token: &str) -> Result<LinkGrant>;
}

/// Signs and verifies HS256 customer link tokens
pub struct LinkTokenService {
    config: CustomerLinkConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl LinkTokenService {
    pub fn new(config: CustomerLinkConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for a case with the configured lifetime
    pub fn issue(&self, case_id: i64) -> Result<IssuedLinkToken> {
        let expires_at = Utc::now() + Duration::seconds(self.config.ttl.as_secs() as i64);
        self.issue_with_expiry(case_id, expires_at)
    }

    pub fn issue_with_expiry(
        &self,
        case_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<IssuedLinkToken> {
        let link_id = Uuid::now_v7().to_string();
        let claims = LinkClaims {
            case_id,
            scope: CUSTOMER_LINK_SCOPE.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: link_id.clone(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign link token: {}", e)))?;

        tracing::debug!("Issued link {} for case {}", link_id, case_id);

        Ok(IssuedLinkToken {
            token,
            link_id,
            expires_at,
        })
    }

    fn decode_claims(&self, token: &str) -> Result<LinkClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.leeway = 0;

        decode::<LinkClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected link token: {}", e);
                AppError::AccessDenied(format!("Invalid link token: {}", e))
            })
    }
}

#[async_trait]
impl LinkTokenValidator for LinkTokenService {
    async fn validate(&self, case_id: i64, token: &str) -> Result<LinkGrant> {
        let claims = self.decode_claims(token)?;

        if claims.scope != CUSTOMER_LINK_SCOPE {
            return Err(AppError::AccessDenied(format!(
                "Link token has scope '{}'",
                claims.scope
            )));
        }
        if claims.case_id != case_id {
            tracing::warn!(
                "Link {} for case {} presented for case {}",
                claims.jti,
                claims.case_id,
                case_id
            );
            return Err(AppError::AccessDenied(
                "Link token was issued for another case".to_string(),
            ));
        }

        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
        Ok(LinkGrant {
            case_id,
            link_id: claims.jti,
            expires_at,
        })
    }
}
