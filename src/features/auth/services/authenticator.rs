use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::core::config::AccountsConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::StaffUser;

/// Checks staff credentials
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<StaffUser>;
}

struct Account {
    user: StaffUser,
    password_sha256: String,
}

/// Authenticator backed by the accounts listed in configuration
pub struct AccountAuthenticator {
    accounts: Vec<Account>,
}

impl AccountAuthenticator {
    pub fn new(config: &AccountsConfig) -> Self {
        let accounts = config
            .accounts
            .iter()
            .enumerate()
            .map(|(index, entry)| Account {
                user: StaffUser {
                    id: format!("emp-{}", index + 1),
                    email: entry.email.clone(),
                    name: entry.name.clone(),
                    role: entry.role.clone(),
                },
                password_sha256: entry.password_sha256.clone(),
            })
            .collect();

        Self { accounts }
    }
}

pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl Authenticator for AccountAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> Result<StaffUser> {
        let email = email.trim().to_lowercase();
        let digest = password_digest(password);

        // Same error for unknown email and wrong password
        let account = self
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password_sha256 == digest)
            .ok_or_else(|| {
                tracing::info!("Rejected login attempt for {}", email);
                AppError::Unauthorized("Invalid credentials".to_string())
            })?;

        tracing::info!("Staff user {} authenticated", account.user.id);
        Ok(account.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> AccountAuthenticator {
        let raw = format!(
            "anna@riskcase.test|{}|Anna Berger|admin;tom@riskcase.test|{}|Tom Huber|employee",
            password_digest("s3cret-pass"),
            password_digest("other-pass"),
        );
        AccountAuthenticator::new(&AccountsConfig::parse(&raw).unwrap())
    }

    #[tokio::test]
    async fn test_authenticate_success_is_case_insensitive_on_email() {
        let user = authenticator()
            .authenticate("Anna@Riskcase.test", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(user.id, "emp-1");
        assert_eq!(user.role, "admin");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password() {
        let result = authenticator()
            .authenticate("tom@riskcase.test", "s3cret-pass")
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unknown_email() {
        let result = authenticator()
            .authenticate("nobody@riskcase.test", "s3cret-pass")
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_password_digest_is_hex_sha256() {
        assert_eq!(
            password_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
