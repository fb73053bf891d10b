use std::env;
use std::time::Duration;

use crate::shared::constants::{ROLE_ADMIN, ROLE_EMPLOYEE};
use crate::shared::i18n::Locale;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub session: SessionConfig,
    pub customer_link: CustomerLinkConfig,
    pub accounts: AccountsConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Base URL of the web frontend, used to build customer links
    pub frontend_url: String,
    pub default_locale: Locale,
}

/// Staff session tokens
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of a session-only login
    pub ttl: Duration,
    /// Lifetime of a "remember me" login
    pub remember_ttl: Duration,
    pub leeway: Duration,
}

/// Signed customer response links
#[derive(Clone, Debug)]
pub struct CustomerLinkConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

/// A staff account accepted by the demo authenticator
#[derive(Clone, Debug)]
pub struct AccountEntry {
    pub email: String,
    /// Lowercase hex SHA-256 digest of the password
    pub password_sha256: String,
    pub name: String,
    pub role: String,
}

#[derive(Clone, Debug)]
pub struct AccountsConfig {
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            session: SessionConfig::from_env()?,
            customer_link: CustomerLinkConfig::from_env()?,
            accounts: AccountsConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string())
            .trim_end_matches('/')
            .to_string();

        let default_locale = match env::var("DEFAULT_LOCALE") {
            Ok(code) => Locale::from_code(&code)
                .ok_or_else(|| format!("DEFAULT_LOCALE '{}' is not supported (en, de)", code))?,
            Err(_) => Locale::En,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
            frontend_url,
            default_locale,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads a signing secret and rejects anything too short for HS256
fn secret_from_env(name: &str) -> Result<String, String> {
    const MIN_SECRET_LEN: usize = 32;

    let secret = env::var(name).map_err(|_| format!("{} environment variable is required", name))?;
    if secret.len() < MIN_SECRET_LEN {
        return Err(format!(
            "{} must be at least {} characters long",
            name, MIN_SECRET_LEN
        ));
    }
    Ok(secret)
}

impl SessionConfig {
    const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60; // 1 day
    const DEFAULT_REMEMBER_TTL_SECS: u64 = 30 * 24 * 60 * 60; // 30 days
    const DEFAULT_LEEWAY_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let secret = secret_from_env("SESSION_SECRET")?;
        let issuer = env::var("SESSION_ISSUER").unwrap_or_else(|_| "riskcase-core".to_string());

        let ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_TTL_SECS must be a valid number".to_string())?;

        let remember_ttl_secs = env::var("SESSION_REMEMBER_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REMEMBER_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_REMEMBER_TTL_SECS must be a valid number".to_string())?;

        let leeway_secs = env::var("SESSION_LEEWAY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SESSION_LEEWAY_SECS must be a valid number".to_string())?;

        Ok(Self {
            secret,
            issuer,
            ttl: Duration::from_secs(ttl_secs),
            remember_ttl: Duration::from_secs(remember_ttl_secs),
            leeway: Duration::from_secs(leeway_secs),
        })
    }
}

impl CustomerLinkConfig {
    const DEFAULT_TTL_SECS: u64 = 14 * 24 * 60 * 60; // 14 days

    pub fn from_env() -> Result<Self, String> {
        let secret = secret_from_env("CUSTOMER_LINK_SECRET")?;
        let issuer =
            env::var("CUSTOMER_LINK_ISSUER").unwrap_or_else(|_| "riskcase-core".to_string());
        let audience = env::var("CUSTOMER_LINK_AUDIENCE")
            .unwrap_or_else(|_| "customer-report".to_string());

        let ttl_secs = env::var("CUSTOMER_LINK_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CUSTOMER_LINK_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            secret,
            issuer,
            audience,
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl AccountsConfig {
    /// Parses `STAFF_ACCOUNTS`: entries separated by `;`, each
    /// `email|sha256-hex|name|role`.
    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("STAFF_ACCOUNTS")
            .map_err(|_| "STAFF_ACCOUNTS environment variable is required".to_string())?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut accounts = Vec::new();

        for entry in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
            let [email, digest, name, role] = parts.as_slice() else {
                return Err(format!(
                    "Invalid STAFF_ACCOUNTS entry '{}': expected email|sha256|name|role",
                    entry
                ));
            };

            if digest.len() != 64 || hex::decode(digest).is_err() {
                return Err(format!(
                    "Invalid password digest for account '{}': expected 64 hex characters",
                    email
                ));
            }

            if ![ROLE_ADMIN, ROLE_EMPLOYEE].contains(role) {
                return Err(format!(
                    "Invalid role '{}' for account '{}': expected {} or {}",
                    role, email, ROLE_ADMIN, ROLE_EMPLOYEE
                ));
            }

            accounts.push(AccountEntry {
                email: email.to_lowercase(),
                password_sha256: digest.to_lowercase(),
                name: name.to_string(),
                role: role.to_string(),
            });
        }

        if accounts.is_empty() {
            return Err("STAFF_ACCOUNTS must contain at least one account".to_string());
        }

        Ok(Self { accounts })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Riskcase API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Case management and customer response API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

    #[test]
    fn test_parse_accounts() {
        let raw = format!(
            "Admin@Example.com|{}|Demo User|admin; staff@example.com|{}|Staff|employee",
            DIGEST, DIGEST
        );
        let config = AccountsConfig::parse(&raw).unwrap();

        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].email, "admin@example.com");
        assert_eq!(config.accounts[1].role, "employee");
    }

    #[test]
    fn test_parse_accounts_rejects_bad_digest() {
        let err = AccountsConfig::parse("a@b.c|nothex|A|admin").unwrap_err();
        assert!(err.contains("digest"));
    }

    #[test]
    fn test_parse_accounts_rejects_missing_fields() {
        assert!(AccountsConfig::parse("a@b.c|abc").is_err());
        assert!(AccountsConfig::parse("  ;  ").is_err());
    }

    #[test]
    fn test_parse_accounts_rejects_unknown_role() {
        let err = AccountsConfig::parse(&format!("a@b.c|{}|A|owner", DIGEST)).unwrap_err();
        assert!(err.contains("owner"));
    }
}
