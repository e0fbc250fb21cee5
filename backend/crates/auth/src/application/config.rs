//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::config::{env_flag, env_opt, env_or, env_parse, split_list};
use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::jwt::JwtKeys;
use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("{0} must be set when APP_ENV=production")]
    MissingSecret(&'static str),
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    pub jwt_access_secret: Vec<u8>,
    /// HMAC secret for refresh tokens (must differ from the access secret)
    pub jwt_refresh_secret: Vec<u8>,
    pub access_token_ttl: Duration,
    /// Also the refresh cookie's Max-Age
    pub refresh_token_ttl: Duration,
    /// Lifetime of a password reset link
    pub reset_token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Frontend origins; the first one is used to build reset links
    pub frontend_origins: Vec<String>,
    pub login_limit: RateLimitConfig,
    pub forgot_password_limit: RateLimitConfig,
    pub reset_password_limit: RateLimitConfig,
    /// Keyed per user rather than per IP
    pub change_password_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_access_secret: Vec::new(),
            jwt_refresh_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            reset_token_ttl: Duration::from_secs(3600),
            cookie_secure: true,
            password_pepper: None,
            frontend_origins: vec![DEFAULT_FRONTEND_URL.to_string()],
            login_limit: RateLimitConfig::from_millis(5, 15 * 60 * 1000),
            forgot_password_limit: RateLimitConfig::from_millis(3, 15 * 60 * 1000),
            reset_password_limit: RateLimitConfig::from_millis(5, 15 * 60 * 1000),
            change_password_limit: RateLimitConfig::from_millis(5, 5 * 60 * 1000),
        }
    }
}

impl AuthConfig {
    /// Create config with random JWT secrets
    pub fn with_random_secrets() -> Self {
        Self {
            jwt_access_secret: random_bytes(32),
            jwt_refresh_secret: random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Read the environment (variables are listed in `.env.example`)
    ///
    /// Outside production, missing JWT secrets are replaced by random ones so
    /// tokens simply stop validating after a restart.
    pub fn from_env() -> Result<Self, AuthConfigError> {
        let production = env_or("APP_ENV", "development") == "production";
        let defaults = Self::default();

        let access_secret = secret_from_env("JWT_SECRET", production)?;
        let refresh_secret = secret_from_env("JWT_REFRESH_SECRET", production)?;

        let limit = |prefix: &str, fallback: &RateLimitConfig| {
            RateLimitConfig::from_millis(
                env_parse(&format!("{prefix}_MAX_ATTEMPTS"), fallback.max_requests),
                env_parse(
                    &format!("{prefix}_WINDOW_MS"),
                    fallback.window.as_millis() as u64,
                ),
            )
        };

        let mut frontend_origins = split_list(&env_or("FRONTEND_URL", DEFAULT_FRONTEND_URL));
        if frontend_origins.is_empty() {
            frontend_origins.push(DEFAULT_FRONTEND_URL.to_string());
        }

        Ok(Self {
            jwt_access_secret: access_secret,
            jwt_refresh_secret: refresh_secret,
            access_token_ttl: Duration::from_secs(env_parse(
                "ACCESS_TOKEN_TTL_SECS",
                defaults.access_token_ttl.as_secs(),
            )),
            refresh_token_ttl: Duration::from_secs(env_parse(
                "REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_token_ttl.as_secs(),
            )),
            reset_token_ttl: defaults.reset_token_ttl,
            cookie_secure: production || env_flag("COOKIE_SECURE"),
            password_pepper: env_opt("PASSWORD_PEPPER").map(String::into_bytes),
            frontend_origins,
            login_limit: limit("LOGIN", &defaults.login_limit),
            forgot_password_limit: limit("FORGOT", &defaults.forgot_password_limit),
            reset_password_limit: limit("RESET", &defaults.reset_password_limit),
            change_password_limit: limit("CHANGE_PASSWORD", &defaults.change_password_limit),
        })
    }

    pub fn jwt_keys(&self) -> JwtKeys {
        JwtKeys::new(
            &self.jwt_access_secret,
            &self.jwt_refresh_secret,
            self.access_token_ttl,
            self.refresh_token_ttl,
        )
    }

    /// Cookie carrying the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig::refresh_token(self.cookie_secure, self.refresh_token_ttl.as_secs() as i64)
    }

    /// Link the user follows to pick a new password
    pub fn reset_link(&self, token: &str) -> String {
        let base = self
            .frontend_origins
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_FRONTEND_URL)
            .trim_end_matches('/');
        format!("{base}/reset-password?token={token}")
    }

    pub fn reset_token_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.reset_token_ttl).unwrap_or(chrono::Duration::hours(1))
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

fn secret_from_env(name: &'static str, production: bool) -> Result<Vec<u8>, AuthConfigError> {
    match env_opt(name) {
        Some(secret) => Ok(secret.into_bytes()),
        None if production => Err(AuthConfigError::MissingSecret(name)),
        None => {
            tracing::warn!(
                variable = name,
                "JWT secret not set, using a random one (tokens will not survive a restart)"
            );
            Ok(random_bytes(32))
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secrets", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("reset_token_ttl", &self.reset_token_ttl)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("frontend_origins", &self.frontend_origins)
            .field("login_limit", &self.login_limit)
            .field("forgot_password_limit", &self.forgot_password_limit)
            .field("reset_password_limit", &self.reset_password_limit)
            .field("change_password_limit", &self.change_password_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_token_ttl, Duration::from_secs(900));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.login_limit.max_requests, 5);
        assert_eq!(config.forgot_password_limit.max_requests, 3);
        assert_eq!(config.change_password_limit.window, Duration::from_secs(300));
    }

    #[test]
    fn test_development_has_distinct_secrets() {
        let config = AuthConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.jwt_access_secret.len(), 32);
        assert_ne!(config.jwt_access_secret, config.jwt_refresh_secret);
    }

    #[test]
    fn test_reset_link() {
        let config = AuthConfig {
            frontend_origins: vec!["https://shop.example/".to_string()],
            ..AuthConfig::default()
        };
        assert_eq!(
            config.reset_link("abc"),
            "https://shop.example/reset-password?token=abc"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            jwt_access_secret: b"very-secret".to_vec(),
            ..AuthConfig::default()
        };
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
