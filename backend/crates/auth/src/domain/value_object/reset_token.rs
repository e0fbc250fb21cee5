//! Password reset token
//!
//! The clear token only ever travels in the reset link; the database keeps
//! its SHA-256 so a leaked table cannot be used to reset passwords.

use platform::crypto::{constant_time_eq, random_token_hex, sha256_hex};
use std::fmt;

/// Random bytes per token (rendered as 64 hex characters)
pub const RESET_TOKEN_BYTES: usize = 32;

pub struct ResetToken(String);

impl ResetToken {
    pub fn generate() -> Self {
        Self(random_token_hex(RESET_TOKEN_BYTES))
    }

    /// Wrap a token received from a client (already trimmed)
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex SHA-256, the only form that is persisted
    pub fn hash(&self) -> String {
        sha256_hex(self.0.as_bytes())
    }

    pub fn matches_hash(&self, stored_hash: &str) -> bool {
        constant_time_eq(self.hash().as_bytes(), stored_hash.as_bytes())
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResetToken").field(&"[REDACTED]").finish()
    }
}
