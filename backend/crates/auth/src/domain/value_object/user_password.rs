//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.
//!
//! - [`RawPassword::new`] enforces the storefront policy and is used for every
//!   password a user *chooses* (register, reset, change, create-admin).
//! - [`RawPassword::for_verification`] skips the policy and is used for
//!   passwords a user *presents* (login, old password).
//!
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! let raw = RawPassword::new("Orange#Tiger42".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized when dropped
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a newly chosen password
    ///
    /// Errors carry a user-facing message and an action hint.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(policy_error)?;
        Ok(Self(clear_text))
    }

    /// Wrap a password that is only checked against a stored hash
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(e: PasswordPolicyError) -> AppError {
    let action = match e {
        PasswordPolicyError::TooShort { .. } => "Please choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Please choose a shorter password",
        PasswordPolicyError::EmptyOrWhitespace => "Please enter a password",
        PasswordPolicyError::InvalidCharacter => "Please remove any control characters",
        PasswordPolicyError::MissingCharacterClass(_) => {
            "Use upper and lower case letters, a digit and a special character"
        }
        PasswordPolicyError::CommonPattern => "Please choose a more unique password",
    };
    AppError::bad_request(e.to_string()).with_action(action)
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(pepper)
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string).map_err(|e| {
            AppError::new(
                ErrorKind::InternalServerError,
                "Invalid password hash in database",
            )
            .with_source(e)
        })?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `pepper` must match the one used when hashing
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    pub fn needs_rehash(&self) -> bool {
        self.0.needs_rehash()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_policy_messages() {
        let err = RawPassword::new("short".to_string()).unwrap_err();
        assert!(err.message().starts_with("Password must be at least 8"));
        assert!(err.action().is_some());

        let err = RawPassword::new("orange#tiger42".to_string()).unwrap_err();
        assert_eq!(err.message(), "Password must contain an uppercase letter");

        assert!(RawPassword::new("Password1!".to_string()).is_err());
    }

    #[test]
    fn test_verification_skips_policy() {
        // Accounts created under an older, weaker policy can still log in
        let raw = RawPassword::for_verification("weak".to_string());
        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(hashed.verify(&RawPassword::for_verification("weak".to_string()), None));
    }

    #[test]
    fn test_hash_verify_and_restore() {
        let raw = RawPassword::new("Orange#Tiger42".to_string()).unwrap();
        let pepper = b"pepper";
        let hashed = UserPassword::from_raw(&raw, Some(pepper)).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw, Some(pepper)));
        assert!(!restored.verify(&raw, None));

        let wrong = RawPassword::for_verification("Orange#Tiger43".to_string());
        assert!(!restored.verify(&wrong, Some(pepper)));
    }

    #[test]
    fn test_invalid_phc_from_db() {
        let err = UserPassword::from_phc_string("$2b$10$bcrypt-hash").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::for_verification("Secret#Value9".to_string());
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
