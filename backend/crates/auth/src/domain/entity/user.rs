//! User Entity

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, reset_token::ResetToken,
    user_password::UserPassword, user_role::UserRole,
};

/// Storefront account
///
/// Credentials live on the entity itself; the response DTO decides what is
/// safe to expose.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique, lower-cased
    pub email: Email,
    pub password: UserPassword,
    pub role: UserRole,
    /// SHA-256 of the pending reset token, if any
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub last_password_change: Option<DateTime<Utc>>,
    pub password_change_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: DisplayName, email: Email, password: UserPassword, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password,
            role,
            reset_token_hash: None,
            reset_token_expires_at: None,
            last_password_change: None,
            password_change_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash and invalidate any pending reset link
    pub fn change_password(&mut self, password: UserPassword) {
        let now = Utc::now();
        self.password = password;
        self.last_password_change = Some(now);
        self.password_change_count = self.password_change_count.saturating_add(1);
        self.clear_reset_token();
        self.updated_at = now;
    }

    /// Start a reset; any earlier token stops working
    pub fn issue_reset_token(&mut self, ttl: Duration) -> ResetToken {
        let token = ResetToken::generate();
        let now = Utc::now();
        self.reset_token_hash = Some(token.hash());
        self.reset_token_expires_at = Some(now + ttl);
        self.updated_at = now;
        token
    }

    pub fn reset_token_matches(&self, token: &ResetToken, now: DateTime<Utc>) -> bool {
        match (&self.reset_token_hash, self.reset_token_expires_at) {
            (Some(hash), Some(expires_at)) => expires_at > now && token.matches_hash(hash),
            _ => false,
        }
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_token_hash = None;
        self.reset_token_expires_at = None;
    }

    /// Apply whichever profile fields were supplied
    pub fn apply_profile_update(&mut self, name: Option<DisplayName>, email: Option<Email>) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn user() -> User {
        let raw = RawPassword::for_verification("Orange#Tiger42".to_string());
        User::new(
            DisplayName::new("Sara").unwrap(),
            Email::new("sara@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            UserRole::User,
        )
    }

    #[test]
    fn test_reset_token_lifecycle() {
        let mut user = user();
        let token = user.issue_reset_token(Duration::hours(1));
        let now = Utc::now();

        assert!(user.reset_token_matches(&token, now));
        assert!(!user.reset_token_matches(&token, now + Duration::hours(2)));
        assert!(!user.reset_token_matches(&ResetToken::from_client("x"), now));

        // Reissuing invalidates the previous token
        let second = user.issue_reset_token(Duration::hours(1));
        assert!(!user.reset_token_matches(&token, now));
        assert!(user.reset_token_matches(&second, now));
    }

    #[test]
    fn test_change_password_updates_counters_and_clears_reset() {
        let mut user = user();
        let token = user.issue_reset_token(Duration::hours(1));
        let new_hash = user.password.clone();

        user.change_password(new_hash);

        assert_eq!(user.password_change_count, 1);
        assert!(user.last_password_change.is_some());
        assert!(!user.reset_token_matches(&token, Utc::now()));
        assert!(user.reset_token_hash.is_none());
    }

    #[test]
    fn test_apply_profile_update_partial() {
        let mut user = user();
        user.apply_profile_update(None, Some(Email::new("new@example.com").unwrap()));

        assert_eq!(user.name.as_str(), "Sara");
        assert_eq!(user.email.as_str(), "new@example.com");
    }
}
