//! In-memory user repository
//!
//! Used by tests and for running the service without a database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn email_taken_by_other(&self, email: &Email, user_id: &UserId) -> bool {
        self.users
            .iter()
            .any(|entry| entry.email == *email && entry.user_id != *user_id)
    }

    fn find_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        if self.email_taken_by_other(&user.email, &user.user_id) {
            return Err(AuthError::EmailInUse);
        }
        self.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.get(user_id).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.find_where(|u| u.email == *email))
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> AuthResult<Option<User>> {
        Ok(self.find_where(|u| u.reset_token_hash.as_deref() == Some(token_hash)))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.iter().any(|entry| entry.email == *email))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| (u.created_at, *u.user_id.as_uuid()));
        Ok(users)
    }

    async fn update(&self, user: &User) -> AuthResult<bool> {
        if self.email_taken_by_other(&user.email, &user.user_id) {
            return Err(AuthError::EmailInUse);
        }
        match self.users.get_mut(&user.user_id) {
            Some(mut entry) => {
                *entry = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_reset_token(
        &self,
        user_id: &UserId,
        token_hash: &str,
        password: &UserPassword,
        now: DateTime<Utc>,
    ) -> AuthResult<bool> {
        let Some(mut entry) = self.users.get_mut(user_id) else {
            return Ok(false);
        };
        let live = entry.reset_token_hash.as_deref() == Some(token_hash)
            && entry.reset_token_expires_at.is_some_and(|expires_at| expires_at > now);
        if !live {
            return Ok(false);
        }
        entry.change_password(password.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.users.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName, user_password::RawPassword, user_role::UserRole,
    };

    fn password(raw: &str) -> UserPassword {
        UserPassword::from_raw(&RawPassword::for_verification(raw.to_string()), None).unwrap()
    }

    #[tokio::test]
    async fn test_consume_reset_token_only_once() {
        let repo = InMemoryUserRepository::new();
        let mut user = User::new(
            DisplayName::new("Sara").unwrap(),
            Email::new("sara@example.com").unwrap(),
            password("Orange#Tiger42"),
            UserRole::User,
        );
        let token = user.issue_reset_token(Duration::minutes(15));
        repo.create(&user).await.unwrap();

        let new_password = password("Fresh#Start77");
        let now = Utc::now();
        assert!(!repo
            .consume_reset_token(&user.user_id, "other", &new_password, now)
            .await
            .unwrap());
        assert!(!repo
            .consume_reset_token(&user.user_id, &token.hash(), &new_password, now + Duration::hours(1))
            .await
            .unwrap());
        assert!(repo
            .consume_reset_token(&user.user_id, &token.hash(), &new_password, now)
            .await
            .unwrap());
        assert!(!repo
            .consume_reset_token(&user.user_id, &token.hash(), &new_password, now)
            .await
            .unwrap());

        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.password_change_count, 1);
        assert!(stored.reset_token_hash.is_none());
        assert_eq!(stored.password, new_password);
    }
}
