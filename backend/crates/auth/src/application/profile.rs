//! Profile Use Cases
//!
//! Self-service operations on the authenticated user's own account.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::non_blank;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

const USER_NOT_FOUND: &str = "profile.user_not_found";

pub struct ProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl<R> ProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound(USER_NOT_FOUND))
    }

    /// Blank fields are left untouched
    pub async fn update(&self, user_id: &UserId, input: UpdateProfileInput) -> AuthResult<User> {
        let name = non_blank(input.name).map(DisplayName::new).transpose()?;
        let email = non_blank(input.email).map(Email::new).transpose()?;

        let mut user = self.get(user_id).await?;

        if let Some(email) = &email {
            if *email != user.email && self.repo.exists_by_email(email).await? {
                return Err(AuthError::validation("profile.email_in_use"));
            }
        }

        user.apply_profile_update(name, email);

        match self.repo.update(&user).await {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::NotFound(USER_NOT_FOUND)),
            // Lost a race with another account taking the same email
            Err(AuthError::EmailInUse) => {
                return Err(AuthError::validation("profile.email_in_use"));
            }
            Err(e) => return Err(e),
        }

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }

    pub async fn delete(&self, user_id: &UserId) -> AuthResult<()> {
        if !self.repo.delete(user_id).await? {
            return Err(AuthError::NotFound(USER_NOT_FOUND));
        }
        tracing::info!(user_id = %user_id, "Account deleted by owner");
        Ok(())
    }
}
