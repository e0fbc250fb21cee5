//! Superadmin Use Cases
//!
//! User management reserved for the `superadmin` role. The role gate itself
//! lives in the presentation layer.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::non_blank;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_NOT_FOUND: &str = "User not found";

pub struct CreateAdminInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Only these fields can be changed through the admin panel
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub struct AdminUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AdminUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn create_admin(&self, actor: &UserId, input: CreateAdminInput) -> AuthResult<User> {
        let (Some(name), Some(email), Some(password), Some(role)) = (
            non_blank(input.name),
            non_blank(input.email),
            input.password.filter(|p| !p.trim().is_empty()),
            non_blank(input.role),
        ) else {
            return Err(AuthError::validation("All fields are required"));
        };

        let role = UserRole::from_code(&role)
            .filter(UserRole::is_assignable_admin)
            .ok_or(AuthError::InvalidRole)?;

        let name = DisplayName::new(name)?;
        let email = Email::new(email)?;
        let raw_password = RawPassword::new(password)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::UserExists);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(name, email, password, role);
        self.repo.create(&user).await.map_err(|e| match e {
            AuthError::EmailInUse => AuthError::UserExists,
            other => other,
        })?;

        tracing::info!(actor = %actor, user_id = %user.user_id, role = %role, "Admin account created");
        Ok(user)
    }

    pub async fn list_users(&self) -> AuthResult<Vec<User>> {
        self.repo.list().await
    }

    pub async fn delete_user(&self, actor: &UserId, user_id: &UserId) -> AuthResult<()> {
        if !self.repo.delete(user_id).await? {
            return Err(AuthError::NotFound(USER_NOT_FOUND));
        }
        tracing::info!(actor = %actor, user_id = %user_id, "User deleted by superadmin");
        Ok(())
    }

    pub async fn update_user(
        &self,
        actor: &UserId,
        user_id: &UserId,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        let role = non_blank(input.role)
            .map(|code| UserRole::from_code(&code).ok_or(AuthError::InvalidRole))
            .transpose()?;
        let name = non_blank(input.name).map(DisplayName::new).transpose()?;
        let email = non_blank(input.email).map(Email::new).transpose()?;

        let mut user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound(USER_NOT_FOUND))?;

        if let Some(email) = &email {
            if *email != user.email && self.repo.exists_by_email(email).await? {
                return Err(AuthError::UserExists);
            }
        }

        user.apply_profile_update(name, email);
        if let Some(role) = role {
            user.set_role(role);
        }

        match self.repo.update(&user).await {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::NotFound(USER_NOT_FOUND)),
            Err(AuthError::EmailInUse) => return Err(AuthError::UserExists),
            Err(e) => return Err(e),
        }

        tracing::info!(actor = %actor, user_id = %user_id, role = %user.role, "User updated by superadmin");
        Ok(user)
    }
}
