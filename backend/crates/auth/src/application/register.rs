//! Register Use Case
//!
//! Creates a customer account and signs it in straight away.

use std::sync::Arc;

use platform::jwt::{JwtKeys, TokenPair};

use crate::application::config::AuthConfig;
use crate::application::{non_blank, token_subject};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

pub struct RegisterOutput {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    keys: Arc<JwtKeys>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, keys: Arc<JwtKeys>) -> Self {
        Self { repo, config, keys }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(input.name),
            non_blank(input.email),
            input.password.filter(|p| !p.trim().is_empty()),
        ) else {
            return Err(AuthError::validation("All fields are required"));
        };

        if let Some(confirm) = input.confirm_password {
            if confirm != password {
                return Err(AuthError::validation("register.passwordMismatch"));
            }
        }

        let name = DisplayName::new(name)?;
        let email = Email::new(email)?;
        let raw_password = RawPassword::new(password)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailInUse);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(name, email, password, UserRole::User);
        self.repo.create(&user).await?;

        let tokens = self
            .keys
            .issue_pair(&token_subject(&user))
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(RegisterOutput { user, tokens })
    }
}
