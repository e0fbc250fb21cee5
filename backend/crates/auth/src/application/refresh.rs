//! Refresh Use Case
//!
//! Trades a refresh token for a new access token. Claims are rebuilt from
//! the stored user, so role or email changes apply at the next refresh and a
//! deleted account cannot refresh at all.

use std::sync::Arc;

use kernel::id::UserId;
use platform::jwt::{JwtKeys, TokenKind};

use crate::application::token_subject;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    keys: Arc<JwtKeys>,
}

impl<R> RefreshUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, keys: Arc<JwtKeys>) -> Self {
        Self { repo, keys }
    }

    /// Returns the new access token
    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<String> {
        let token = refresh_token.ok_or(AuthError::MissingRefreshToken)?;

        let claims = self
            .keys
            .verify(TokenKind::Refresh, token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;

        let user_id: UserId = claims
            .id
            .parse()
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        self.keys
            .issue(TokenKind::Access, &token_subject(&user))
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
