//! Auth Middleware
//!
//! Bearer-token authentication and role gates for protected routes.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::jwt::{JwtKeys, TokenKind};

use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

/// Identity of the caller, taken from a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Verify `Authorization: Bearer <access token>`
    pub fn from_headers(headers: &HeaderMap, keys: &JwtKeys) -> AuthResult<Self> {
        let token = bearer_token(headers).ok_or(AuthError::MissingAccessToken)?;

        let claims = keys.verify(TokenKind::Access, token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            AuthError::InvalidAccessToken
        })?;

        let user_id = claims
            .id
            .parse()
            .map_err(|_| AuthError::InvalidAccessToken)?;
        let role = UserRole::from_code(&claims.role).ok_or(AuthError::InvalidAccessToken)?;

        Ok(Self {
            user_id,
            email: claims.email,
            role,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reuses the identity stored by [`authenticate`] when present
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        let keys = Arc::<JwtKeys>::from_ref(state);
        AuthUser::from_headers(&parts.headers, &keys)
    }
}

/// Middleware that requires a valid access token and stores [`AuthUser`]
/// in the request extensions
pub async fn authenticate(
    State(keys): State<Arc<JwtKeys>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = AuthUser::from_headers(req.headers(), &keys)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Roles allowed through [`require_role`]
#[derive(Debug, Clone)]
pub struct RoleGuard {
    roles: Arc<[UserRole]>,
}

impl RoleGuard {
    pub fn new(roles: impl Into<Arc<[UserRole]>>) -> Self {
        Self {
            roles: roles.into(),
        }
    }

    pub fn allows(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

/// Middleware that requires an [`AuthUser`] (put there by [`authenticate`])
/// whose role is in the guard's list
pub async fn require_role(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::Unauthorized)?;

    if !guard.allows(user.role) {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "Role not permitted");
        return Err(AuthError::AccessDenied);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_role_guard() {
        let guard = RoleGuard::new(vec![UserRole::SuperAdmin]);
        assert!(guard.allows(UserRole::SuperAdmin));
        assert!(!guard.allows(UserRole::Admin));
    }
}
