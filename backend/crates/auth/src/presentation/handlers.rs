//! HTTP Handlers for `/auth`

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::{REFRESH_COOKIE_NAME, delete_cookie_header, extract_cookie, set_cookie_header};
use platform::jwt::JwtKeys;
use platform::rate_limit::InMemoryRateLimitStore;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::password_reset::{FORGOT_PASSWORD_CHECK_EMAIL, RESET_PASSWORD_SUCCESS};
use crate::application::{
    ForgotPasswordUseCase, LoginInput, LoginUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, RefreshResponse, RegisterRequest,
    ResetPasswordRequest, SessionResponse, UserResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub keys: Arc<JwtKeys>,
    /// Shared by every limiter of the service; purge it periodically
    pub limiter: Arc<InMemoryRateLimitStore>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let keys = config.jwt_keys();
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            keys: Arc::new(keys),
            limiter: Arc::new(InMemoryRateLimitStore::new()),
        }
    }
}

impl<R> FromRef<AuthAppState<R>> for Arc<JwtKeys>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<R>) -> Self {
        state.keys.clone()
    }
}

/// Unreadable bodies become a 400 `{message}` instead of axum's plain-text rejection
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AuthError::validation(rejection.body_text()))
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.keys.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        })
        .await?;

    let cookie = set_cookie_header(&state.config.refresh_cookie(), &output.tokens.refresh_token);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            message: "User registered successfully".to_string(),
            access_token: output.tokens.access_token,
            user: UserResponse::from(&output.user),
        }),
    ))
}

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.keys.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = set_cookie_header(&state.config.refresh_cookie(), &output.tokens.refresh_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            message: "Login successful".to_string(),
            access_token: output.tokens.access_token,
            user: UserResponse::from(&output.user),
        }),
    ))
}

// ============================================================================
// Refresh / Logout
// ============================================================================

/// POST /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, REFRESH_COOKIE_NAME);

    let use_case = RefreshUseCase::new(state.repo.clone(), state.keys.clone());
    let access_token = use_case.execute(token.as_deref()).await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// POST /auth/logout
///
/// Tokens are stateless; logging out only drops the refresh cookie.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    (
        StatusCode::OK,
        [(header::SET_COOKIE, delete_cookie_header(&state.config.refresh_cookie()))],
        Json(MessageResponse::new("Logged out successfully")),
    )
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /auth/forgot-password
pub async fn forgot_password<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = ForgotPasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(req.email).await?;

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_CHECK_EMAIL)))
}

/// POST /auth/reset-password
pub async fn reset_password<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = ResetPasswordUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(ResetPasswordInput {
            token: req.token,
            new_password: req.new_password.or(req.password),
            confirm_password: req.confirm_password,
        })
        .await?;

    Ok(Json(MessageResponse::new(RESET_PASSWORD_SUCCESS)))
}
