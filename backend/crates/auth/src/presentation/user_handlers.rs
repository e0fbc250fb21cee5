//! HTTP Handlers for `/user` (any authenticated user)

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::delete_cookie_header;

use crate::application::change_password::CHANGE_PASSWORD_SUCCESS;
use crate::application::{ChangePasswordInput, ChangePasswordUseCase, ProfileUseCase, UpdateProfileInput};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, MessageResponse, MessageWithUser, UpdateProfileRequest, UserEnvelope,
    UserResponse,
};
use crate::presentation::handlers::{AuthAppState, json_body};
use crate::presentation::middleware::AuthUser;
use crate::presentation::rate_limit::{RouteRateLimit, with_limit_headers};

/// GET /user/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone())
        .get(&auth.user_id)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// PUT /user/update-profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AuthResult<Json<MessageWithUser>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;
    let user = ProfileUseCase::new(state.repo.clone())
        .update(
            &auth.user_id,
            UpdateProfileInput {
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    Ok(Json(MessageWithUser {
        message: "profile.update_success".to_string(),
        user: UserResponse::from(&user),
    }))
}

/// POST /user/change-password
///
/// Limited per user id rather than per IP. The limit is counted before the
/// body is read, so malformed requests use up attempts too.
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Response
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let limit = RouteRateLimit::new(
        state.limiter.clone(),
        state.config.change_password_limit.clone(),
        "change-password",
        "Too many requests",
    );
    let limit_result = match limit.check(&auth.user_id.to_string()).await {
        Ok(result) => result,
        Err(rejection) => return rejection,
    };

    let outcome: AuthResult<_> = async {
        let req = json_body(body)?;
        ChangePasswordUseCase::new(state.repo.clone(), state.config.clone())
            .execute(
                &auth.user_id,
                ChangePasswordInput {
                    old_password: req.old_password,
                    new_password: req.new_password,
                    confirm_password: req.confirm_password,
                },
            )
            .await?;
        Ok(Json(MessageResponse::new(CHANGE_PASSWORD_SUCCESS)))
    }
    .await;

    with_limit_headers(outcome.into_response(), limit_result)
}

/// DELETE /user/delete-account
pub async fn delete_account<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    ProfileUseCase::new(state.repo.clone())
        .delete(&auth.user_id)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, delete_cookie_header(&state.config.refresh_cookie()))],
        Json(MessageResponse::new("Account deleted successfully")),
    ))
}
