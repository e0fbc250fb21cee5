//! HTTP Handlers for `/superadmin`
//!
//! Mounted behind `authenticate` + `require_role(superadmin)`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::UserId;

use crate::application::{AdminUseCase, CreateAdminInput, UpdateUserInput};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    CreateAdminRequest, MessageResponse, MessageWithUser, UpdateUserRequest, UserResponse,
    UsersEnvelope,
};
use crate::presentation::handlers::{AuthAppState, json_body};
use crate::presentation::middleware::AuthUser;

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse::<UserId>()
        .map_err(|_| AuthError::validation("Invalid user id"))
}

/// POST /superadmin/create-admin
pub async fn create_admin<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    body: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;
    let user = AdminUseCase::new(state.repo.clone(), state.config.clone())
        .create_admin(
            &auth.user_id,
            CreateAdminInput {
                name: req.name,
                email: req.email,
                password: req.password,
                role: req.role,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("{} created successfully", user.role))),
    ))
}

/// GET /superadmin/users
pub async fn list_users<R>(State(state): State<AuthAppState<R>>) -> AuthResult<Json<UsersEnvelope>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = AdminUseCase::new(state.repo.clone(), state.config.clone())
        .list_users()
        .await?;

    Ok(Json(UsersEnvelope {
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// DELETE /superadmin/user/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    AdminUseCase::new(state.repo.clone(), state.config.clone())
        .delete_user(&auth.user_id, &user_id)
        .await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// PATCH /superadmin/user/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AuthResult<Json<MessageWithUser>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;
    let user_id = parse_user_id(&id)?;

    let user = AdminUseCase::new(state.repo.clone(), state.config.clone())
        .update_user(
            &auth.user_id,
            &user_id,
            UpdateUserInput {
                name: req.name,
                email: req.email,
                role: req.role,
            },
        )
        .await?;

    Ok(Json(MessageWithUser {
        message: "User updated successfully".to_string(),
        user: UserResponse::from(&user),
    }))
}
