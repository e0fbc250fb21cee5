//! Auth Routers
//!
//! `/auth` is public (credential endpoints are rate limited), `/user` needs
//! an access token, `/superadmin` additionally needs the `superadmin` role.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{RoleGuard, authenticate, require_role};
use crate::presentation::rate_limit::{RouteRateLimit, limit_by_client_ip};
use crate::presentation::{admin_handlers, user_handlers};

/// `/auth`, `/user` and `/superadmin` in one router
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/user", user_routes(state.clone()))
        .nest("/superadmin", superadmin_routes(state))
}

/// Public authentication routes
pub fn auth_routes<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let limit = |config, scope, message_key| {
        RouteRateLimit::new(state.limiter.clone(), config, scope, message_key)
    };
    let login_limit = limit(
        state.config.login_limit.clone(),
        "login",
        "rateLimit.tooManyLogin",
    );
    let forgot_limit = limit(
        state.config.forgot_password_limit.clone(),
        "forgot-password",
        "rateLimit.tooManyForgot",
    );
    let reset_limit = limit(
        state.config.reset_password_limit.clone(),
        "reset-password",
        "rateLimit.tooManyReset",
    );

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route(
            "/login",
            post(handlers::login::<R>).layer(from_fn_with_state(login_limit, limit_by_client_ip)),
        )
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route(
            "/forgot-password",
            post(handlers::forgot_password::<R>)
                .layer(from_fn_with_state(forgot_limit, limit_by_client_ip)),
        )
        .route(
            "/reset-password",
            post(handlers::reset_password::<R>)
                .layer(from_fn_with_state(reset_limit, limit_by_client_ip)),
        )
        .with_state(state)
}

/// Self-service routes for any authenticated user
pub fn user_routes<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/profile", get(user_handlers::profile::<R>))
        .route("/update-profile", put(user_handlers::update_profile::<R>))
        .route("/change-password", post(user_handlers::change_password::<R>))
        .route("/delete-account", delete(user_handlers::delete_account::<R>))
        .layer(from_fn_with_state(state.keys.clone(), authenticate))
        .with_state(state)
}

/// User management, `superadmin` only
pub fn superadmin_routes<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = RoleGuard::new(vec![UserRole::SuperAdmin]);

    Router::new()
        .route("/create-admin", post(admin_handlers::create_admin::<R>))
        .route("/users", get(admin_handlers::list_users::<R>))
        .route(
            "/user/{id}",
            delete(admin_handlers::delete_user::<R>).patch(admin_handlers::update_user::<R>),
        )
        // Layers run bottom-up: authenticate first, then the role check
        .layer(from_fn_with_state(guard, require_role))
        .layer(from_fn_with_state(state.keys.clone(), authenticate))
        .with_state(state)
}
