//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, routers, middleware
//!
//! ## Features
//! - Registration and login with email + password
//! - Short-lived JWT access tokens, refresh tokens in an `HttpOnly` cookie
//! - Password reset links (logged, not emailed) and password change
//! - Profile self-service and superadmin user management
//! - Fixed-window rate limiting on the credential endpoints
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Access and refresh tokens signed with separate secrets
//! - Reset tokens stored as SHA-256 only, single use, one hour
//! - Refresh re-reads the user, so role changes and deletions take effect

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, AuthConfigError};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::{AuthAppState, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
