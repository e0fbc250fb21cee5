//! Presentation Layer
//!
//! HTTP handlers, DTOs, routers, and middleware.

pub mod admin_handlers;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod rate_limit;
pub mod router;
pub mod user_handlers;

pub use handlers::AuthAppState;
pub use middleware::{AuthUser, RoleGuard, authenticate, require_role};
pub use router::{auth_router, auth_routes, superadmin_routes, user_routes};
