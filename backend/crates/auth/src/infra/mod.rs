//! Infrastructure Layer
//!
//! PostgreSQL repository for production, in-memory repository for tests.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
