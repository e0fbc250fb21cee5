//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random tokens)
//! - Password hashing (Argon2id) and the storefront password policy
//! - JWT access/refresh token issuance and verification
//! - Cookie management
//! - Client IP extraction
//! - Fixed-window rate limiting
//! - Environment configuration helpers

pub mod client;
pub mod config;
pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod rate_limit;
