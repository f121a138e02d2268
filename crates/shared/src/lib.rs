//! Shared errors, configuration, and token types for the IT budget backend.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Layered configuration (files + environment)
//! - JWT claims and the token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
