//! Core business logic for the IT budget backend.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence needed by the logic is expressed as traits the db crate implements.
//!
//! # Modules
//!
//! - `budget` - Plans, display-ID allocation, usage aggregation, filter options
//! - `auth` - Password hashing and password policy

pub mod auth;
pub mod budget;
