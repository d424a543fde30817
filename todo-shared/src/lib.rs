//! # Todo Shared Library
//!
//! Data model, persistence and the authentication/authorization core of the
//! todo application. The web crate only translates HTTP to calls into here.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migrations
//! - `models`: Users and tasks with their database operations
//! - `auth`: Password hashing, credential store, sessions, ownership checks

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
