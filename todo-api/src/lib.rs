//! # Todo Web Server Library
//!
//! Server-rendered todo list: accounts, sessions and per-user tasks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Form bodies and their validation rules
//! - `middleware`: Session resolution and security headers
//! - `routes`: Route handlers
//! - `views`: HTML rendering

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod views;
