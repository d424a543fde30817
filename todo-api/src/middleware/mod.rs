/// Middleware modules for the web server
///
/// - `session`: Session cookie resolution and the login gate
/// - `security`: Security headers

pub mod security;
pub mod session;
