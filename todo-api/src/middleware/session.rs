/// Session cookies and the login gate
///
/// The browser carries its session ID in the `todo_session` cookie, signed
/// with the key derived from `SECRET_KEY` through [`SignedCookieJar`]. A
/// cookie whose signature does not verify is never read. [`resolve_user`]
/// turns the cookie into the logged-in [`CurrentUser`], and [`require_login`]
/// guards routes that need one: anonymous requests are redirected to `/login`
/// with a one-shot flash message in the signed `todo_flash` cookie.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Extension, Router};
/// use todo_api::{app::AppState, middleware::session::{require_login, CurrentUser}};
///
/// async fn whoami(Extension(user): Extension<CurrentUser>) -> String {
///     user.email
/// }
///
/// # fn build(state: AppState) -> Router {
/// Router::new()
///     .route("/whoami", get(whoami))
///     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_login))
///     .with_state(state)
/// # }
/// ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use todo_shared::models::user::User;

use crate::{app::AppState, error::ApiResult};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "todo_session";

/// Name of the one-shot flash message cookie
pub const FLASH_COOKIE: &str = "todo_flash";

/// The logged-in user for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID
    pub id: i64,

    /// Email address
    pub email: String,

    /// Session the request was authenticated with
    pub session_id: String,
}

/// Messages carried across a redirect in the flash cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    /// Shown on the login page after a successful registration
    AccountCreated,

    /// Shown on the login page after being bounced from a protected route
    LoginRequired,
}

impl Flash {
    /// Cookie value for this message
    pub fn code(&self) -> &'static str {
        match self {
            Flash::AccountCreated => "account_created",
            Flash::LoginRequired => "login_required",
        }
    }

    /// Parses a code written by [`Flash::code`]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "account_created" => Some(Flash::AccountCreated),
            "login_required" => Some(Flash::LoginRequired),
            _ => None,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Flash::AccountCreated => "Your account has been created. You can now log in!",
            Flash::LoginRequired => "Please log in to access this page.",
        }
    }
}

fn app_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Session cookie for the browser session; no `Max-Age`
pub fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    app_cookie(SESSION_COOKIE, session_id, secure)
}

/// Flash cookie carrying `flash` to the next page
pub fn flash_cookie(flash: Flash, secure: bool) -> Cookie<'static> {
    app_cookie(FLASH_COOKIE, flash.code().to_string(), secure)
}

/// Cookie to pass to [`SignedCookieJar::remove`] to delete `name`
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Reads and parses the flash message, if any
pub fn read_flash(jar: &SignedCookieJar) -> Option<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| Flash::from_code(cookie.value()))
}

/// Resolves the session cookie to the logged-in user
///
/// Returns None when there is no cookie, its signature fails, the session
/// was logged out or has expired, or the user row no longer exists.
pub async fn resolve_user(state: &AppState, jar: &SignedCookieJar) -> ApiResult<Option<CurrentUser>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let session_id = cookie.value();

    let Some(user_id) = state.sessions.resolve(session_id).await else {
        return Ok(None);
    };

    let user = User::find_by_id(&state.db, user_id).await?;

    Ok(user.map(|user| CurrentUser {
        id: user.id,
        email: user.email,
        session_id: session_id.to_string(),
    }))
}

/// Login gate middleware
///
/// Inserts [`CurrentUser`] into the request extensions, or redirects
/// anonymous requests to `/login`.
pub async fn require_login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    match resolve_user(&state, &jar).await? {
        Some(user) => {
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "Anonymous request redirected to login");
            let jar = jar.add(flash_cookie(Flash::LoginRequired, state.config.api.production));
            Ok((jar, Redirect::to("/login")).into_response())
        }
    }
}
