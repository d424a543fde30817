/// Account pages
///
/// # Endpoints
///
/// - `GET|POST /register` - Create an account, then redirect to `/login`
/// - `GET|POST /login` - Start a session, then redirect to `/`
/// - `GET /logout` - End the session, then redirect to `/login`
///
/// Visiting `/register` or `/login` while logged in redirects to `/`.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use todo_shared::auth::credentials::{self, CredentialError};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiResult, ValidationErrorDetail},
    forms::{LoginForm, RegisterForm},
    middleware::session::{
        flash_cookie, read_flash, removal_cookie, resolve_user, session_cookie, CurrentUser,
        Flash, FLASH_COOKIE, SESSION_COOKIE,
    },
    views,
};

/// Generic message for any failed login; never says which part was wrong
pub const LOGIN_FAILED: &str = "Login failed. Check your email and password.";

async fn is_authenticated(state: &AppState, jar: &SignedCookieJar) -> ApiResult<bool> {
    Ok(resolve_user(state, jar).await?.is_some())
}

/// Shows the registration form
pub async fn register_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Response> {
    if is_authenticated(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(views::register_page("", &[]).into_response())
}

/// Creates an account
///
/// Validation failures and taken emails re-render the form inline.
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<RegisterForm>,
) -> ApiResult<Response> {
    if is_authenticated(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }

    if let Err(errors) = form.validate() {
        let details = validation_details(&errors);
        return Ok(views::register_page(&form.email, &details).into_response());
    }

    match credentials::register(&state.db, &form.email, &form.password).await {
        Ok(_) => {
            let jar = jar.add(flash_cookie(Flash::AccountCreated, state.config.api.production));
            Ok((jar, Redirect::to("/login")).into_response())
        }
        Err(err @ CredentialError::EmailTaken) => {
            let details = vec![ValidationErrorDetail::new("email", err.to_string())];
            Ok(views::register_page(&form.email, &details).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Shows the login form, consuming any pending flash message
pub async fn login_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Response> {
    if is_authenticated(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }

    let flash = read_flash(&jar);
    let page = views::login_page("", flash.map(|f| f.message()), &[]);

    // Only emits a deletion if the browser sent a flash cookie
    let jar = jar.remove(removal_cookie(FLASH_COOKIE));
    Ok((jar, page).into_response())
}

/// Verifies credentials and starts a session
///
/// A browser that already holds a live session never gets here; it is
/// redirected to `/` first.
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    if is_authenticated(&state, &jar).await? {
        return Ok(Redirect::to("/").into_response());
    }

    if let Err(errors) = form.validate() {
        let details = validation_details(&errors);
        return Ok(views::login_page(&form.email, None, &details).into_response());
    }

    match credentials::authenticate(&state.db, &form.email, &form.password).await {
        Ok(user) => {
            let session_id = state.sessions.login(user.id).await;
            info!(user_id = user.id, "User logged in");

            let jar = jar.add(session_cookie(session_id, state.config.api.production));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(CredentialError::InvalidCredentials) => {
            warn!("Failed login attempt");
            Ok(views::login_page(&form.email, Some(LOGIN_FAILED), &[]).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Ends the current session
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    jar: SignedCookieJar,
) -> Response {
    state.sessions.logout(&user.session_id).await;
    info!(user_id = user.id, "User logged out");

    let jar = jar.remove(removal_cookie(SESSION_COOKIE));
    (jar, Redirect::to("/login")).into_response()
}
