/// Task pages
///
/// All routes here sit behind [`crate::middleware::session::require_login`].
/// A task that does not exist and a task owned by another user produce the
/// same 404 page.
///
/// # Endpoints
///
/// - `GET  /` - List incomplete and completed tasks
/// - `POST /` - Create a task
/// - `GET  /edit/:id` - Edit form
/// - `POST /edit/:id` - Update task text
/// - `GET|POST /delete/:id` - Delete a task
/// - `GET|POST /completed/:id` - Mark complete
/// - `GET|POST /incompleted/:id` - Mark incomplete

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use todo_shared::{
    auth::authorization::authorize_task_access,
    models::task::{CreateTask, Task, TaskError},
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
    forms::{TaskForm, CONTROL_CHARACTER_MESSAGE, LENGTH_MESSAGE},
    middleware::session::CurrentUser,
    views,
};

fn task_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::NotFound(format!("invalid task id: {}", rejection)))
}

fn text_error(err: TaskError) -> ApiResult<Vec<ValidationErrorDetail>> {
    let message = match err {
        TaskError::InvalidText(_) => LENGTH_MESSAGE,
        TaskError::ControlCharacter => CONTROL_CHARACTER_MESSAGE,
        other => return Err(other.into()),
    };
    Ok(vec![ValidationErrorDetail::new("content", message)])
}

async fn render_index(
    state: &AppState,
    user: &CurrentUser,
    content: &str,
    errors: &[ValidationErrorDetail],
) -> ApiResult<Html<String>> {
    let incomplete = Task::list_for_owner(&state.db, user.id, false).await?;
    let completed = Task::list_for_owner(&state.db, user.id, true).await?;

    Ok(views::index_page(
        &user.email,
        content,
        errors,
        &incomplete,
        &completed,
    ))
}

/// Lists the current user's tasks
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Html<String>> {
    render_index(&state, &user, "", &[]).await
}

/// Creates a task for the current user
///
/// Invalid text re-renders the list with the error next to the input.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<TaskForm>,
) -> ApiResult<Response> {
    if let Err(errors) = form.validate() {
        let details = validation_details(&errors);
        return Ok(render_index(&state, &user, &form.content, &details)
            .await?
            .into_response());
    }

    let created = Task::create(
        &state.db,
        CreateTask {
            owner_id: user.id,
            text: form.content.clone(),
        },
    )
    .await;

    match created {
        Ok(task) => {
            info!(user_id = user.id, task_id = task.id, "Task created");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            let details = text_error(err)?;
            Ok(render_index(&state, &user, &form.content, &details)
                .await?
                .into_response())
        }
    }
}

/// Shows the edit form for a task
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Html<String>> {
    let id = task_id(path)?;
    let task = authorize_task_access(&state.db, user.id, id).await?;

    Ok(views::edit_page(&user.email, &task, &task.text, &[]))
}

/// Replaces the text of a task
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
    Form(form): Form<TaskForm>,
) -> ApiResult<Response> {
    let id = task_id(path)?;
    let task = authorize_task_access(&state.db, user.id, id).await?;

    if let Err(errors) = form.validate() {
        let details = validation_details(&errors);
        return Ok(views::edit_page(&user.email, &task, &form.content, &details).into_response());
    }

    match Task::update_text(&state.db, task.id, user.id, &form.content).await {
        Ok(Some(task)) => {
            info!(user_id = user.id, task_id = task.id, "Task updated");
            Ok(Redirect::to("/").into_response())
        }
        Ok(None) => Err(ApiError::NotFound(format!("task {}", id))),
        Err(err) => {
            let details = text_error(err)?;
            Ok(views::edit_page(&user.email, &task, &form.content, &details).into_response())
        }
    }
}

/// Permanently deletes a task
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Redirect> {
    let id = task_id(path)?;
    let task = authorize_task_access(&state.db, user.id, id).await?;

    if !Task::delete(&state.db, task.id, user.id).await? {
        return Err(ApiError::NotFound(format!("task {}", id)));
    }

    info!(user_id = user.id, task_id = id, "Task deleted");
    Ok(Redirect::to("/"))
}

async fn set_complete(
    state: &AppState,
    user: &CurrentUser,
    path: Result<Path<i64>, PathRejection>,
    complete: bool,
) -> ApiResult<Redirect> {
    let id = task_id(path)?;
    let task = authorize_task_access(&state.db, user.id, id).await?;

    if Task::set_complete(&state.db, task.id, user.id, complete)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!("task {}", id)));
    }

    info!(user_id = user.id, task_id = id, complete, "Task completion changed");
    Ok(Redirect::to("/"))
}

/// Marks a task complete
pub async fn mark_complete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Redirect> {
    set_complete(&state, &user, path, true).await
}

/// Marks a task incomplete
pub async fn mark_incomplete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Redirect> {
    set_complete(&state, &user, path, false).await
}
