/// HTML pages
///
/// Pages are rendered from plain format strings. Every piece of user-supplied
/// text passes through [`escape`] before it is written into markup.

use axum::response::Html;
use todo_shared::models::task::{Task, MAX_TEXT_LEN};

use crate::error::ValidationErrorDetail;

/// Escapes text for safe inclusion in HTML element content and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user_email: Option<&str>, body: &str) -> String {
    let nav = match user_email {
        Some(email) => format!(
            r#"<span class="user">{}</span> <a href="/logout">Log out</a>"#,
            escape(email)
        ),
        None => r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        body = body,
    )
}

fn field_errors(errors: &[ValidationErrorDetail], field: &str) -> String {
    errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(&e.message)))
        .collect()
}

fn task_items(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|task| {
            let toggle = if task.complete {
                format!(r#"<a href="/incompleted/{}">Mark incomplete</a>"#, task.id)
            } else {
                format!(r#"<a href="/completed/{}">Mark complete</a>"#, task.id)
            };
            format!(
                r#"<li data-task-id="{id}">{text} {toggle} <a href="/edit/{id}">Edit</a> <a href="/delete/{id}">Delete</a></li>"#,
                id = task.id,
                text = escape(&task.text),
                toggle = toggle,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Task list with the new-task form
pub fn index_page(
    user_email: &str,
    content: &str,
    errors: &[ValidationErrorDetail],
    incomplete: &[Task],
    completed: &[Task],
) -> Html<String> {
    let body = format!(
        r#"<h1>Tasks</h1>
<form method="post" action="/">
<label for="content">Task</label>
<input id="content" name="content" value="{content}" maxlength="{max}" required>
{errors}
<button type="submit">Add</button>
</form>
<h2>Incomplete</h2>
<ul id="incomplete">
{incomplete}
</ul>
<h2>Completed</h2>
<ul id="completed">
{completed}
</ul>"#,
        content = escape(content),
        max = MAX_TEXT_LEN,
        errors = field_errors(errors, "content"),
        incomplete = task_items(incomplete),
        completed = task_items(completed),
    );

    Html(layout("Tasks", Some(user_email), &body))
}

/// Edit form for a single task
pub fn edit_page(
    user_email: &str,
    task: &Task,
    content: &str,
    errors: &[ValidationErrorDetail],
) -> Html<String> {
    let body = format!(
        r#"<h1>Edit task</h1>
<form method="post" action="/edit/{id}">
<label for="content">Task</label>
<input id="content" name="content" value="{content}" maxlength="{max}" required>
{errors}
<button type="submit">Update</button>
</form>
<a href="/">Back</a>"#,
        id = task.id,
        content = escape(content),
        max = MAX_TEXT_LEN,
        errors = field_errors(errors, "content"),
    );

    Html(layout("Edit task", Some(user_email), &body))
}

/// Account registration form
pub fn register_page(email: &str, errors: &[ValidationErrorDetail]) -> Html<String> {
    let body = format!(
        r#"<h1>Register</h1>
<form method="post" action="/register">
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
{email_errors}
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
{password_errors}
<label for="confirm_password">Confirm password</label>
<input id="confirm_password" name="confirm_password" type="password" required>
{confirm_errors}
<button type="submit">Register</button>
</form>"#,
        email = escape(email),
        email_errors = field_errors(errors, "email"),
        password_errors = field_errors(errors, "password"),
        confirm_errors = field_errors(errors, "confirm_password"),
    );

    Html(layout("Register", None, &body))
}

/// Login form, with an optional one-line flash message above it
pub fn login_page(
    email: &str,
    flash: Option<&str>,
    errors: &[ValidationErrorDetail],
) -> Html<String> {
    let flash = flash
        .map(|msg| format!(r#"<p class="flash">{}</p>"#, escape(msg)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Log in</h1>
{flash}
<form method="post" action="/login">
<label for="email">Email</label>
<input id="email" name="email" type="email" value="{email}" required>
{email_errors}
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
{password_errors}
<button type="submit">Log in</button>
</form>"#,
        flash = flash,
        email = escape(email),
        email_errors = field_errors(errors, "email"),
        password_errors = field_errors(errors, "password"),
    );

    Html(layout("Log in", None, &body))
}

/// 404 page
pub fn not_found_page() -> Html<String> {
    Html(layout(
        "Not found",
        None,
        r#"<h1>Not found</h1>
<p>The page you requested does not exist.</p>
<a href="/">Back to your tasks</a>"#,
    ))
}

/// 500 page
pub fn server_error_page() -> Html<String> {
    Html(layout(
        "Server error",
        None,
        r#"<h1>Something went wrong</h1>
<p>An internal error occurred. Please try again later.</p>
<a href="/">Back to your tasks</a>"#,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, text: &str, complete: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            complete,
            owner_id: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn test_index_page_escapes_task_text() {
        let page = index_page(
            "a@x.com",
            "",
            &[],
            &[task(1, "<b>bold</b>", false)],
            &[],
        );

        assert!(page.0.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!page.0.contains("<b>bold</b>"));
    }

    #[test]
    fn test_index_page_links_match_state() {
        let page = index_page(
            "a@x.com",
            "",
            &[],
            &[task(1, "Open", false)],
            &[task(2, "Done", true)],
        );

        assert!(page.0.contains(r#"href="/completed/1""#));
        assert!(page.0.contains(r#"href="/incompleted/2""#));
        assert!(page.0.contains(r#"href="/delete/2""#));
        assert!(page.0.contains(r#"href="/edit/1""#));
    }

    #[test]
    fn test_field_errors_are_rendered_per_field() {
        let errors = vec![ValidationErrorDetail {
            field: "confirm_password".to_string(),
            message: "Passwords must match".to_string(),
        }];

        let page = register_page("a@x.com", &errors);
        assert!(page.0.contains("Passwords must match"));
        assert!(page.0.contains(r#"value="a@x.com""#));
    }

    #[test]
    fn test_login_page_flash() {
        let page = login_page("", Some("Account created"), &[]);
        assert!(page.0.contains(r#"<p class="flash">Account created</p>"#));

        let page = login_page("", None, &[]);
        assert!(!page.0.contains("class=\"flash\""));
    }
}
