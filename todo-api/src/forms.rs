/// Form bodies accepted by the HTML routes
///
/// Every field defaults to an empty string so that a form with a missing
/// field still deserializes and is reported inline by validation instead of
/// being rejected outright.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Shown when task text is outside 2..=144 characters
pub const LENGTH_MESSAGE: &str = "Task must be between 2 and 144 characters.";

/// Shown when task text contains a control character
pub const CONTROL_CHARACTER_MESSAGE: &str = "Task must be a single line of plain text.";

fn single_line(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_control) {
        let mut err = ValidationError::new("control_character");
        err.message = Some(CONTROL_CHARACTER_MESSAGE.into());
        return Err(err);
    }
    Ok(())
}

/// Rejects values that are empty or only whitespace
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        return Err(err);
    }
    Ok(())
}

/// New task / edit task form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskForm {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        custom(function = "single_line"),
        length(min = 2, max = 144, message = "Task must be between 2 and 144 characters.")
    )]
    pub content: String,
}

/// Account registration form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,

    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords must match."))]
    pub confirm_password: String,
}

/// Login form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(content: &str) -> TaskForm {
        TaskForm {
            content: content.to_string(),
        }
    }

    #[test]
    fn test_task_form_length() {
        assert!(task("a").validate().is_err());
        assert!(task("ab").validate().is_ok());
        assert!(task(&"a".repeat(144)).validate().is_ok());
        assert!(task(&"a".repeat(145)).validate().is_err());
    }

    #[test]
    fn test_task_form_rejects_whitespace() {
        let errors = task("   ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }

    #[test]
    fn test_task_form_rejects_control_characters() {
        let errors = task("a\0bcd").validate().unwrap_err();
        let content = &errors.field_errors()["content"];
        assert_eq!(
            content[0].message.as_deref(),
            Some(CONTROL_CHARACTER_MESSAGE)
        );
    }

    #[test]
    fn test_register_form_passwords_must_match() {
        let form = RegisterForm {
            email: "a@example.com".to_string(),
            password: "one".to_string(),
            confirm_password: "two".to_string(),
        };

        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("confirm_password"));
        assert!(!fields.contains_key("password"));
    }

    #[test]
    fn test_register_form_requires_valid_email() {
        let form = RegisterForm {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };

        assert!(form.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn test_login_form_defaults_fail_validation() {
        let errors = LoginForm::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
