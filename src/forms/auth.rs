use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Longest accepted username.
const USERNAME_MAX_LEN: u64 = 150;

/// Shortest accepted password.
pub const PASSWORD_MIN_LEN: u64 = 8;

/// Result type returned by the authentication form helpers.
pub type AuthFormResult<T> = Result<T, AuthFormError>;

/// Errors that can occur while processing the registration form.
#[derive(Debug, Error)]
pub enum AuthFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("username cannot be empty")]
    EmptyUsername,
    /// Username contains characters other than letters, digits and `@.+-_`.
    #[error("username may only contain letters, digits and @/./+/-/_")]
    InvalidUsername,
    #[error("the two password fields didn't match")]
    PasswordMismatch,
}

impl AuthFormError {
    /// Message shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            AuthFormError::Validation(errors) => {
                let fields = errors.field_errors();
                if fields.contains_key("email") {
                    "Enter a valid email address.".to_string()
                } else if fields.contains_key("password1") {
                    format!("The password must contain at least {PASSWORD_MIN_LEN} characters.")
                } else if fields.contains_key("username") {
                    format!("The username must contain 1 to {USERNAME_MAX_LEN} characters.")
                } else {
                    "Please correct the errors below.".to_string()
                }
            }
            AuthFormError::EmptyUsername => "Username is required.".to_string(),
            AuthFormError::InvalidUsername => {
                "Usernames may only contain letters, digits and @/./+/-/_.".to_string()
            }
            AuthFormError::PasswordMismatch => "The two password fields didn't match.".to_string(),
        }
    }
}

/// Form payload emitted by the registration page.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = USERNAME_MAX_LEN))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = PASSWORD_MIN_LEN))]
    pub password1: String,
    pub password2: String,
}

/// Values echoed back into the registration form after an error. Passwords are never echoed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RegisterFormEcho {
    pub username: String,
    pub email: String,
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn echo(&self) -> RegisterFormEcho {
        RegisterFormEcho {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// Validate the payload and check that both password fields agree.
    /// Usernames and emails are trimmed before any rule is checked.
    pub fn into_registration(self) -> AuthFormResult<Registration> {
        let form = Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        };

        if form.username.is_empty() {
            return Err(AuthFormError::EmptyUsername);
        }

        if !form
            .username
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(AuthFormError::InvalidUsername);
        }

        if form.password1 != form.password2 {
            return Err(AuthFormError::PasswordMismatch);
        }

        form.validate()?;

        Ok(Registration {
            email: form.email.to_lowercase(),
            username: form.username,
            password: form.password1,
        })
    }
}

/// Form payload emitted by the login page.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
