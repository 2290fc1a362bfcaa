//! Sign-in and registration pages.

use crate::api::Api;
use crate::forms::{check_email, require, FieldError, SubmitError, MIN_PASSWORD_LEN};
use crate::http::Transport;
use crate::session::Storage;

pub const EMAIL_PLACEHOLDER: &str = "Email address";
pub const PASSWORD_PLACEHOLDER: &str = "Password";
pub const SIGN_IN: &str = "Sign in";
pub const SIGN_IN_FAILED: &str = "Failed to sign in";
pub const REGISTER_FAILED: &str = "Registration failed";

/// Where to send the user after a successful submit.
pub const HOME_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Both fields are required. Format is left to the server.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    pub form: LoginForm,
    error: Option<String>,
    field_errors: Vec<FieldError>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Returns the route to navigate to on success.
    ///
    /// On failure the error is also kept on the view for rendering.
    pub fn submit<T: Transport, S: Storage>(
        &mut self,
        api: &mut Api<T, S>,
    ) -> Result<&'static str, SubmitError> {
        self.error = None;
        self.field_errors.clear();

        if let Err(errors) = self.form.validate() {
            self.field_errors = errors.clone();
            return Err(SubmitError::Invalid(errors));
        }

        let email = self.form.email.trim().to_string();
        match api.auth().login(&email, &self.form.password) {
            Ok(_) => Ok(HOME_ROUTE),
            Err(e) => {
                let err = SubmitError::from_api(e, SIGN_IN_FAILED);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            EMAIL_PLACEHOLDER.to_string(),
            PASSWORD_PLACEHOLDER.to_string(),
            SIGN_IN.to_string(),
        ];
        lines.extend(self.field_errors.iter().map(ToString::to_string));
        lines.extend(self.error.clone());
        lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        check_email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.push(FieldError::required("password"));
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Register, then send the user to the sign-in page.
    pub fn submit<T: Transport, S: Storage>(
        &self,
        api: &mut Api<T, S>,
    ) -> Result<&'static str, SubmitError> {
        self.validate().map_err(SubmitError::Invalid)?;
        api.auth()
            .register(self.name.trim(), self.email.trim(), &self.password)
            .map_err(|e| SubmitError::from_api(e, REGISTER_FAILED))?;
        Ok(LOGIN_ROUTE)
    }
}
