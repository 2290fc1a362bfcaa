//! Client-side form validation.
//!
//! A form whose `validate` fails never reaches the network; the field
//! errors are shown inline instead.

use std::fmt;

use thiserror::Error;

use crate::error::ApiError;
use crate::types::{NewPet, PetUpdate};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "This field is required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Why a form submission did not succeed.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Blocked locally. Nothing was sent.
    #[error("{} field(s) need attention", .0.len())]
    Invalid(Vec<FieldError>),

    /// The session lacks the capability. Nothing was sent.
    #[error("{0}")]
    NotAllowed(&'static str),

    /// The server or transport refused. `message` is what the view shows.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl SubmitError {
    /// Prefer the server's explanation, else the view's static message.
    pub fn from_api(source: ApiError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        SubmitError::Failed { message, source }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SubmitError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// Push a required-field error when `value` is blank.
pub fn require(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
    }
}

pub fn check_email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::required(field));
    } else if !value.contains('@') {
        errors.push(FieldError::new(field, "Enter a valid email address"));
    }
}

fn into_result<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(errors)
    }
}

/// The admin add/edit pet form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetForm {
    pub name: String,
    pub pet_type: String,
    pub breed: String,
    pub age: String,
    pub description: String,
    pub image_url: String,
}

impl PetForm {
    /// Only the name is mandatory. Type defaults to "dog" and age to 0.
    pub fn validate(&self) -> Result<NewPet, Vec<FieldError>> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        let age = self.parse_age(&mut errors);
        into_result(errors, || NewPet {
            name: self.name.trim().to_string(),
            pet_type: non_empty(&self.pet_type).unwrap_or_else(|| "dog".to_string()),
            breed: self.breed.trim().to_string(),
            age: age.unwrap_or(0),
            description: self.description.trim().to_string(),
            image_url: non_empty(&self.image_url),
        })
    }

    /// Blank fields are left unchanged on the server.
    pub fn validate_update(&self) -> Result<PetUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let age = self.parse_age(&mut errors);
        into_result(errors, || PetUpdate {
            name: non_empty(&self.name),
            pet_type: non_empty(&self.pet_type),
            breed: non_empty(&self.breed),
            age,
            description: non_empty(&self.description),
            image_url: non_empty(&self.image_url),
            status: None,
        })
    }

    fn parse_age(&self, errors: &mut Vec<FieldError>) -> Option<u32> {
        let age = self.age.trim();
        if age.is_empty() {
            return None;
        }
        match age.parse::<u32>() {
            Ok(age) => Some(age),
            Err(_) => {
                errors.push(FieldError::new("age", "Age must be a whole number"));
                None
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
