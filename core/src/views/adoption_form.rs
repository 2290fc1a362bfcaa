//! The "adopt this pet" request form.

use crate::api::Api;
use crate::forms::{require, SubmitError};
use crate::http::Transport;
use crate::session::Storage;
use crate::types::{NewAdoption, PetId};

pub const SUBMITTED: &str = "Adoption request submitted successfully";
pub const SUBMIT_FAILED: &str = "Failed to submit adoption request";
pub const SIGN_IN_REQUIRED: &str = "Please sign in to submit an adoption request.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionForm {
    pub pet_id: PetId,
    pub message: String,
}

impl AdoptionForm {
    pub fn new(pet_id: PetId) -> Self {
        Self {
            pet_id,
            message: String::new(),
        }
    }

    /// Submit on behalf of the signed-in user. Returns the confirmation
    /// text to show.
    pub fn submit<T: Transport, S: Storage>(&self, api: &Api<T, S>) -> Result<String, SubmitError> {
        let Some(user) = api.current_user() else {
            return Err(SubmitError::NotAllowed(SIGN_IN_REQUIRED));
        };

        let mut errors = Vec::new();
        require(&mut errors, "message", &self.message);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }

        let request = NewAdoption {
            pet_id: self.pet_id,
            user_id: user.id,
            message: self.message.trim().to_string(),
        };
        let ack = api
            .adoptions()
            .create(&request)
            .map_err(|e| SubmitError::from_api(e, SUBMIT_FAILED))?;
        if ack.message.is_empty() {
            Ok(SUBMITTED.to_string())
        } else {
            Ok(ack.message)
        }
    }
}
