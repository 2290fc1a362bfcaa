//! "My adoption requests" list.

use crate::api::Api;
use crate::http::Transport;
use crate::session::Storage;
use crate::types::{AdoptionRequest, AdoptionStatus};

use super::{ListMessages, ListState};

pub const LOAD_FAILED: &str = "Failed to load adoption requests";
pub const EMPTY: &str = "You haven't submitted any adoption requests yet.";
pub const SIGNED_OUT: &str = "Please sign in to view your adoption requests.";

const MESSAGES: ListMessages = ListMessages {
    failed: LOAD_FAILED,
    empty: EMPTY,
};

/// One rendered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionRequestRow {
    pub id: i64,
    pub pet_name: String,
    pub image_url: Option<String>,
    /// "Labrador • 2 years old • dog"
    pub summary: String,
    pub status: AdoptionStatus,
    pub message: String,
    /// "Mar 1, 2025"
    pub submitted_on: String,
}

impl From<AdoptionRequest> for AdoptionRequestRow {
    fn from(request: AdoptionRequest) -> Self {
        Self {
            id: request.id,
            summary: pet_summary(&request.breed, request.age, &request.pet_type),
            submitted_on: request.created_at.format("%b %-d, %Y").to_string(),
            pet_name: request.pet_name,
            image_url: request.image_url,
            status: request.status,
            message: request.message,
        }
    }
}

pub fn pet_summary(breed: &str, age: u32, pet_type: &str) -> String {
    let years = if age == 1 { "year" } else { "years" };
    format!("{breed} • {age} {years} old • {pet_type}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptionRequestsView {
    state: ListState<AdoptionRequestRow>,
}

impl AdoptionRequestsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the signed-in user's requests.
    pub fn load<T: Transport, S: Storage>(api: &Api<T, S>) -> Self {
        let Some(user) = api.current_user() else {
            return Self {
                state: ListState::Failed {
                    message: SIGNED_OUT,
                },
            };
        };
        let result = api.adoptions().get_by_user(user.id);
        Self {
            state: ListState::resolve(result, MESSAGES).map(AdoptionRequestRow::from),
        }
    }

    pub fn state(&self) -> &ListState<AdoptionRequestRow> {
        &self.state
    }

    /// Every text line on screen, in order.
    pub fn render(&self) -> Vec<String> {
        if let Some(message) = self.state.status_message() {
            return vec![message.to_string()];
        }
        self.state
            .items()
            .iter()
            .flat_map(|row| {
                [
                    row.pet_name.clone(),
                    row.summary.clone(),
                    row.status.label().to_string(),
                    row.message.clone(),
                    format!("Submitted {}", row.submitted_on),
                ]
            })
            .collect()
    }
}
