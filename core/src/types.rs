//! Domain DTOs for the adoption API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The integration tests run the client against the server and catch schema
//! drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type PetId = i64;

/// Account role. Unknown strings from the server degrade to `User`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Token and user record, always stored and cleared together.
///
/// This is also the body of a successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Listing status. A status this client does not know becomes `Unknown`
/// rather than failing the whole list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Adopted,
    #[serde(other)]
    Unknown,
}

/// A pet listing. Server-owned; the client never edits one in place except
/// to reflect a confirmed write in already-loaded view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub breed: String,
    pub age: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: PetStatus,
}

/// Request payload for creating a pet listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub breed: String,
    pub age: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request payload for updating a pet listing. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub pet_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl PetUpdate {
    /// Apply the present fields to a loaded pet.
    pub fn apply_to(&self, pet: &mut Pet) {
        if let Some(name) = &self.name {
            pet.name = name.clone();
        }
        if let Some(pet_type) = &self.pet_type {
            pet.pet_type = pet_type.clone();
        }
        if let Some(breed) = &self.breed {
            pet.breed = breed.clone();
        }
        if let Some(age) = self.age {
            pet.age = age;
        }
        if let Some(description) = &self.description {
            pet.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            pet.image_url = Some(image_url.clone());
        }
        if let Some(status) = self.status {
            pet.status = status;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    Pending,
    Approved,
    Rejected,
}

impl AdoptionStatus {
    /// Label shown next to a request.
    pub fn label(self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "Pending",
            AdoptionStatus::Approved => "Approved",
            AdoptionStatus::Rejected => "Rejected",
        }
    }
}

/// Request payload for submitting an adoption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdoption {
    pub pet_id: PetId,
    pub user_id: UserId,
    pub message: String,
}

/// An adoption request with the pet fields the list view needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: i64,
    pub pet_id: PetId,
    pub user_id: UserId,
    pub message: String,
    pub status: AdoptionStatus,
    pub created_at: DateTime<Utc>,
    pub pet_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub breed: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub pet_type: String,
}

/// Acknowledgement of a write, optionally echoing the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation<T = ()> {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Body of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareTip {
    pub tip: String,
    #[serde(default)]
    pub category: String,
}

fn default_true() -> bool {
    true
}
