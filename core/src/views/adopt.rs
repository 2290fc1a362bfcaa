//! The adoptable pets catalog, with admin-only listing management.

use tracing::info;

use crate::api::{Api, Capabilities};
use crate::forms::{PetForm, SubmitError};
use crate::http::Transport;
use crate::session::Storage;
use crate::types::{Pet, PetId};

use super::{ListMessages, ListState};

pub const LOAD_FAILED: &str = "Failed to load pets";
pub const EMPTY: &str = "No pets found matching your criteria.";
pub const SEARCH_PLACEHOLDER: &str = "Search by name or breed...";
pub const TYPE_FILTER_LABEL: &str = "Animal Type";
pub const LEARN_MORE: &str = "Learn More";
pub const ADD_NEW: &str = "Add New Animal";
pub const EDIT: &str = "Edit";
pub const DELETE: &str = "Delete";

const ADMIN_ONLY: &str = "Only administrators can manage pet listings.";

const MESSAGES: ListMessages = ListMessages {
    failed: LOAD_FAILED,
    empty: EMPTY,
};

/// Client-side filter over loaded pets.
///
/// Type matching is exact but ignores case. Search is a case-insensitive
/// substring match on name or breed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetFilter {
    pet_type: Option<String>,
    search: String,
}

impl PetFilter {
    /// `"all"` or blank clears the type filter.
    pub fn set_type(&mut self, value: &str) {
        let value = value.trim();
        self.pet_type = (!value.is_empty() && !value.eq_ignore_ascii_case("all"))
            .then(|| value.to_lowercase());
    }

    pub fn set_search(&mut self, text: &str) {
        self.search = text.trim().to_lowercase();
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        let type_ok = self
            .pet_type
            .as_ref()
            .map_or(true, |t| pet.pet_type.to_lowercase() == *t);
        let search_ok = self.search.is_empty()
            || pet.name.to_lowercase().contains(&self.search)
            || pet.breed.to_lowercase().contains(&self.search);
        type_ok && search_ok
    }
}

pub fn filter_pets<'a>(pets: &'a [Pet], filter: &PetFilter) -> Vec<&'a Pet> {
    pets.iter().filter(|pet| filter.matches(pet)).collect()
}

/// The "Learn More" panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDetails {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<&Pet> for PetDetails {
    fn from(pet: &Pet) -> Self {
        Self {
            title: format!("About {}", pet.name),
            summary: super::adoption_requests::pet_summary(&pet.breed, pet.age, &pet.pet_type),
            description: pet.description.clone(),
            image_url: pet.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptView {
    pets: ListState<Pet>,
    filter: PetFilter,
    selected: Option<PetId>,
    capabilities: Capabilities,
}

impl AdoptView {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    pub fn load<T: Transport, S: Storage>(api: &Api<T, S>) -> Self {
        let mut view = Self::new(api.capabilities());
        view.pets = ListState::resolve(api.pets().get_all(), MESSAGES);
        view
    }

    pub fn state(&self) -> &ListState<Pet> {
        &self.pets
    }

    pub fn filter_mut(&mut self) -> &mut PetFilter {
        &mut self.filter
    }

    pub fn set_type_filter(&mut self, value: &str) {
        self.filter.set_type(value);
    }

    pub fn set_search(&mut self, text: &str) {
        self.filter.set_search(text);
    }

    pub fn visible(&self) -> Vec<&Pet> {
        filter_pets(self.pets.items(), &self.filter)
    }

    pub fn show_admin_controls(&self) -> bool {
        self.capabilities.can_manage_pets()
    }

    /// Open the details panel for a loaded pet.
    pub fn learn_more(&mut self, id: PetId) -> Option<PetDetails> {
        let details = self.pets.items().iter().find(|p| p.id == id).map(PetDetails::from);
        self.selected = details.as_ref().map(|_| id);
        details
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn details(&self) -> Option<PetDetails> {
        let id = self.selected?;
        self.pets.items().iter().find(|p| p.id == id).map(PetDetails::from)
    }

    /// Every text line on screen, in order.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.show_admin_controls() {
            lines.push(ADD_NEW.to_string());
        }
        if let Some(message) = self.pets.status_message() {
            lines.push(message.to_string());
            return lines;
        }
        let visible = self.visible();
        if visible.is_empty() {
            lines.push(EMPTY.to_string());
        }
        for pet in visible {
            lines.push(pet.name.clone());
            lines.push(pet.breed.clone());
            lines.push(LEARN_MORE.to_string());
            if self.show_admin_controls() {
                lines.push(EDIT.to_string());
                lines.push(DELETE.to_string());
            }
        }
        if let Some(details) = self.details() {
            lines.push(details.title);
            lines.push(details.summary);
            lines.push(details.description);
        }
        lines
    }

    /// Admin: create a listing and append it to the loaded list.
    pub fn add_pet<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T, S>,
        form: &PetForm,
    ) -> Result<String, SubmitError> {
        self.require_admin()?;
        let new_pet = form.validate().map_err(SubmitError::Invalid)?;
        let ack = api
            .pets()
            .create(&new_pet)
            .map_err(|e| SubmitError::from_api(e, "Failed to add pet"))?;
        if let Some(pet) = ack.data {
            info!(pet_id = pet.id, "pet listing added");
            self.insert(pet);
        }
        Ok(ack.message)
    }

    /// Admin: apply the non-blank fields of `form` to listing `id`.
    pub fn edit_pet<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T, S>,
        id: PetId,
        form: &PetForm,
    ) -> Result<String, SubmitError> {
        self.require_admin()?;
        let update = form.validate_update().map_err(SubmitError::Invalid)?;
        let ack = api
            .pets()
            .update(id, &update)
            .map_err(|e| SubmitError::from_api(e, "Failed to update pet"))?;
        if let ListState::Populated(pets) = &mut self.pets {
            if let Some(pet) = pets.iter_mut().find(|p| p.id == id) {
                match ack.data {
                    Some(stored) => *pet = stored,
                    None => update.apply_to(pet),
                }
            }
        }
        Ok(ack.message)
    }

    /// Admin: delete listing `id` and drop it from the loaded list.
    pub fn delete_pet<T: Transport, S: Storage>(
        &mut self,
        api: &Api<T, S>,
        id: PetId,
    ) -> Result<String, SubmitError> {
        self.require_admin()?;
        let ack = api
            .pets()
            .delete(id)
            .map_err(|e| SubmitError::from_api(e, "Failed to delete pet"))?;
        if let ListState::Populated(pets) = &mut self.pets {
            pets.retain(|p| p.id != id);
            if pets.is_empty() {
                self.pets = ListState::Empty { message: EMPTY };
            }
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(ack.message)
    }

    fn require_admin(&self) -> Result<(), SubmitError> {
        if self.capabilities.can_manage_pets() {
            Ok(())
        } else {
            Err(SubmitError::NotAllowed(ADMIN_ONLY))
        }
    }

    fn insert(&mut self, pet: Pet) {
        match &mut self.pets {
            ListState::Populated(pets) => pets.push(pet),
            ListState::Empty { .. } => self.pets = ListState::Populated(vec![pet]),
            // Nothing on screen to update.
            ListState::Loading | ListState::Failed { .. } => {}
        }
    }
}
