//! In-memory state behind the mock server.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Adopted,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: String,
    pub breed: String,
    pub age: u32,
    pub description: String,
    pub image_url: Option<String>,
    pub status: PetStatus,
}

#[derive(Clone, Debug)]
struct Adoption {
    id: i64,
    pet_id: i64,
    user_id: i64,
    message: String,
    status: String,
    created_at: DateTime<Utc>,
}

/// An adoption request joined with its pet, as `GET /adoptions` returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdoptionEntry {
    pub id: i64,
    pub pet_id: i64,
    pub user_id: i64,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub pet_name: String,
    pub image_url: Option<String>,
    pub breed: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub pet_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tip {
    pub tip: String,
    pub category: String,
}

#[derive(Deserialize)]
pub struct NewPet {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub pet_type: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct PetChanges {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub pet_type: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<PetStatus>,
}

fn default_type() -> String {
    "dog".to_string()
}

#[derive(Debug)]
pub enum AdoptionRejection {
    UnknownPet,
    Unavailable,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<Account>,
    tokens: HashMap<String, i64>,
    pets: BTreeMap<i64, Pet>,
    adoptions: Vec<Adoption>,
    tips: Vec<Tip>,
    next_user_id: i64,
    next_pet_id: i64,
    next_adoption_id: i64,
}

impl Store {
    /// An admin account, three pets and a handful of care tips.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.add_account("Admin", ADMIN_EMAIL, ADMIN_PASSWORD, "admin");
        for (name, pet_type, breed, age, description) in [
            ("Max", "dog", "Labrador", 2, "Friendly dog who loves fetch."),
            ("Luna", "cat", "Siamese", 1, "Curious and talkative."),
            ("Rocky", "dog", "Beagle", 4, "Calm, great with kids."),
        ] {
            store.add_pet(NewPet {
                name: name.to_string(),
                pet_type: pet_type.to_string(),
                breed: breed.to_string(),
                age,
                description: description.to_string(),
                image_url: None,
            });
        }
        store.tips = [
            ("Keep fresh water available at all times.", "health"),
            ("Brush your pet's teeth a few times a week.", "grooming"),
            ("Schedule a checkup with your vet every year.", "health"),
            ("Short daily training sessions beat one long one.", "training"),
        ]
        .into_iter()
        .map(|(tip, category)| Tip {
            tip: tip.to_string(),
            category: category.to_string(),
        })
        .collect();
        store
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    pub fn add_account(&mut self, name: &str, email: &str, password: &str, role: &str) -> User {
        self.next_user_id += 1;
        let user = User {
            id: self.next_user_id,
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        };
        self.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Check credentials and mint a bearer token.
    pub fn login(&mut self, email: &str, password: &str) -> Option<(String, User)> {
        let user = self
            .accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email) && a.password == password)
            .map(|a| a.user.clone())?;
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user.id);
        Some((token, user))
    }

    pub fn user_for_token(&self, token: &str) -> Option<User> {
        let id = self.tokens.get(token)?;
        self.accounts
            .iter()
            .find(|a| a.user.id == *id)
            .map(|a| a.user.clone())
    }

    pub fn pets(&self) -> Vec<Pet> {
        self.pets.values().cloned().collect()
    }

    pub fn add_pet(&mut self, input: NewPet) -> Pet {
        self.next_pet_id += 1;
        let pet = Pet {
            id: self.next_pet_id,
            name: input.name,
            pet_type: input.pet_type,
            breed: input.breed,
            age: input.age,
            description: input.description,
            image_url: input.image_url,
            status: PetStatus::Available,
        };
        self.pets.insert(pet.id, pet.clone());
        pet
    }

    pub fn update_pet(&mut self, id: i64, changes: PetChanges) -> Option<Pet> {
        let pet = self.pets.get_mut(&id)?;
        if let Some(name) = changes.name {
            pet.name = name;
        }
        if let Some(pet_type) = changes.pet_type {
            pet.pet_type = pet_type;
        }
        if let Some(breed) = changes.breed {
            pet.breed = breed;
        }
        if let Some(age) = changes.age {
            pet.age = age;
        }
        if let Some(description) = changes.description {
            pet.description = description;
        }
        if let Some(image_url) = changes.image_url {
            pet.image_url = Some(image_url);
        }
        if let Some(status) = changes.status {
            pet.status = status;
        }
        Some(pet.clone())
    }

    /// Remove a pet and any requests made for it.
    pub fn remove_pet(&mut self, id: i64) -> bool {
        if self.pets.remove(&id).is_none() {
            return false;
        }
        self.adoptions.retain(|a| a.pet_id != id);
        true
    }

    pub fn add_adoption(
        &mut self,
        pet_id: i64,
        user_id: i64,
        message: &str,
    ) -> Result<AdoptionEntry, AdoptionRejection> {
        let pet = self.pets.get(&pet_id).ok_or(AdoptionRejection::UnknownPet)?;
        if pet.status != PetStatus::Available {
            return Err(AdoptionRejection::Unavailable);
        }
        self.next_adoption_id += 1;
        let adoption = Adoption {
            id: self.next_adoption_id,
            pet_id,
            user_id,
            message: message.to_string(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        let entry = join(&adoption, pet);
        self.adoptions.push(adoption);
        Ok(entry)
    }

    /// A user's requests, newest first.
    pub fn adoptions_for(&self, user_id: i64) -> Vec<AdoptionEntry> {
        let mut entries: Vec<_> = self
            .adoptions
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| self.pets.get(&a.pet_id).map(|pet| join(a, pet)))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        entries
    }

    pub fn tips(&self) -> Vec<Tip> {
        self.tips.clone()
    }
}

fn join(adoption: &Adoption, pet: &Pet) -> AdoptionEntry {
    AdoptionEntry {
        id: adoption.id,
        pet_id: adoption.pet_id,
        user_id: adoption.user_id,
        message: adoption.message.clone(),
        status: adoption.status.clone(),
        created_at: adoption.created_at,
        pet_name: pet.name.clone(),
        image_url: pet.image_url.clone(),
        breed: pet.breed.clone(),
        age: pet.age,
        pet_type: pet.pet_type.clone(),
    }
}
