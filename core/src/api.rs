//! The session-aware API context.
//!
//! # Design
//! `Api` is the one object views receive. It owns the stateless client, the
//! host's transport and the session store, and caches the hydrated session
//! so every call can attach the current token. Calls are grouped the way
//! the UI thinks about them: `auth()`, `pets()`, `adoptions()`.
//!
//! Only `auth()` needs `&mut self`, because only login and logout change
//! the session.

use tracing::{debug, info, warn};

use crate::client::AdoptlyClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::session::{SessionStore, Storage};
use crate::types::{
    AdoptionRequest, CareTip, Confirmation, NewAdoption, NewPet, Pet, PetId, PetUpdate,
    Registered, Role, Session, User, UserId,
};

/// What the current session is allowed to do in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    role: Option<Role>,
}

impl Capabilities {
    pub fn for_session(session: Option<&Session>) -> Self {
        Self {
            role: session.map(|s| s.user.role),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.role.is_some()
    }

    /// Add, edit and delete pet listings.
    pub fn can_manage_pets(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn can_request_adoption(&self) -> bool {
        self.is_signed_in()
    }
}

pub struct Api<T, S> {
    client: AdoptlyClient,
    transport: T,
    store: SessionStore<S>,
    session: Option<Session>,
}

impl<T: Transport, S: Storage> Api<T, S> {
    /// Build the context and hydrate the session from `storage`.
    ///
    /// Unreadable storage starts the context signed out.
    pub fn init(client: AdoptlyClient, transport: T, storage: S) -> Self {
        let store = SessionStore::new(storage);
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "could not read stored session, starting signed out");
                if let Err(e) = store.clear() {
                    warn!(error = %e, "could not clear stored session");
                }
                None
            }
        };
        debug!(
            base_url = client.base_url(),
            signed_in = session.is_some(),
            "api context ready"
        );
        Self {
            client,
            transport,
            store,
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_session(self.session.as_ref())
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn auth(&mut self) -> Auth<'_, T, S> {
        Auth { api: self }
    }

    pub fn pets(&self) -> Pets<'_, T, S> {
        Pets { api: self }
    }

    pub fn adoptions(&self) -> Adoptions<'_, T, S> {
        Adoptions { api: self }
    }

    /// Fetch the pet care tips feed. Never authenticated.
    pub fn care_tips(&self) -> Result<Vec<CareTip>, ApiError> {
        let req = self.client.build_care_tips();
        self.client.parse_care_tips(self.send(req)?)
    }

    fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = req.method.as_str();
        let path = req.path.clone();
        match self.transport.execute(req) {
            Ok(response) => {
                debug!(method, %path, status = response.status, "request completed");
                Ok(response)
            }
            Err(e) => {
                warn!(method, %path, error = %e, "request failed");
                Err(e.into())
            }
        }
    }
}

pub struct Auth<'a, T, S> {
    api: &'a mut Api<T, S>,
}

impl<T: Transport, S: Storage> Auth<'_, T, S> {
    /// Sign in and persist the session.
    ///
    /// The session is written to storage before this returns `Ok`. On any
    /// error the previous session, stored or cached, is left as it was.
    pub fn login(self, email: &str, password: &str) -> Result<Session, ApiError> {
        let api = self.api;
        let req = api.client.build_login(email, password)?;
        let session = api.client.parse_login(api.send(req)?)?;
        api.store.save(&session)?;
        info!(user_id = session.user.id, "signed in");
        api.session = Some(session.clone());
        Ok(session)
    }

    pub fn register(self, name: &str, email: &str, password: &str) -> Result<Registered, ApiError> {
        let api = self.api;
        let req = api.client.build_register(name, email, password)?;
        api.client.parse_register(api.send(req)?)
    }

    /// Forget the session locally. No request is sent.
    ///
    /// The cached session is dropped even if clearing storage fails.
    pub fn logout(self) -> Result<(), ApiError> {
        let api = self.api;
        let user_id = api.session.take().map(|s| s.user.id);
        api.store.clear()?;
        info!(?user_id, "signed out");
        Ok(())
    }
}

pub struct Pets<'a, T, S> {
    api: &'a Api<T, S>,
}

impl<T: Transport, S: Storage> Pets<'_, T, S> {
    pub fn get_all(&self) -> Result<Vec<Pet>, ApiError> {
        let api = self.api;
        let req = api.client.build_list_pets(api.token());
        api.client.parse_list_pets(api.send(req)?)
    }

    pub fn create(&self, pet: &NewPet) -> Result<Confirmation<Pet>, ApiError> {
        let api = self.api;
        let req = api.client.build_create_pet(pet, api.token())?;
        api.client.parse_create_pet(api.send(req)?)
    }

    pub fn update(&self, id: PetId, pet: &PetUpdate) -> Result<Confirmation<Pet>, ApiError> {
        let api = self.api;
        let req = api.client.build_update_pet(id, pet, api.token())?;
        api.client.parse_update_pet(api.send(req)?)
    }

    pub fn delete(&self, id: PetId) -> Result<Confirmation, ApiError> {
        let api = self.api;
        let req = api.client.build_delete_pet(id, api.token());
        api.client.parse_delete_pet(api.send(req)?)
    }
}

pub struct Adoptions<'a, T, S> {
    api: &'a Api<T, S>,
}

impl<T: Transport, S: Storage> Adoptions<'_, T, S> {
    pub fn create(&self, request: &NewAdoption) -> Result<Confirmation<AdoptionRequest>, ApiError> {
        let api = self.api;
        let req = api.client.build_create_adoption(request, api.token())?;
        api.client.parse_create_adoption(api.send(req)?)
    }

    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<AdoptionRequest>, ApiError> {
        let api = self.api;
        let req = api.client.build_list_adoptions(user_id, api.token());
        api.client.parse_list_adoptions(api.send(req)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, TOKEN_KEY, USER_KEY};
    use crate::testing::{canned, client, signed_in, unreachable_server};

    #[test]
    fn login_persists_token_and_user() {
        let (transport, _) = canned(
            200,
            r#"{"token":"test-token","user":{"id":1,"email":"test@example.com"}}"#,
        );
        let mut api = Api::init(client(), transport, MemoryStorage::new());

        let session = api.auth().login("test@example.com", "password").unwrap();

        assert_eq!(session.token, "test-token");
        let storage = api.store().storage();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("test-token"));
        assert!(storage.get(USER_KEY).unwrap().is_some());
        assert_eq!(api.current_user().map(|u| u.id), Some(1));
    }

    #[test]
    fn rejected_login_leaves_session_untouched() {
        let storage = signed_in("old-token", "user");
        let (transport, _) = canned(401, r#"{"error":"Invalid credentials"}"#);
        let mut api = Api::init(client(), transport, storage);

        let err = api.auth().login("test@example.com", "wrong").unwrap_err();

        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(api.session().map(|s| s.token.as_str()), Some("old-token"));
        assert_eq!(
            api.store().storage().get(TOKEN_KEY).unwrap().as_deref(),
            Some("old-token")
        );
    }

    #[test]
    fn transport_failure_on_login_leaves_storage_empty() {
        let mut api = Api::init(client(), unreachable_server, MemoryStorage::new());
        let err = api.auth().login("a@b.c", "pw").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(api.session().is_none());
        assert!(api.store().load().unwrap().is_none());
    }

    #[test]
    fn logout_clears_without_network() {
        let storage = signed_in("test-token", "user");
        let (transport, seen) = canned(500, "");
        let mut api = Api::init(client(), transport, storage);
        assert!(api.session().is_some());

        api.auth().logout().unwrap();

        assert!(seen.borrow().is_empty());
        assert!(api.session().is_none());
        assert!(api.store().storage().get(TOKEN_KEY).unwrap().is_none());
        assert!(api.store().storage().get(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn logout_when_signed_out_is_fine() {
        let mut api = Api::init(client(), unreachable_server, MemoryStorage::new());
        api.auth().logout().unwrap();
        assert!(api.session().is_none());
    }

    #[test]
    fn hydrated_token_is_attached() {
        let storage = signed_in("test-token", "user");
        let (transport, seen) = canned(200, r#"{"data":[]}"#);
        let api = Api::init(client(), transport, storage);

        assert!(api.pets().get_all().unwrap().is_empty());

        let seen = seen.borrow();
        assert_eq!(seen[0].header("authorization"), Some("Bearer test-token"));
    }

    #[test]
    fn calls_without_a_session_go_out_unauthenticated() {
        let (transport, seen) = canned(401, r#"{"error":"Authentication required"}"#);
        let api = Api::init(client(), transport, MemoryStorage::new());

        let err = api.adoptions().get_by_user(1).unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert!(seen.borrow()[0].header("authorization").is_none());
    }

    #[test]
    fn register_returns_server_message() {
        let (transport, _) = canned(201, r#"{"message":"User registered successfully"}"#);
        let mut api = Api::init(client(), transport, MemoryStorage::new());
        let registered = api
            .auth()
            .register("Test User", "test@example.com", "password")
            .unwrap();
        assert_eq!(registered.message, "User registered successfully");
        assert!(api.session().is_none());
    }

    #[test]
    fn pet_writes_report_success() {
        let (transport, seen) = canned(200, r#"{"success":true,"message":"Pet updated successfully"}"#);
        let api = Api::init(client(), transport, MemoryStorage::new());
        let update = PetUpdate {
            name: Some("Max Updated".to_string()),
            age: Some(3),
            ..PetUpdate::default()
        };
        assert!(api.pets().update(1, &update).unwrap().success);
        assert!(api.pets().delete(1).unwrap().success);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn adoption_create_reports_success() {
        let (transport, _) = canned(
            201,
            r#"{"success":true,"message":"Adoption request submitted successfully"}"#,
        );
        let api = Api::init(client(), transport, MemoryStorage::new());
        let ack = api
            .adoptions()
            .create(&NewAdoption {
                pet_id: 1,
                user_id: 1,
                message: "I would love to adopt this pet".to_string(),
            })
            .unwrap();
        assert_eq!(ack.message, "Adoption request submitted successfully");
    }

    #[test]
    fn capabilities_follow_role() {
        assert!(!Capabilities::default().is_signed_in());

        let api = Api::init(client(), unreachable_server, signed_in("t", "admin"));
        assert!(api.capabilities().can_manage_pets());

        let storage = signed_in("t", "user");
        let api = Api::init(client(), unreachable_server, storage);
        assert!(!api.capabilities().can_manage_pets());
        assert!(api.capabilities().can_request_adoption());
    }
}
