//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::client::AdoptlyClient;
use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::{MemoryStorage, Storage, TOKEN_KEY, USER_KEY};

pub type Recorded = Rc<RefCell<Vec<HttpRequest>>>;

pub fn client() -> AdoptlyClient {
    AdoptlyClient::new("http://localhost:3000")
}

/// A transport that answers every request with `status`/`body` and records
/// what it was sent.
pub fn canned(
    status: u16,
    body: &'static str,
) -> (
    impl Fn(HttpRequest) -> Result<HttpResponse, TransportError>,
    Recorded,
) {
    let seen: Recorded = Rc::default();
    let log = seen.clone();
    let transport = move |req: HttpRequest| {
        log.borrow_mut().push(req);
        Ok(HttpResponse::new(status, body))
    };
    (transport, seen)
}

pub fn unreachable_server(_: HttpRequest) -> Result<HttpResponse, TransportError> {
    Err(TransportError::new("connection refused"))
}

/// Storage holding a session for user 1 with `role`.
pub fn signed_in(token: &str, role: &str) -> MemoryStorage {
    let storage = MemoryStorage::new();
    let user = format!(r#"{{"id":1,"email":"test@example.com","role":"{role}"}}"#);
    storage
        .write_batch(&[(TOKEN_KEY, Some(token)), (USER_KEY, Some(user.as_str()))])
        .unwrap();
    storage
}

pub const MAX_PETS: &str = r#"{"data":[{"id":1,"name":"Max","type":"dog","breed":"Labrador","age":2,
    "description":"Friendly dog","image_url":"https://example.com/dog.jpg","status":"available"}]}"#;

pub const MAX_REQUESTS: &str = r#"{"success":true,"data":[{"id":1,"pet_id":1,"user_id":1,
    "message":"Test adoption request","status":"pending","created_at":"2025-03-01T12:00:00Z",
    "pet_name":"Max","image_url":"https://example.com/dog.jpg","breed":"Labrador","age":2,
    "type":"dog"}]}"#;
