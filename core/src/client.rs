//! Stateless HTTP request builder and response parser for the adoption API.
//!
//! # Design
//! `AdoptlyClient` holds only URLs and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The session token is passed in per call rather than stored, so the
//! client never observes a half-written session.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AdoptionRequest, CareTip, Confirmation, NewAdoption, NewPet, Pet, PetId, PetUpdate,
    Registered, Session, UserId,
};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `{ success?, data }` wrapper used by the list endpoints.
#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: String,
    data: T,
}

#[derive(Deserialize)]
struct TipsEnvelope {
    tips: Vec<CareTip>,
}

/// Synchronous, stateless client for the adoption API.
#[derive(Debug, Clone)]
pub struct AdoptlyClient {
    base_url: String,
    tips_url: String,
}

impl AdoptlyClient {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let tips_url = format!("{base_url}/tips");
        Self { base_url, tips_url }
    }

    /// Fetch care tips from somewhere other than `{base_url}/tips`.
    pub fn with_tips_url(mut self, tips_url: &str) -> Self {
        self.tips_url = tips_url.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // auth
    // -----------------------------------------------------------------------

    pub fn build_login(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&Credentials { email, password })?;
        Ok(self.request(HttpMethod::Post, "/auth/login", None, Some(body)))
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<Session, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn build_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(&Registration {
            name,
            email,
            password,
        })?;
        Ok(self.request(HttpMethod::Post, "/auth/register", None, Some(body)))
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<Registered, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    // -----------------------------------------------------------------------
    // pets
    // -----------------------------------------------------------------------

    pub fn build_list_pets(&self, token: Option<&str>) -> HttpRequest {
        self.request(HttpMethod::Get, "/pets", token, None)
    }

    pub fn parse_list_pets(&self, response: HttpResponse) -> Result<Vec<Pet>, ApiError> {
        parse_data(response)
    }

    pub fn build_create_pet(
        &self,
        input: &NewPet,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/pets", token, Some(body)))
    }

    pub fn parse_create_pet(&self, response: HttpResponse) -> Result<Confirmation<Pet>, ApiError> {
        parse_confirmation(response)
    }

    pub fn build_update_pet(
        &self,
        id: PetId,
        input: &PetUpdate,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Put, &format!("/pets/{id}"), token, Some(body)))
    }

    pub fn parse_update_pet(&self, response: HttpResponse) -> Result<Confirmation<Pet>, ApiError> {
        parse_confirmation(response)
    }

    pub fn build_delete_pet(&self, id: PetId, token: Option<&str>) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/pets/{id}"), token, None)
    }

    pub fn parse_delete_pet(&self, response: HttpResponse) -> Result<Confirmation, ApiError> {
        parse_confirmation(response)
    }

    // -----------------------------------------------------------------------
    // adoptions
    // -----------------------------------------------------------------------

    pub fn build_create_adoption(
        &self,
        input: &NewAdoption,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, "/adoptions", token, Some(body)))
    }

    pub fn parse_create_adoption(
        &self,
        response: HttpResponse,
    ) -> Result<Confirmation<AdoptionRequest>, ApiError> {
        parse_confirmation(response)
    }

    pub fn build_list_adoptions(&self, user_id: UserId, token: Option<&str>) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("/adoptions?user={user_id}"),
            token,
            None,
        )
    }

    pub fn parse_list_adoptions(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<AdoptionRequest>, ApiError> {
        parse_data(response)
    }

    // -----------------------------------------------------------------------
    // care tips
    // -----------------------------------------------------------------------

    pub fn build_care_tips(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.tips_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_care_tips(&self, response: HttpResponse) -> Result<Vec<CareTip>, ApiError> {
        check_status(&response)?;
        from_json::<TipsEnvelope>(&response.body).map(|envelope| envelope.tips)
    }

    fn request(
        &self,
        method: HttpMethod,
        route: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers,
            body,
        }
    }
}

fn default_true() -> bool {
    true
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn parse_data<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    let envelope: DataEnvelope<T> = from_json(&response.body)?;
    if !envelope.success {
        return Err(ApiError::Rejected(envelope.message));
    }
    Ok(envelope.data)
}

fn parse_confirmation<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<Confirmation<T>, ApiError> {
    check_status(&response)?;
    let confirmation: Confirmation<T> = from_json(&response.body)?;
    if !confirmation.success {
        return Err(ApiError::Rejected(confirmation.message));
    }
    Ok(confirmation)
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        401 => Err(ApiError::Unauthorized {
            message: error_message(&response.body),
        }),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::Http {
            status,
            message: error_message(&response.body),
        }),
    }
}

/// Pull `error` (or `message`) out of a JSON error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
