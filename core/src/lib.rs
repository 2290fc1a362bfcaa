//! Client core for the pet adoption service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! owning the network (host-does-IO pattern). The host supplies a
//! `Transport`; `Api` ties that transport to a persisted `Session` and
//! exposes the grouped `auth` / `pets` / `adoptions` calls that the view
//! models in `views` consume.
//!
//! # Design
//! - `AdoptlyClient` is stateless; it holds only URLs. Tokens are passed in
//!   per call by `Api`.
//! - The session's `token` and `user` are written and cleared as one batch,
//!   so they are never observed independently.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod session;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{Api, Capabilities};
pub use client::AdoptlyClient;
pub use config::ClientConfig;
pub use error::{ApiError, StorageError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use session::{FileStorage, MemoryStorage, SessionStore, Storage};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{
    AdoptionRequest, AdoptionStatus, CareTip, Confirmation, NewAdoption, NewPet, Pet, PetStatus,
    PetUpdate, Role, Session, User,
};
