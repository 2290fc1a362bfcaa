//! View models for the adoption UI.
//!
//! # Design
//! Each view is plain state plus the text a renderer would put on screen.
//! A view starts `Loading`, and once its request resolves it holds exactly
//! one of: the loaded items, an empty-state message, or an error message.
//! Filtering and selection work on already-loaded data and never call the
//! API again.

pub mod adopt;
pub mod adoption_form;
pub mod adoption_requests;
pub mod auth;
pub mod care_tip;

use tracing::warn;

use crate::error::ApiError;

pub const LOADING: &str = "Loading...";

/// Static copy for the two terminal non-data states of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMessages {
    pub failed: &'static str,
    pub empty: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<T> {
    Loading,
    Failed { message: &'static str },
    Empty { message: &'static str },
    Populated(Vec<T>),
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState::Loading
    }
}

impl<T> ListState<T> {
    /// Settle a list view from its fetch result.
    ///
    /// The underlying error is logged, never shown; the view shows its own
    /// static message.
    pub fn resolve(result: Result<Vec<T>, ApiError>, messages: ListMessages) -> Self {
        match result {
            Ok(items) if items.is_empty() => ListState::Empty {
                message: messages.empty,
            },
            Ok(items) => ListState::Populated(items),
            Err(e) => {
                warn!(error = %e, view_message = messages.failed, "list failed to load");
                ListState::Failed {
                    message: messages.failed,
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    /// Loaded items; empty for every other state.
    pub fn items(&self) -> &[T] {
        match self {
            ListState::Populated(items) => items,
            _ => &[],
        }
    }

    /// The single status line shown instead of items, if any.
    pub fn status_message(&self) -> Option<&'static str> {
        match self {
            ListState::Loading => Some(LOADING),
            ListState::Failed { message } | ListState::Empty { message } => Some(*message),
            ListState::Populated(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListState<U> {
        match self {
            ListState::Loading => ListState::Loading,
            ListState::Failed { message } => ListState::Failed { message },
            ListState::Empty { message } => ListState::Empty { message },
            ListState::Populated(items) => ListState::Populated(items.into_iter().map(f).collect()),
        }
    }
}
