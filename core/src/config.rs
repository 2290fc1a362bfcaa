//! Client configuration loaded from the environment.

use std::path::PathBuf;

use crate::client::AdoptlyClient;
use crate::session::{FileStorage, MemoryStorage, Storage};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Overrides `{api_url}/tips`.
    pub tips_url: Option<String>,
    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tips_url: None,
            session_path: None,
        }
    }
}

impl ClientConfig {
    /// Load from `ADOPTLY_API_URL`, `ADOPTLY_TIPS_URL`, `ADOPTLY_SESSION_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("ADOPTLY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            tips_url: non_empty("ADOPTLY_TIPS_URL"),
            session_path: non_empty("ADOPTLY_SESSION_PATH").map(PathBuf::from),
        }
    }

    pub fn client(&self) -> AdoptlyClient {
        let client = AdoptlyClient::new(&self.api_url);
        match &self.tips_url {
            Some(url) => client.with_tips_url(url),
            None => client,
        }
    }

    pub fn storage(&self) -> Box<dyn Storage> {
        match &self.session_path {
            Some(path) => Box::new(FileStorage::new(path)),
            None => Box::new(MemoryStorage::new()),
        }
    }
}
