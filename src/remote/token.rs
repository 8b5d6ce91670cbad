//! Session token storage.
//!
//! The backend authenticates requests with an opaque token sent in the
//! `X-Auth-Token` header. The token is provisioned out of band and kept in a
//! small JSON key/value file (`<data dir>/storage.json`) under the key
//! `token`. `BACHES_TOKEN` overrides whatever is stored.
//!
//! The transport only ever reads the token, through a [`TokenProvider`], and
//! reads it again on every request so a token replaced mid-session is picked
//! up by the next call.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::config::data_dir;
use crate::error::Result;

pub const TOKEN_KEY: &str = "token";
pub const ENV_TOKEN: &str = "BACHES_TOKEN";

/// Capability to read the current session token.
pub trait TokenProvider: Send + Sync {
    /// The token to attach, or `None` to send the request unauthenticated.
    fn token(&self) -> Option<SecretString>;
}

/// Persistent string key/value storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage in the application data directory
    pub fn default_location() -> Self {
        Self::new(data_dir().join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }
}

/// Where the active token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Storage,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Environment => write!(f, "environment ({ENV_TOKEN})"),
            TokenSource::Storage => write!(f, "storage"),
        }
    }
}

/// Reads `BACHES_TOKEN`, then the `token` key of a [`TokenStorage`].
#[derive(Debug, Clone)]
pub struct StoredTokenProvider {
    storage: TokenStorage,
}

impl StoredTokenProvider {
    pub fn new(storage: TokenStorage) -> Self {
        Self { storage }
    }

    /// The raw token and its origin.
    ///
    /// An unreadable storage file counts as "no token"; the request goes out
    /// unauthenticated and the backend decides.
    pub fn lookup(&self) -> Option<(String, TokenSource)> {
        if let Ok(token) = env::var(ENV_TOKEN)
            && !token.trim().is_empty()
        {
            return Some((token.trim().to_string(), TokenSource::Environment));
        }

        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => {
                Some((token.trim().to_string(), TokenSource::Storage))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(path = %self.storage.path().display(), error = %e, "cannot read token storage");
                None
            }
        }
    }
}

impl TokenProvider for StoredTokenProvider {
    fn token(&self) -> Option<SecretString> {
        self.lookup().map(|(token, _)| SecretString::from(token))
    }
}

/// A fixed token (or none), for tests and one-off clients.
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn none() -> Self {
        Self { token: None }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<SecretString> {
        self.token.clone().map(SecretString::from)
    }
}

/// Show only the first and last two characters of a token
pub fn mask_token(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
