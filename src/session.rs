//! Persisted authentication state.
//!
//! The session is a flat string-to-string map saved as JSON, holding the
//! auth token under [`TOKEN_KEY`] and the serialized [`User`] under
//! [`USER_KEY`]. A session is authenticated only when both are present
//! and the user record parses.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::User;

/// Key holding the auth token.
pub const TOKEN_KEY: &str = "auth_token";
/// Key holding the JSON-serialized user.
pub const USER_KEY: &str = "user_data";

// Written alongside the main keys for older front-ends, cleared on logout.
const LEGACY_KEYS: [&str; 2] = ["user_id", "username"];

/// File-backed session store.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    user: Option<User>,
}

impl SessionStore {
    /// Open the session stored at `path`. A missing file is an empty
    /// session; an unreadable one is discarded with a warning.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Discarding unreadable session file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let mut store = Self {
            path,
            entries,
            user: None,
        };
        store.check_auth_status()?;
        Ok(store)
    }

    /// Recompute the authenticated user from the stored keys. A stored
    /// user record that no longer parses logs the session out.
    pub fn check_auth_status(&mut self) -> Result<()> {
        self.user = None;

        let (Some(_), Some(raw)) = (self.entries.get(TOKEN_KEY), self.entries.get(USER_KEY)) else {
            return Ok(());
        };

        match serde_json::from_str::<User>(raw) {
            Ok(user) => {
                debug!("Restored session for {}", user.username);
                self.user = Some(user);
                Ok(())
            }
            Err(e) => {
                warn!("Stored user record is corrupt, logging out: {}", e);
                self.logout()
            }
        }
    }

    /// Store a fresh login.
    pub fn set_user(&mut self, token: &str, user: User) -> Result<()> {
        self.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.entries
            .insert(USER_KEY.to_string(), serde_json::to_string(&user)?);
        self.entries
            .insert(LEGACY_KEYS[0].to_string(), user.id.to_string());
        self.entries
            .insert(LEGACY_KEYS[1].to_string(), user.username.clone());
        self.user = Some(user);
        self.save()
    }

    /// Forget the token and user.
    pub fn logout(&mut self) -> Result<()> {
        self.entries.remove(TOKEN_KEY);
        self.entries.remove(USER_KEY);
        for key in LEGACY_KEYS {
            self.entries.remove(key);
        }
        self.user = None;
        self.save()
    }

    /// The stored token, whether or not the user record is valid.
    pub fn token(&self) -> Option<&str> {
        self.entries.get(TOKEN_KEY).map(String::as_str)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}
