//! Persisted sign-in session.
//!
//! The session is two string entries in a key-value store: the bearer token
//! under [`TOKEN_KEY`] and the user as JSON under [`USER_KEY`].

use crate::error::SessionError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tripvote_voting::User;

/// Key of the bearer token
pub const TOKEN_KEY: &str = "authToken";
/// Key of the JSON-encoded user
pub const USER_KEY: &str = "user";

/// A signed-in user and their token
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The user
    pub user: User,
    /// Bearer token for the remote API
    pub token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// String key-value storage for the session
pub trait SessionStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value; deleting a missing key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Load the persisted session
///
/// Returns `None` when either entry is missing. A user entry that does not
/// parse is treated as corruption: both entries are removed.
///
/// # Errors
///
/// Returns an error only if the store itself fails
pub fn restore_session(store: &dyn SessionStore) -> Result<Option<Session>, SessionError> {
    let (Some(token), Some(raw_user)) = (store.get(TOKEN_KEY)?, store.get(USER_KEY)?) else {
        tracing::debug!("No persisted session");
        return Ok(None);
    };

    match serde_json::from_str::<User>(&raw_user) {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Restored persisted session");
            Ok(Some(Session { user, token }))
        },
        Err(error) => {
            tracing::warn!(%error, "Discarding corrupted persisted session");
            clear_session(store)?;
            Ok(None)
        },
    }
}

/// Persist `session`, replacing any previous one
///
/// # Errors
///
/// Returns an error if the store cannot be written
pub fn persist_session(store: &dyn SessionStore, session: &Session) -> Result<(), SessionError> {
    let user = serde_json::to_string(&session.user)?;
    store.set(TOKEN_KEY, &session.token)?;
    store.set(USER_KEY, &user)
}

/// Remove the persisted session
///
/// # Errors
///
/// Returns an error if the store cannot be written
pub fn clear_session(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.remove(TOKEN_KEY)?;
    store.remove(USER_KEY)
}

/// In-memory store, lost on drop
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object in a file
///
/// Every write replaces the whole file through a sibling temporary file and a
/// rename. A missing file reads as empty. So does a file that is not a JSON
/// object; it is overwritten by the next write.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Use the file at `path`, created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => Ok(entries),
                Err(error) => {
                    tracing::warn!(path = %self.path.display(), %error, "Ignoring unreadable session file");
                    Ok(BTreeMap::new())
                },
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
