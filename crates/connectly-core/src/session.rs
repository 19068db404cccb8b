//! Session token storage and retrieval.
//!
//! The current session is stored in `${CONNECTLY_HOME}/session.json` with
//! restricted permissions (0600). Tokens are never logged or displayed in
//! full. The store is the single writer of that file: no other component
//! touches the token key.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// On-disk shape of the persisted session.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Holds the current authentication token and derived status.
///
/// The token is read from disk once at construction; afterwards
/// [`SessionStore::is_authenticated`] is a pure in-memory query.
#[derive(Debug)]
pub struct SessionStore {
    token: Option<String>,
    path: PathBuf,
}

impl SessionStore {
    /// Loads the session from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(paths::session_path())
    }

    /// Loads the session from an explicit path. A missing file means
    /// anonymous; an empty or whitespace token on disk is treated as absent.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let token = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read session from {}", path.display()))?;
            let file: SessionFile = serde_json::from_str(&contents)
                .with_context(|| format!("parse session at {}", path.display()))?;
            file.token.filter(|t| !t.trim().is_empty())
        } else {
            None
        };

        Ok(Self { token, path })
    }

    /// Stores the token, marks the session authenticated, and persists it.
    pub fn set_session(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        anyhow::ensure!(!token.trim().is_empty(), "session token is empty");
        self.token = Some(token);
        self.persist()
    }

    /// Clears the token from memory and disk. Idempotent: clearing an
    /// already-anonymous session is a no-op, not an error.
    pub fn clear_session(&mut self) -> Result<()> {
        self.token = None;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("remove session at {}", self.path.display()))?;
        }
        Ok(())
    }

    /// Returns true iff a token is present. Pure query, no side effects.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Read access to the raw token for authenticated calls.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }

        let file = SessionFile {
            token: self.token.clone(),
        };
        let contents = serde_json::to_string_pretty(&file).context("serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut out = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("open {} for writing", self.path.display()))?;
            out.write_all(contents.as_bytes())
                .with_context(|| format!("write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::load_from(dir.path().join("session.json")).unwrap()
    }

    #[test]
    fn starts_anonymous() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_in(&temp);
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn set_then_query_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = store_in(&temp);
        store.set_session("abc123").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("abc123"));

        // Re-reading from disk sees the same session.
        let reloaded = store_in(&temp);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("abc123"));
    }

    #[test]
    fn clear_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = store_in(&temp);
        store.set_session("abc123").unwrap();

        store.clear_session().unwrap();
        assert!(!store.is_authenticated());

        // Second clear is a no-op, not an error.
        store.clear_session().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clear_removes_persisted_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("session.json");
        let mut store = SessionStore::load_from(path.clone()).unwrap();
        store.set_session("abc123").unwrap();
        assert!(path.exists());
        store.clear_session().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn rejects_empty_token() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = store_in(&temp);
        assert!(store.set_session("  ").is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_token_on_disk_is_anonymous() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("session.json");
        std::fs::write(&path, r#"{"token": ""}"#).unwrap();
        let store = SessionStore::load_from(path).unwrap();
        assert!(!store.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_has_restricted_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("session.json");
        let mut store = SessionStore::load_from(path.clone()).unwrap();
        store.set_session("abc123").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
