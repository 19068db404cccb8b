//! Local profile storage backing the profile and edit-profile screens.
//!
//! Persisted as `${CONNECTLY_HOME}/profile.json`. Edits patch only the
//! fields the user provided, the way the edit form patches values into the
//! existing profile.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user's display profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub bio: String,
    pub avatar_url: String,
    pub email: String,
    pub location: String,
    pub joined: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
            email: String::new(),
            location: String::new(),
            joined: Utc::now(),
        }
    }
}

/// A partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.email.is_none()
            && self.location.is_none()
    }
}

impl UserProfile {
    /// Loads the profile from disk; a missing file yields a blank profile
    /// joined "now".
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read profile from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parse profile at {}", path.display()))
    }

    /// Saves the profile to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("serialize profile")?;
        fs::write(path, contents).with_context(|| format!("write profile to {}", path.display()))?;
        Ok(())
    }

    /// Applies a partial edit, patching only the provided fields.
    pub fn apply_edit(&mut self, edit: ProfileEdit) {
        if let Some(name) = edit.name {
            self.name = name.trim().to_string();
        }
        if let Some(bio) = edit.bio {
            self.bio = bio.trim().to_string();
        }
        if let Some(avatar_url) = edit.avatar_url {
            self.avatar_url = avatar_url.trim().to_string();
        }
        if let Some(email) = edit.email {
            self.email = email.trim().to_string();
        }
        if let Some(location) = edit.location {
            self.location = location.trim().to_string();
        }
    }

    /// Display name for authored content; blank profiles post as "you".
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { "you" } else { &self.name }
    }
}
