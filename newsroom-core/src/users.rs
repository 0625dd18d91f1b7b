use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::NewsError;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Preferences {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl Preferences {
    /// Both lists must hold non-empty strings; empty lists are allowed.
    pub fn validate(&self) -> Result<(), NewsError> {
        let ok = self
            .categories
            .iter()
            .chain(self.languages.iter())
            .all(|entry| !entry.is_empty());
        if ok {
            Ok(())
        } else {
            Err(NewsError::InvalidPreferences)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    // bcrypt hash, never the clear text
    pub password: String,
    pub preferences: Option<Preferences>,
}

/// JSON-file-backed user registry. The whole file is read at startup and
/// rewritten on every mutation, which is plenty for a single-process
/// personal backend.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<Vec<User>>>,
    path: Option<PathBuf>,
}

impl UserStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
            path: None,
        }
    }

    /// Missing or unreadable files load as an empty registry; a corrupted
    /// main file falls back to the temp file left by an interrupted write.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let users = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<User>>(&bytes) {
                Ok(users) => users,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "failed to parse users file, trying tmp fallback");
                    let tmp = path.with_extension("json.tmp");
                    match tokio::fs::read(&tmp).await {
                        Ok(tmp_bytes) => {
                            serde_json::from_slice(&tmp_bytes).unwrap_or_default()
                        }
                        Err(_) => Vec::new(),
                    }
                }
            },
            Err(_) => Vec::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(users)),
            path: Some(path),
        }
    }

    pub async fn create(&self, user: User) -> Result<(), NewsError> {
        let mut users = self.inner.write().await;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(NewsError::UserExists);
        }
        users.push(user);
        drop(users);
        self.persist().await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.inner.read().await;
        users.iter().find(|user| user.email == email).cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<User> {
        let users = self.inner.read().await;
        users.iter().find(|user| user.id == id).cloned()
    }

    /// Preferences of an existing user. An unknown id and a user without
    /// stored preferences are distinct errors.
    pub async fn preferences(&self, user_id: &str) -> Result<Preferences, NewsError> {
        let users = self.inner.read().await;
        let user = users
            .iter()
            .find(|user| user.id == user_id)
            .ok_or(NewsError::UserNotFound)?;
        user.preferences.clone().ok_or(NewsError::NoPreferences)
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        preferences: Preferences,
    ) -> Result<Preferences, NewsError> {
        preferences.validate()?;
        let mut users = self.inner.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(NewsError::UserNotFound)?;
        user.preferences = Some(preferences.clone());
        drop(users);
        self.persist().await?;
        Ok(preferences)
    }

    async fn persist(&self) -> Result<(), NewsError> {
        let Some(path) = &self.path else {
            debug!("user store is in-memory only; skipping persist");
            return Ok(());
        };
        let users = self.inner.read().await;
        let bytes = serde_json::to_vec_pretty(&*users)?;
        drop(users);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        // Write-then-rename keeps the registry readable if we die mid-write.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}
