//! # Session Context
//!
//! The authenticated user and their bearer token, persisted as JSON between
//! CLI invocations. `logout` removes the file.

use crate::api::{AuthResponse, UserProfile};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Who is signed in, and the credential attached to every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user: UserProfile,
    pub token: String,
}

impl From<AuthResponse> for SessionContext {
    fn from(resp: AuthResponse) -> Self {
        Self {
            user: resp.user,
            token: resp.token,
        }
    }
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved session. `Ok(None)` when nobody is signed in.
    pub fn load(&self) -> Result<Option<SessionContext>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::Session(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        let session = serde_json::from_str(&text).map_err(|e| {
            AppError::Session(format!("Corrupt session file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(session))
    }

    /// Like `load`, but signing in is mandatory.
    pub fn require(&self) -> Result<SessionContext, AppError> {
        self.load()?.ok_or_else(|| {
            AppError::Session("Not logged in. Run `roster login` first".to_string())
        })
    }

    pub fn save(&self, session: &SessionContext) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Io(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Session(e.to_string()))?;
        std::fs::write(&self.path, json)
            .map_err(|e| AppError::Io(format!("Cannot write {}: {}", self.path.display(), e)))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Forget the session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(format!(
                "Cannot remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionContext {
        SessionContext {
            user: UserProfile {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@uni.edu".to_string(),
                role: "teacher".to_string(),
            },
            token: "secret-token".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_signed_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().expect("load"), None);
        assert!(matches!(store.require(), Err(AppError::Session(_))));
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        store.save(&sample()).expect("save");
        assert_eq!(store.load().expect("load"), Some(sample()));

        assert!(store.clear().expect("clear"));
        assert!(!store.clear().expect("clear again"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").expect("write");
        assert!(matches!(
            SessionStore::new(path).load(),
            Err(AppError::Session(_))
        ));
    }
}
