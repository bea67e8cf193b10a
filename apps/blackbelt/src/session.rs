//! # File-Backed Session Store
//!
//! Records the freshly registered user in a small TOML file so later commands
//! know who is signed in. The password is never written.

use crate::error::CliError;
use blackbelt_core::primitives::{FIELD_FIRST_NAME, FIELD_LAST_NAME};
use blackbelt_core::{BlackbeltError, RegistrationPayload, Role, SessionStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Who is signed in, as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub established_at: DateTime<Utc>,
}

impl SessionRecord {
    fn from_payload(payload: &RegistrationPayload) -> Self {
        Self {
            email: payload.email().to_string(),
            role: payload.role,
            first_name: payload.get(FIELD_FIRST_NAME).unwrap_or_default().to_string(),
            last_name: payload.get(FIELD_LAST_NAME).unwrap_or_default().to_string(),
            established_at: Utc::now(),
        }
    }
}

/// Session store writing to a TOML file.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. `None` when nobody has signed in yet.
    pub fn load(&self) -> Result<Option<SessionRecord>, CliError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map(Some).map_err(|e| CliError::Config {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl SessionStore for SessionFile {
    fn establish_session(&mut self, credentials: &RegistrationPayload) -> Result<(), BlackbeltError> {
        let record = SessionRecord::from_payload(credentials);
        let text = toml::to_string(&record).map_err(|e| BlackbeltError::Session(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| {
            BlackbeltError::Session(format!("{}: {e}", self.path.display()))
        })?;
        tracing::info!(email = %record.email, path = %self.path.display(), "session established");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackbelt_core::FormValues;

    fn payload() -> RegistrationPayload {
        let values = FormValues::new()
            .with("email", "mestre@academy.com")
            .with("password", "s3cret!")
            .with("first_name", "Carlos")
            .with("last_name", "Gracie");
        RegistrationPayload::new(Role::Master, values)
    }

    #[test]
    fn session_is_written_without_password() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SessionFile::new(dir.path().join("session.toml"));

        store.establish_session(&payload()).expect("establish");

        let text = std::fs::read_to_string(store.path()).expect("read");
        assert!(!text.contains("s3cret!"));
        let record = store.load().expect("load").expect("present");
        assert_eq!(record.email, "mestre@academy.com");
        assert_eq!(record.role, Role::Master);
        assert_eq!(record.first_name, "Carlos");
    }

    #[test]
    fn missing_file_means_no_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionFile::new(dir.path().join("none.toml"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn unwritable_path_is_a_session_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SessionFile::new(dir.path().join("missing-dir").join("s.toml"));
        let err = store.establish_session(&payload()).expect_err("no parent dir");
        assert!(matches!(err, BlackbeltError::Session(_)));
    }
}
