//! # Registration Boundary
//!
//! The payload sent to the account service and the two collaborators the
//! wizard talks to when it completes.
//!
//! - [`AccountService`] creates the account (`POST /register` in the app).
//! - [`SessionStore`] signs the new user in. It is handed to the wizard at
//!   construction and called exactly once, after the account exists.

use crate::primitives::{FIELD_EMAIL, FIELD_PASSWORD, FIELD_PASSWORD_CONFIRMATION, FIELD_ROLE};
use crate::types::{AccountError, BlackbeltError, FormValues, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// PAYLOAD
// =============================================================================

/// Body of the registration request.
///
/// Holds the role plus every accumulated field except the password
/// confirmation, which never leaves the wizard.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub role: Role,
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
}

impl RegistrationPayload {
    /// Build a payload from accumulated form values.
    #[must_use]
    pub fn new(role: Role, values: FormValues) -> Self {
        let mut fields = values.into_inner();
        fields.remove(FIELD_PASSWORD_CONFIRMATION);
        fields.remove(FIELD_ROLE);
        Self { role, fields }
    }

    /// Value of a field in the payload.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Login e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        self.get(FIELD_EMAIL).unwrap_or_default()
    }

    /// Field names carried by the payload, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for RegistrationPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .fields
            .iter()
            .map(|(k, v)| {
                let shown = if k == FIELD_PASSWORD { "<redacted>" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("RegistrationPayload")
            .field("role", &self.role)
            .field("fields", &redacted)
            .finish()
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// Creates accounts.
///
/// Synchronous form of the account service. Async callers drive
/// [`crate::Wizard::begin_submission`] and
/// [`crate::Wizard::finish_submission`] themselves instead.
pub trait AccountService {
    fn register(&mut self, payload: &RegistrationPayload) -> Result<(), AccountError>;
}

/// Establishes an authenticated session for a freshly registered user.
pub trait SessionStore {
    fn establish_session(&mut self, credentials: &RegistrationPayload) -> Result<(), BlackbeltError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &mut T {
    fn establish_session(&mut self, credentials: &RegistrationPayload) -> Result<(), BlackbeltError> {
        (**self).establish_session(credentials)
    }
}

impl<T: AccountService + ?Sized> AccountService for &mut T {
    fn register(&mut self, payload: &RegistrationPayload) -> Result<(), AccountError> {
        (**self).register(payload)
    }
}

// =============================================================================
// TESTS
// =============================================================================
