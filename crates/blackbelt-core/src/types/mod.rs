//! # Core Type Definitions
//!
//! This module contains the shared types of the Blackbelt client core:
//! - Account roles (`Role`)
//! - Form state (`FormValues`, `FieldErrors`)
//! - Error types (`BlackbeltError`, `AccountError`)
//!
//! ## Determinism Guarantees
//!
//! Form maps use `BTreeMap` so that iteration, rendering and serialized
//! payloads always list fields in the same order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::wizard::Step;

// =============================================================================
// ROLE
// =============================================================================

/// The account type chosen on the first wizard step.
///
/// The serialized form is the label the academy API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Academy master (instructor).
    #[serde(rename = "Mestre")]
    Master,
    /// Enrolled student.
    #[serde(rename = "Aluno")]
    Student,
    /// Competing athlete. Self-registration is not open for this role yet.
    #[serde(rename = "Atleta")]
    Athlete,
}

impl Role {
    /// All roles in the order they are offered.
    pub const ALL: [Role; 3] = [Role::Master, Role::Student, Role::Athlete];

    /// The label used on the wire and in the role field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "Mestre",
            Self::Student => "Aluno",
            Self::Athlete => "Atleta",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Student => "Student",
            Self::Athlete => "Athlete",
        }
    }

    /// Whether accounts of this role can be created through the wizard.
    #[must_use]
    pub const fn can_self_register(self) -> bool {
        !matches!(self, Self::Athlete)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = BlackbeltError;

    /// Accepts either the wire label (`Mestre`) or the English name (`master`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| {
                role.as_str().eq_ignore_ascii_case(needle) || role.name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| BlackbeltError::UnknownRole(needle.to_string()))
    }
}

// =============================================================================
// FORM VALUES
// =============================================================================

/// Current values of a form, keyed by field name.
///
/// Values are kept as the raw strings the user typed; dates use `YYYY-MM-DD`.
/// Rules in the validation engine decide how to interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    /// Create an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`FormValues::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a value, if one was ever written.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value with surrounding whitespace removed; missing values read as "".
    #[must_use]
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).map(str::trim).unwrap_or("")
    }

    /// Remove a value and return it.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Whether a field holds no meaningful value.
    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.trimmed(name).is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Validation messages keyed by field name. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the Blackbelt core.
///
/// Field validation failures are not errors: they are reported through
/// [`FieldErrors`]. The variants below are contract violations or failures of
/// an injected collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackbeltError {
    /// The role can only be chosen on the role selection step.
    #[error("Role can only be changed on the first step (current step: {step})")]
    RoleLocked { step: usize },

    /// `advance` was called on the last step of the sequence.
    #[error("There is no step after {0}")]
    NoNextStep(Step),

    /// `submit` was called before reaching the last step.
    #[error("Cannot submit from step {0}")]
    NotFinalStep(Step),

    /// The selected role has no registration flow.
    #[error("Registration is not available for role {0}")]
    RegistrationUnavailable(Role),

    /// A submission is awaiting the account service.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// `finish_submission` was called without a pending submission.
    #[error("No submission is pending")]
    NoSubmissionPending,

    /// The wizard completed and no longer accepts input.
    #[error("Registration already completed")]
    WizardClosed,

    /// The session store failed after the account was created.
    #[error("Account created but the session could not be established: {0}")]
    Session(String),

    /// A role label did not match any known role.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A belt label did not match any known belt.
    #[error("Unknown belt: {0}")]
    UnknownBelt(String),

    /// A form failed validation outside of the wizard.
    #[error("Invalid form: {0}")]
    InvalidForm(FieldErrors),
}

/// Failure reported by the account service for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The service answered and refused the registration.
    #[error("{0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("Account service unreachable: {0}")]
    Unreachable(String),

    /// No answer arrived before the submission deadline.
    #[error("Account service did not answer within {0} seconds")]
    TimedOut(u64),
}

impl AccountError {
    /// Whether resubmitting the same data can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::TimedOut(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================
