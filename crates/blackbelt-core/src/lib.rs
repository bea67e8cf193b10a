//! # blackbelt-core
//!
//! Client-side logic for the Blackbelt martial-arts academy - THE WIZARD.
//!
//! This crate holds everything the academy front-end decides on its own:
//! which registration steps a role goes through, whether a form may move on,
//! what gets sent to the account service, and how the dashboard counts
//! athletes per belt.
//!
//! ## Architectural Constraints
//!
//! - No async, no network: collaborators come in through the
//!   [`AccountService`] and [`SessionStore`] traits
//! - Single owner: a [`Wizard`] owns its values and errors; nothing is shared
//! - Contract violations are returned as [`BlackbeltError`], never panics

// =============================================================================
// MODULES
// =============================================================================

pub mod academy;
pub mod belts;
pub mod classes;
pub mod forms;
pub mod primitives;
pub mod registration;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{AccountError, BlackbeltError, FieldErrors, FormValues, Role};

// =============================================================================
// RE-EXPORTS: Wizard and Forms
// =============================================================================

pub use academy::{Athlete, AthleteUpdate, Championship, Student};
pub use belts::{Belt, BeltCount, BeltTally};
pub use classes::{ClassDraft, NewClass};
pub use forms::{athlete_schema, class_schema, registration_schema};
pub use registration::{AccountService, RegistrationPayload, SessionStore};
pub use validation::{Rule, Schema, Validate};
pub use wizard::{
    Step, StepOutcome, StepSequence, SubmissionStatus, Submission, SubmitOutcome, Wizard,
    step_count,
};
