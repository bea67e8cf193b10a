//! # Registration Wizard
//!
//! Role-dependent, step-by-step account creation.
//!
//! Step 0 is always role selection. The chosen role fixes the step sequence:
//!
//! | Role | Sequence |
//! |---|---|
//! | none | `[RoleSelect]` |
//! | Master, Student | `[RoleSelect, Credentials, PersonalId, Name]` |
//! | Athlete | `[RoleSelect, Unavailable]` |
//!
//! ## Invariants
//!
//! - `current_step` always indexes into the current sequence.
//! - `advance` moves forward by exactly one step, and only when every field
//!   of the step validated.
//! - `retreat` never touches field values or errors.
//! - While a submission is in flight nothing but `finish_submission` is
//!   accepted; after a successful one the wizard is closed.

use crate::forms::registration_schema;
use crate::primitives::{
    FIELD_BIRTHDATE, FIELD_CPF, FIELD_EMAIL, FIELD_FIRST_NAME, FIELD_LAST_NAME, FIELD_PASSWORD,
    FIELD_PASSWORD_CONFIRMATION, FIELD_ROLE,
};
use crate::registration::{AccountService, RegistrationPayload, SessionStore};
use crate::types::{AccountError, BlackbeltError, FieldErrors, FormValues, Role};
use crate::validation::{Schema, Validate};
use std::fmt;

// =============================================================================
// STEPS
// =============================================================================

/// One screen of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RoleSelect,
    Credentials,
    PersonalId,
    Name,
    /// Shown for roles that cannot self-register; only offers going back.
    Unavailable,
}

impl Step {
    /// Fields owned by this step, in display order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::RoleSelect => &[FIELD_ROLE],
            Self::Credentials => &[FIELD_EMAIL, FIELD_PASSWORD, FIELD_PASSWORD_CONFIRMATION],
            Self::PersonalId => &[FIELD_CPF, FIELD_BIRTHDATE],
            Self::Name => &[FIELD_FIRST_NAME, FIELD_LAST_NAME],
            Self::Unavailable => &[],
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::RoleSelect => "Who are you?",
            Self::Credentials => "Login details",
            Self::PersonalId => "Personal documents",
            Self::Name => "Your name",
            Self::Unavailable => "Registration unavailable",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

const UNSELECTED_STEPS: [Step; 1] = [Step::RoleSelect];
const ACCOUNT_STEPS: [Step; 4] = [
    Step::RoleSelect,
    Step::Credentials,
    Step::PersonalId,
    Step::Name,
];
const UNAVAILABLE_STEPS: [Step; 2] = [Step::RoleSelect, Step::Unavailable];

/// The ordered steps for the selected role, fixed at selection time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSequence {
    Unselected,
    Master(&'static [Step]),
    Student(&'static [Step]),
    Athlete(&'static [Step]),
}

impl StepSequence {
    #[must_use]
    pub const fn for_role(role: Option<Role>) -> Self {
        match role {
            None => Self::Unselected,
            Some(Role::Master) => Self::Master(&ACCOUNT_STEPS),
            Some(Role::Student) => Self::Student(&ACCOUNT_STEPS),
            Some(Role::Athlete) => Self::Athlete(&UNAVAILABLE_STEPS),
        }
    }

    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::Unselected => None,
            Self::Master(_) => Some(Role::Master),
            Self::Student(_) => Some(Role::Student),
            Self::Athlete(_) => Some(Role::Athlete),
        }
    }

    #[must_use]
    pub const fn steps(self) -> &'static [Step] {
        match self {
            Self::Unselected => &UNSELECTED_STEPS,
            Self::Master(steps) | Self::Student(steps) | Self::Athlete(steps) => steps,
        }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.steps().len()
    }

    #[must_use]
    pub const fn last_index(self) -> usize {
        self.len().saturating_sub(1)
    }

    #[must_use]
    pub fn get(self, index: usize) -> Option<Step> {
        self.steps().get(index).copied()
    }

    /// Every field the sequence asks for, in step order.
    pub fn required_fields(self) -> impl Iterator<Item = &'static str> {
        self.steps().iter().flat_map(|step| step.fields().iter().copied())
    }
}

/// Number of steps for a role (1 while no role is selected).
#[must_use]
pub const fn step_count(role: Option<Role>) -> usize {
    StepSequence::for_role(role).len()
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Where the last submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Result of an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to the step at `to`.
    Advanced { to: usize },
    /// Stayed put; `errors` fields failed validation.
    Blocked { errors: usize },
}

/// Result of starting a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Validation failed; see `field_errors()`.
    Invalid { errors: usize },
    /// Payload ready to send. The wizard is now `Submitting`.
    Ready(RegistrationPayload),
}

/// Result of a completed submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed before anything was sent.
    Invalid { errors: usize },
    /// The account service refused or could not be reached.
    Failed(AccountError),
    /// Account created and session established. The wizard is closed.
    Registered,
}

// =============================================================================
// WIZARD
// =============================================================================

/// In-memory state of one registration attempt.
///
/// The session store is injected at construction and used once, after the
/// account service accepts the registration.
#[derive(Debug)]
pub struct Wizard<S, V = Schema> {
    current_step: usize,
    sequence: StepSequence,
    fields: FormValues,
    field_errors: FieldErrors,
    status: SubmissionStatus,
    last_error: Option<AccountError>,
    pending: Option<RegistrationPayload>,
    validator: V,
    session: S,
}

impl<S: SessionStore> Wizard<S, Schema> {
    /// Create a wizard validating with the registration schema.
    #[must_use]
    pub fn new(session: S) -> Self {
        Self::with_validator(session, registration_schema())
    }
}

impl<S: SessionStore, V: Validate> Wizard<S, V> {
    /// Create a wizard with a custom validation engine.
    #[must_use]
    pub fn with_validator(session: S, validator: V) -> Self {
        Self {
            current_step: 0,
            sequence: StepSequence::Unselected,
            fields: FormValues::new(),
            field_errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
            last_error: None,
            pending: None,
            validator,
            session,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The step being shown.
    #[must_use]
    pub fn step(&self) -> Step {
        self.sequence.get(self.current_step).unwrap_or(Step::RoleSelect)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn sequence(&self) -> StepSequence {
        self.sequence
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.sequence.role()
    }

    #[must_use]
    pub fn fields(&self) -> &FormValues {
        &self.fields
    }

    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Error from the last failed submission.
    #[must_use]
    pub fn last_error(&self) -> Option<&AccountError> {
        self.last_error.as_ref()
    }

    /// Whether the current step is the last of the sequence.
    #[must_use]
    pub fn is_final_step(&self) -> bool {
        self.current_step == self.sequence.last_index()
    }

    /// Whether registration completed. A closed wizard accepts no input.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == SubmissionStatus::Succeeded
    }

    /// Index of the step that owns a field in the current sequence.
    #[must_use]
    pub fn step_of_field(&self, field: &str) -> Option<usize> {
        self.sequence
            .steps()
            .iter()
            .position(|step| step.fields().contains(&field))
    }

    #[must_use]
    pub fn session_store(&self) -> &S {
        &self.session
    }

    fn ensure_open(&self) -> Result<(), BlackbeltError> {
        match self.status {
            SubmissionStatus::Succeeded => Err(BlackbeltError::WizardClosed),
            SubmissionStatus::Submitting => Err(BlackbeltError::SubmissionInProgress),
            SubmissionStatus::Idle | SubmissionStatus::Failed => Ok(()),
        }
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Choose the account role. Only allowed on the role selection step.
    pub fn select_role(&mut self, role: Role) -> Result<(), BlackbeltError> {
        self.ensure_open()?;
        if self.current_step != 0 {
            return Err(BlackbeltError::RoleLocked {
                step: self.current_step,
            });
        }
        self.sequence = StepSequence::for_role(Some(role));
        self.fields.set(FIELD_ROLE, role.as_str());
        tracing::info!(role = role.as_str(), steps = self.sequence.len(), "role selected");
        Ok(())
    }

    /// Write a field value without validating it.
    ///
    /// The role field is owned by [`Wizard::select_role`]: a parseable role
    /// written on the first step selects it, anything else is ignored.
    /// Input is dropped while a submission is in flight and once the wizard
    /// is closed.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        if self.ensure_open().is_err() {
            tracing::debug!(field = name, status = ?self.status, "ignoring input");
            return;
        }
        let value = value.into();
        if name == FIELD_ROLE {
            let selected = value.parse::<Role>().map(|role| self.select_role(role));
            if !matches!(selected, Ok(Ok(()))) {
                tracing::warn!(value = %value, "role field ignored");
            }
            return;
        }
        self.fields.set(name, value);
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Validate the current step's own fields and move forward if they pass.
    pub fn advance(&mut self) -> Result<StepOutcome, BlackbeltError> {
        let fields = self.step().fields();
        self.advance_with(fields)
    }

    /// Validate exactly `step_fields` and move forward if they all pass.
    ///
    /// Errors from this pass replace `field_errors`.
    pub fn advance_with(&mut self, step_fields: &[&str]) -> Result<StepOutcome, BlackbeltError> {
        self.ensure_open()?;
        if self.sequence != StepSequence::Unselected && self.is_final_step() {
            return Err(BlackbeltError::NoNextStep(self.step()));
        }

        self.field_errors = self.validator.validate(step_fields, &self.fields);
        if !self.field_errors.is_empty() {
            tracing::debug!(
                step = %self.step(),
                errors = self.field_errors.len(),
                "advance blocked"
            );
            return Ok(StepOutcome::Blocked {
                errors: self.field_errors.len(),
            });
        }

        // A passing role check without a selected role means the sequence
        // has nowhere to go.
        if self.is_final_step() {
            return Err(BlackbeltError::NoNextStep(self.step()));
        }
        self.current_step += 1;
        tracing::info!(step = self.current_step, name = %self.step(), "advanced");
        Ok(StepOutcome::Advanced {
            to: self.current_step,
        })
    }

    /// Go back one step. Returns `false` (and changes nothing) on step 0.
    pub fn retreat(&mut self) -> Result<bool, BlackbeltError> {
        self.ensure_open()?;
        if self.current_step == 0 {
            return Ok(false);
        }
        self.current_step -= 1;
        tracing::debug!(step = self.current_step, "retreated");
        Ok(true)
    }

    /// Start over with an empty form. A closed wizard stays closed.
    pub fn reset(&mut self) -> Result<(), BlackbeltError> {
        self.ensure_open()?;
        self.current_step = 0;
        self.sequence = StepSequence::Unselected;
        self.fields.clear();
        self.field_errors = FieldErrors::new();
        self.status = SubmissionStatus::Idle;
        self.last_error = None;
        self.pending = None;
        Ok(())
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Validate everything the role requires and, if it passes, hand out the
    /// payload and enter `Submitting`.
    pub fn begin_submission(&mut self) -> Result<Submission, BlackbeltError> {
        self.ensure_open()?;
        let role = match self.role() {
            Some(role) if !role.can_self_register() => {
                return Err(BlackbeltError::RegistrationUnavailable(role));
            }
            Some(role) if self.is_final_step() => role,
            _ => return Err(BlackbeltError::NotFinalStep(self.step())),
        };

        let required: Vec<&str> = self.sequence.required_fields().collect();
        self.field_errors = self.validator.validate(&required, &self.fields);
        if !self.field_errors.is_empty() {
            tracing::debug!(errors = self.field_errors.len(), "submission blocked");
            return Ok(Submission::Invalid {
                errors: self.field_errors.len(),
            });
        }

        let payload = RegistrationPayload::new(role, self.fields.clone());
        self.pending = Some(payload.clone());
        self.status = SubmissionStatus::Submitting;
        tracing::info!(role = role.as_str(), email = payload.email(), "submitting registration");
        Ok(Submission::Ready(payload))
    }

    /// Apply the account service's answer to the pending submission.
    ///
    /// On success the session store receives the payload and the wizard
    /// closes. On failure the wizard keeps its step and values so the user
    /// can retry or go back.
    pub fn finish_submission(
        &mut self,
        result: Result<(), AccountError>,
    ) -> Result<SubmitOutcome, BlackbeltError> {
        if self.status != SubmissionStatus::Submitting {
            return Err(BlackbeltError::NoSubmissionPending);
        }
        let Some(payload) = self.pending.take() else {
            return Err(BlackbeltError::NoSubmissionPending);
        };

        match result {
            Err(error) => {
                tracing::warn!(error = %error, retryable = error.is_retryable(), "registration failed");
                self.status = SubmissionStatus::Failed;
                self.last_error = Some(error.clone());
                Ok(SubmitOutcome::Failed(error))
            }
            Ok(()) => {
                self.status = SubmissionStatus::Succeeded;
                self.last_error = None;
                self.fields.clear();
                tracing::info!(email = payload.email(), "registration accepted");
                self.session.establish_session(&payload)?;
                Ok(SubmitOutcome::Registered)
            }
        }
    }

    /// Validate, call the account service and apply its answer in one go.
    pub fn submit(
        &mut self,
        service: &mut impl AccountService,
    ) -> Result<SubmitOutcome, BlackbeltError> {
        match self.begin_submission()? {
            Submission::Invalid { errors } => Ok(SubmitOutcome::Invalid { errors }),
            Submission::Ready(payload) => {
                let result = service.register(&payload);
                self.finish_submission(result)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
