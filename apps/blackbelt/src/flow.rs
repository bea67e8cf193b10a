//! # Submission Flow
//!
//! Drives a wizard submission against the academy API. The wizard is
//! `Submitting` only for the duration of the request; a request that outlives
//! the deadline is abandoned and reported as a retryable failure.

use crate::client::AcademyClient;
use blackbelt_core::{
    AccountError, BlackbeltError, SessionStore, Submission, SubmitOutcome, Validate, Wizard,
};
use std::time::Duration;

/// Validate, send `POST /register` and apply the answer.
pub async fn submit<S, V>(
    wizard: &mut Wizard<S, V>,
    client: &AcademyClient,
    deadline: Duration,
) -> Result<SubmitOutcome, BlackbeltError>
where
    S: SessionStore,
    V: Validate,
{
    let payload = match wizard.begin_submission()? {
        Submission::Invalid { errors } => return Ok(SubmitOutcome::Invalid { errors }),
        Submission::Ready(payload) => payload,
    };

    let result = match tokio::time::timeout(deadline, client.register(&payload)).await {
        Ok(answer) => answer.map_err(AccountError::from),
        Err(_) => {
            tracing::warn!(secs = deadline.as_secs(), "registration request timed out");
            Err(AccountError::TimedOut(deadline.as_secs()))
        }
    };

    wizard.finish_submission(result)
}
