//! The onboarding form controller.
//!
//! [`OnboardingForm`] owns the entered values, the per-field errors and the
//! step position, and enforces the wizard's transitions:
//!
//! ```text
//! Credentials -> Income -> Goals -> Submitting -> Complete
//!      ^           |  ^      |          |             |
//!      +-- back ---+  +-back-+   failed: back to Goals |
//!      +------------------- reset ---------------------+
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{
    validate_step, Field, FormData, FormErrors, GoalMetadata, StepId, SubmissionError,
};
use crate::infrastructure::{AccountReceipt, AccountRequest, AccountService};

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Step(StepId),
    Submitting,
    Complete,
}

/// State behind the onboarding wizard.
///
/// # Examples
///
/// ```
/// use trackifi_onboarding::application::{OnboardingForm, Phase};
/// use trackifi_onboarding::domain::{Field, StepId};
///
/// let mut form = OnboardingForm::default();
/// assert!(!form.advance());
/// assert!(form.errors().contains(Field::FirstName));
///
/// form.update_fields([(Field::FirstName, "Ada")]);
/// assert!(!form.errors().contains(Field::FirstName));
/// assert_eq!(form.phase(), Phase::Step(StepId::Credentials));
/// ```
#[derive(Debug, Default)]
pub struct OnboardingForm {
    data: FormData,
    errors: FormErrors,
    current_step: StepId,
    submitting: bool,
    complete: bool,
    receipt: Option<AccountReceipt>,
    submission_error: Option<String>,
}

impl OnboardingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Receipt from the account service once the wizard is complete.
    pub fn receipt(&self) -> Option<&AccountReceipt> {
        self.receipt.as_ref()
    }

    /// Message from the last failed account-creation attempt.
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Complete
        } else if self.submitting {
            Phase::Submitting
        } else {
            Phase::Step(self.current_step)
        }
    }

    /// Merges `updates` into the form and drops the stored error of every
    /// field touched. The step is not re-validated.
    pub fn update_fields<I, V>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (Field, V)>,
        V: Into<String>,
    {
        if self.submitting || self.complete {
            debug!("ignoring field update while the form is locked");
            return;
        }
        for (field, value) in updates {
            self.data.set(field, value);
            self.errors.clear(field);
        }
        self.submission_error = None;
    }

    /// Checks `step` against the current values without touching stored errors.
    pub fn validate_step(&self, step: StepId) -> FormErrors {
        validate_step(step, &self.data)
    }

    /// Validates the current step and stores the result. Moves forward when it
    /// passes, except on the last step where [`Self::submit`] takes over.
    ///
    /// Returns whether the step passed.
    pub fn advance(&mut self) -> bool {
        if self.submitting || self.complete {
            return false;
        }
        if !self.check_current_step() {
            return false;
        }
        if let Some(next) = self.current_step.next() {
            info!(from = self.current_step.ordinal(), to = next.ordinal(), "advancing step");
            self.current_step = next;
        }
        true
    }

    /// Steps back one page without validating. Errors are kept as they are.
    pub fn retreat(&mut self) {
        if self.submitting || self.complete {
            return;
        }
        if let Some(previous) = self.current_step.previous() {
            info!(from = self.current_step.ordinal(), to = previous.ordinal(), "retreating step");
            self.current_step = previous;
        }
    }

    /// Validates the final step and, if it passes, locks the form and returns
    /// the request to send to the account service.
    ///
    /// Returns `None` without side effects when the form is already
    /// submitting or complete, or is not on the last step. Returns `None` with
    /// errors stored when validation fails.
    pub fn begin_submission(&mut self) -> Option<AccountRequest> {
        if self.submitting || self.complete {
            debug!("submission already in flight or finished");
            return None;
        }
        if !self.current_step.is_last() {
            debug!(step = self.current_step.ordinal(), "submit requested before the last step");
            return None;
        }
        if !self.check_current_step() {
            return None;
        }

        self.submitting = true;
        self.submission_error = None;
        info!("submitting onboarding form");

        Some(AccountRequest {
            form: self.data.clone(),
            metadata: GoalMetadata::from_form(&self.data, Utc::now()),
        })
    }

    /// Applies the account service's answer to a submission started with
    /// [`Self::begin_submission`].
    pub fn finish_submission(&mut self, result: Result<AccountReceipt, SubmissionError>) {
        if !self.submitting {
            warn!("submission result arrived with no submission in flight");
            return;
        }
        self.submitting = false;
        match result {
            Ok(receipt) => {
                info!(target_amount = ?receipt.goal.target_amount, "onboarding complete");
                self.receipt = Some(receipt);
                self.complete = true;
            }
            Err(err) => {
                warn!(error = %err, "account creation failed");
                self.submission_error = Some(err.to_string());
            }
        }
    }

    /// Runs the whole submission against `service` on the calling thread.
    pub fn submit(&mut self, service: &dyn AccountService) -> Phase {
        if let Some(request) = self.begin_submission() {
            let result = service.create_account(&request);
            self.finish_submission(result);
        }
        self.phase()
    }

    /// Clears everything and returns to the first step.
    pub fn reset(&mut self) {
        info!("resetting onboarding form");
        *self = Self::default();
    }

    fn check_current_step(&mut self) -> bool {
        self.errors = self.validate_step(self.current_step);
        if self.errors.is_empty() {
            return true;
        }
        debug!(
            step = self.current_step.ordinal(),
            fields = ?self.errors.fields().map(Field::key).collect::<Vec<_>>(),
            "step validation failed"
        );
        false
    }
}
