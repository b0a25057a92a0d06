use thiserror::Error;

/// Failure reported by the account-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The service refused the request, e.g. the email is already registered.
    #[error("Account could not be created: {0}")]
    Rejected(String),
    /// The service could not be reached or did not answer.
    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

pub type SubmissionResult<T> = Result<T, SubmissionError>;
