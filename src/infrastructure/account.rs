//! Boundary to the account-creation backend.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{FormData, GoalMetadata, SubmissionResult};

/// Everything sent to create an account: the raw form plus the derived goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRequest {
    #[serde(flatten)]
    pub form: FormData,
    pub metadata: GoalMetadata,
}

impl AccountRequest {
    /// Copy of the request with the password masked.
    pub fn redacted(&self) -> AccountRequest {
        AccountRequest {
            form: self.form.redacted(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Returned by the service once the account exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReceipt {
    pub display_name: String,
    pub email: String,
    pub goal: GoalMetadata,
}

pub trait AccountService: Send + Sync {
    fn create_account(&self, request: &AccountRequest) -> SubmissionResult<AccountReceipt>;
}

/// Stand-in backend: waits for a fixed delay and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedAccountService {
    delay: Duration,
}

impl SimulatedAccountService {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedAccountService {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl AccountService for SimulatedAccountService {
    fn create_account(&self, request: &AccountRequest) -> SubmissionResult<AccountReceipt> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let payload = serde_json::to_string(&request.redacted())
            .unwrap_or_else(|e| format!("<unserializable request: {}>", e));
        info!(payload = %payload, "account created");

        Ok(AccountReceipt {
            display_name: request.form.first_name.trim().to_string(),
            email: request.form.email.clone(),
            goal: request.metadata.clone(),
        })
    }
}
