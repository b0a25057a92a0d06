//! Infrastructure layer providing external service integrations.
//!
//! Holds the account-creation boundary, configuration loading and the log
//! sink.

pub mod account;
pub mod config;
pub mod logging;

pub use account::*;
pub use config::*;
pub use logging::*;
