//! TrackiFi Onboarding Library
//!
//! A terminal-based, multi-step account onboarding wizard for a personal
//! finance app: credentials, income, and a first financial goal, each step
//! validated before the next.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
