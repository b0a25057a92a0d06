//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the form controller drives the wizard's step sequencing, and the app state
//! adds focus, cursor and background-submission handling for the terminal.

pub mod form;
pub mod state;

pub use form::*;
pub use state::*;
