//! Domain layer: form data, step definitions and the pure rules over them.

pub mod models;
pub mod validation;
pub mod password;
pub mod formatting;
pub mod errors;

pub use models::*;
pub use validation::*;
pub use password::*;
pub use formatting::*;
pub use errors::*;
