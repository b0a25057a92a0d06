//! Advisory password strength scoring.
//!
//! The score never affects whether the credentials step validates; it only
//! drives the strength bar under the password input.

use super::validation::password_length;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    /// No password typed yet, nothing is shown.
    Empty,
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    pub fn label(self) -> &'static str {
        match self {
            StrengthLevel::Empty => "",
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Fair => "Fair",
            StrengthLevel::Good => "Good",
            StrengthLevel::Strong => "Strong",
        }
    }

    /// Filled segments out of [`SEGMENTS`].
    pub fn segments(self) -> usize {
        match self {
            StrengthLevel::Empty => 0,
            StrengthLevel::Weak => 1,
            StrengthLevel::Fair => 2,
            StrengthLevel::Good => 3,
            StrengthLevel::Strong => 4,
        }
    }
}

pub const SEGMENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub level: StrengthLevel,
    /// Heuristic score in `0..=6`.
    pub score: u8,
}

/// Scores a password one point each for: at least 8 characters, at least 12
/// characters, a lowercase letter, an uppercase letter, a digit, and a
/// character outside `[a-zA-Z0-9]`.
pub fn assess(password: &str) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            level: StrengthLevel::Empty,
            score: 0,
        };
    }

    let length = password_length(password);
    let checks = [
        length >= 8,
        length >= 12,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;

    let level = match score {
        0..=2 => StrengthLevel::Weak,
        3 => StrengthLevel::Fair,
        4 => StrengthLevel::Good,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength { level, score }
}
