//! Per-step validation rules for the onboarding form.
//!
//! Each step has one pure validator mapping the current [`FormData`] to the
//! [`FormErrors`] for that step's fields. An empty result means the step
//! passes. Validators never look at fields owned by other steps.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::models::{Field, FormData, FormErrors, GoalType, IncomeSource, StepId};

/// Minimum accepted password length, in UTF-16 code units.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Signature shared by all step validators.
pub type StepValidator = fn(&FormData) -> FormErrors;

impl StepId {
    pub fn validator(self) -> StepValidator {
        match self {
            StepId::Credentials => validate_credentials,
            StepId::Income => validate_income,
            StepId::Goals => validate_goals,
        }
    }
}

/// Runs the validator registered for `step`.
pub fn validate_step(step: StepId, data: &FormData) -> FormErrors {
    (step.validator())(data)
}

/// Length of a password as browsers and the account backend count it:
/// UTF-16 code units, so a character outside the BMP counts twice.
pub fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn validate_credentials(data: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if is_blank(&data.first_name) {
        errors.insert(Field::FirstName, "First name is required");
    }
    if is_blank(&data.last_name) {
        errors.insert(Field::LastName, "Last name is required");
    }

    if is_blank(&data.email) {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&data.email) {
        errors.insert(Field::Email, "Please enter a valid email");
    }

    if data.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password_length(&data.password) < MIN_PASSWORD_LENGTH {
        errors.insert(Field::Password, "Password must be at least 8 characters");
    }

    // contactNumber is optional and accepted in any form
    errors
}

pub fn validate_income(data: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if is_blank(&data.occupation) {
        errors.insert(Field::Occupation, "Please enter your occupation");
    }
    if IncomeSource::parse(&data.income_source).is_none() {
        errors.insert(Field::IncomeSource, "Please select your income source");
    }

    errors
}

pub fn validate_goals(data: &FormData) -> FormErrors {
    let mut errors = FormErrors::new();

    if GoalType::parse(&data.goal_type).is_none() {
        errors.insert(Field::GoalType, "Please select a goal type");
    }
    if data.target_amount.is_empty() {
        errors.insert(Field::TargetAmount, "Please enter a target amount");
    }

    let start_ok = if data.start_date.is_empty() {
        errors.insert(Field::StartDate, "Please select a start date");
        false
    } else if !is_iso_date(&data.start_date) {
        errors.insert(Field::StartDate, "Please enter a date as YYYY-MM-DD");
        false
    } else {
        true
    };

    if data.end_date.is_empty() {
        errors.insert(Field::EndDate, "Please select a target date");
    } else if !is_iso_date(&data.end_date) {
        errors.insert(Field::EndDate, "Please enter a date as YYYY-MM-DD");
    } else if start_ok && data.end_date < data.start_date {
        // ISO dates order the same as strings
        errors.insert(Field::EndDate, "Target date must be after start date");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_credentials() -> FormData {
        let mut data = FormData::default();
        data.set(Field::FirstName, "Ada");
        data.set(Field::LastName, "Lovelace");
        data.set(Field::Email, "ada@example.com");
        data.set(Field::Password, "analytical");
        data
    }

    fn valid_goals() -> FormData {
        let mut data = FormData::default();
        data.set(Field::GoalType, "savings");
        data.set(Field::TargetAmount, "10000");
        data.set(Field::StartDate, "2025-06-01");
        data.set(Field::EndDate, "2025-12-01");
        data
    }

    #[test]
    fn test_valid_credentials_pass() {
        assert!(validate_credentials(&valid_credentials()).is_empty());
    }

    #[test]
    fn test_blank_required_credentials_are_reported() {
        for field in [Field::FirstName, Field::LastName, Field::Email, Field::Password] {
            let mut data = valid_credentials();
            data.set(field, "");
            let errors = validate_step(StepId::Credentials, &data);
            assert!(errors.contains(field), "{} should be required", field);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_whitespace_names_are_blank() {
        let mut data = valid_credentials();
        data.set(Field::FirstName, "   ");
        data.set(Field::LastName, "\t");
        let errors = validate_credentials(&data);
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
        assert_eq!(errors.get(Field::LastName), Some("Last name is required"));
    }

    #[test]
    fn test_email_format() {
        let mut data = valid_credentials();
        data.set(Field::Email, "not-an-email");
        let errors = validate_credentials(&data);
        assert_eq!(errors.get(Field::Email), Some("Please enter a valid email"));

        data.set(Field::Email, "a@b.co");
        assert!(!validate_credentials(&data).contains(Field::Email));
    }

    #[test]
    fn test_email_pattern_edge_cases() {
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_password_length_boundary() {
        let mut data = valid_credentials();
        data.set(Field::Password, "1234567");
        let errors = validate_credentials(&data);
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 8 characters")
        );

        data.set(Field::Password, "12345678");
        assert!(validate_credentials(&data).is_empty());
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        assert_eq!(password_length("abc"), 3);
        assert_eq!(password_length("ééé"), 3);
        assert_eq!(password_length("😀"), 2);

        let mut data = valid_credentials();
        data.set(Field::Password, "😀😀😀😀");
        assert!(validate_credentials(&data).is_empty());

        data.set(Field::Password, "éééé😀a");
        assert_eq!(
            validate_credentials(&data).get(Field::Password),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_weak_password_still_passes() {
        let mut data = valid_credentials();
        data.set(Field::Password, "aaaaaaaa");
        assert!(validate_credentials(&data).is_empty());
    }

    #[test]
    fn test_contact_number_never_validated() {
        let mut data = valid_credentials();
        data.set(Field::ContactNumber, "definitely not a phone");
        assert!(validate_credentials(&data).is_empty());
    }

    #[test]
    fn test_income_rules() {
        let errors = validate_income(&FormData::default());
        assert_eq!(errors.get(Field::Occupation), Some("Please enter your occupation"));
        assert_eq!(
            errors.get(Field::IncomeSource),
            Some("Please select your income source")
        );

        let mut data = FormData::default();
        data.set(Field::Occupation, "Teacher");
        data.set(Field::IncomeSource, "lottery");
        let errors = validate_income(&data);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::IncomeSource));

        data.set(Field::IncomeSource, "mixed");
        assert!(validate_income(&data).is_empty());
    }

    #[test]
    fn test_validators_only_check_their_step() {
        // Goals data alone must not trip credential or income rules
        let data = valid_goals();
        assert!(validate_goals(&data).is_empty());
        let errors = validate_credentials(&data);
        assert!(errors.fields().all(|f| f.step() == StepId::Credentials));
    }

    #[test]
    fn test_goal_required_fields() {
        let errors = validate_goals(&FormData::default());
        assert_eq!(errors.get(Field::GoalType), Some("Please select a goal type"));
        assert_eq!(
            errors.get(Field::TargetAmount),
            Some("Please enter a target amount")
        );
        assert_eq!(errors.get(Field::StartDate), Some("Please select a start date"));
        assert_eq!(errors.get(Field::EndDate), Some("Please select a target date"));
    }

    #[test]
    fn test_end_date_before_start_date() {
        let mut data = valid_goals();
        data.set(Field::StartDate, "2025-06-01");
        data.set(Field::EndDate, "2025-05-01");
        let errors = validate_goals(&data);
        assert_eq!(
            errors.get(Field::EndDate),
            Some("Target date must be after start date")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_equal_dates_accepted() {
        let mut data = valid_goals();
        data.set(Field::StartDate, "2025-06-01");
        data.set(Field::EndDate, "2025-06-01");
        assert!(validate_goals(&data).is_empty());
    }

    #[test]
    fn test_end_date_without_start_date() {
        let mut data = valid_goals();
        data.set(Field::StartDate, "");
        let errors = validate_goals(&data);
        assert!(errors.contains(Field::StartDate));
        assert!(!errors.contains(Field::EndDate));
    }

    #[test]
    fn test_malformed_dates() {
        let mut data = valid_goals();
        data.set(Field::StartDate, "2025-6-1");
        data.set(Field::EndDate, "2025-02-30");
        let errors = validate_goals(&data);
        assert_eq!(
            errors.get(Field::StartDate),
            Some("Please enter a date as YYYY-MM-DD")
        );
        assert_eq!(
            errors.get(Field::EndDate),
            Some("Please enter a date as YYYY-MM-DD")
        );
    }

    #[test]
    fn test_validator_dispatch() {
        let data = FormData::default();
        assert_eq!(
            validate_step(StepId::Income, &data),
            validate_income(&data)
        );
        assert_eq!((StepId::Goals.validator())(&data), validate_goals(&data));
    }
}
