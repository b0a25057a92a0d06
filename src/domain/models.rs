use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every input the onboarding wizard collects.
///
/// Declaration order is the order fields appear on screen, and the order
/// errors are listed in [`FormErrors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Password,
    ContactNumber,
    Occupation,
    IncomeSource,
    GoalType,
    TargetAmount,
    StartDate,
    EndDate,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Password,
        Field::ContactNumber,
        Field::Occupation,
        Field::IncomeSource,
        Field::GoalType,
        Field::TargetAmount,
        Field::StartDate,
        Field::EndDate,
    ];

    /// The camelCase key used when the form is serialized.
    pub fn key(self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Password => "password",
            Field::ContactNumber => "contactNumber",
            Field::Occupation => "occupation",
            Field::IncomeSource => "incomeSource",
            Field::GoalType => "goalType",
            Field::TargetAmount => "targetAmount",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email Address",
            Field::Password => "Password",
            Field::ContactNumber => "Contact Number",
            Field::Occupation => "What's your occupation?",
            Field::IncomeSource => "Primary source of income",
            Field::GoalType => "What type of goal?",
            Field::TargetAmount => "Target amount",
            Field::StartDate => "Start date",
            Field::EndDate => "Target date",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::FirstName => "John",
            Field::LastName => "Doe",
            Field::Email => "john.doe@example.com",
            Field::Password => "Create a secure password",
            Field::ContactNumber => "+1 (555) 000-0000",
            Field::Occupation => "e.g., Software Engineer, Teacher, Consultant",
            Field::TargetAmount => "10,000",
            Field::StartDate | Field::EndDate => "YYYY-MM-DD",
            Field::IncomeSource | Field::GoalType => "",
        }
    }

    /// Text shown under the input while the field has no error.
    pub fn helper_text(self) -> Option<&'static str> {
        match self {
            Field::Email => Some("We'll send important updates to this address"),
            Field::ContactNumber => Some("Optional - for account recovery"),
            Field::Occupation => Some("This helps us understand your financial context"),
            Field::TargetAmount => Some("How much do you want to achieve?"),
            _ => None,
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::ContactNumber)
    }

    /// Fields picked from a fixed list rather than typed.
    pub fn is_choice(self) -> bool {
        matches!(self, Field::IncomeSource | Field::GoalType)
    }

    pub fn step(self) -> StepId {
        match self {
            Field::FirstName
            | Field::LastName
            | Field::Email
            | Field::Password
            | Field::ContactNumber => StepId::Credentials,
            Field::Occupation | Field::IncomeSource => StepId::Income,
            Field::GoalType | Field::TargetAmount | Field::StartDate | Field::EndDate => {
                StepId::Goals
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw values entered by the user. Amounts and dates stay unparsed strings
/// until submission.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub occupation: String,
    pub income_source: String,
    pub goal_type: String,
    pub target_amount: String,
    pub start_date: String,
    pub end_date: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::ContactNumber => &self.contact_number,
            Field::Occupation => &self.occupation,
            Field::IncomeSource => &self.income_source,
            Field::GoalType => &self.goal_type,
            Field::TargetAmount => &self.target_amount,
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::ContactNumber => &mut self.contact_number,
            Field::Occupation => &mut self.occupation,
            Field::IncomeSource => &mut self.income_source,
            Field::GoalType => &mut self.goal_type,
            Field::TargetAmount => &mut self.target_amount,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Copy safe to write to logs.
    pub fn redacted(&self) -> FormData {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }
}

impl fmt::Debug for FormData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for field in Field::ALL {
            match field {
                Field::Password if !self.password.is_empty() => map.entry(&field.key(), &"********"),
                _ => map.entry(&field.key(), &self.get(field)),
            };
        }
        map.finish()
    }
}

/// Validation messages keyed by field. A field with no entry is valid, so an
/// empty map is the "step passes" result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: BTreeMap<Field, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn clear(&mut self, field: Field) -> Option<String> {
        self.entries.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.keys().copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    #[default]
    Credentials,
    Income,
    Goals,
}

impl StepId {
    pub const LAST: StepId = StepId::Goals;

    /// 1-based position in the wizard.
    pub fn ordinal(self) -> usize {
        match self {
            StepId::Credentials => 1,
            StepId::Income => 2,
            StepId::Goals => 3,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<StepId> {
        match ordinal {
            1 => Some(StepId::Credentials),
            2 => Some(StepId::Income),
            3 => Some(StepId::Goals),
            _ => None,
        }
    }

    pub fn next(self) -> Option<StepId> {
        StepId::from_ordinal(self.ordinal() + 1)
    }

    pub fn previous(self) -> Option<StepId> {
        StepId::from_ordinal(self.ordinal() - 1)
    }

    pub fn is_last(self) -> bool {
        self == StepId::LAST
    }

    pub fn descriptor(self) -> &'static Step {
        &STEPS[self.ordinal() - 1]
    }

    /// Inputs shown on this step, in screen order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            StepId::Credentials => &[
                Field::FirstName,
                Field::LastName,
                Field::Email,
                Field::Password,
                Field::ContactNumber,
            ],
            StepId::Income => &[Field::Occupation, Field::IncomeSource],
            StepId::Goals => &[
                Field::GoalType,
                Field::TargetAmount,
                Field::StartDate,
                Field::EndDate,
            ],
        }
    }

    /// Heading and subheading for the step body.
    pub fn heading(self) -> (&'static str, &'static str) {
        match self {
            StepId::Credentials => (
                "Create your account",
                "Your information is protected with bank-level encryption",
            ),
            StepId::Income => (
                "Income details",
                "This helps us personalize your financial insights",
            ),
            StepId::Goals => (
                "Set your first goal",
                "Start with one goal, you can add more later",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub title: &'static str,
    pub description: &'static str,
}

pub const STEPS: [Step; 3] = [
    Step {
        id: StepId::Credentials,
        title: "Credentials",
        description: "Create your secure account",
    },
    Step {
        id: StepId::Income,
        title: "Income",
        description: "Tell us about your income",
    },
    Step {
        id: StepId::Goals,
        title: "Goals",
        description: "Set your first financial goal",
    },
];

/// How a step is drawn in the progress stepper relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    Active,
    Pending,
}

impl Step {
    pub fn status(&self, current: StepId) -> StepStatus {
        match self.id.cmp(&current) {
            std::cmp::Ordering::Less => StepStatus::Complete,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }
}

/// A fixed option for one of the choice fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeSource {
    Employment,
    Freelance,
    Business,
    Mixed,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 4] = [
        IncomeSource::Employment,
        IncomeSource::Freelance,
        IncomeSource::Business,
        IncomeSource::Mixed,
    ];

    pub fn parse(value: &str) -> Option<IncomeSource> {
        IncomeSource::ALL.into_iter().find(|source| source.choice().id == value)
    }

    pub fn choice(self) -> Choice {
        match self {
            IncomeSource::Employment => Choice {
                id: "employment",
                label: "Employment",
                description: "Full-time or part-time job",
            },
            IncomeSource::Freelance => Choice {
                id: "freelance",
                label: "Freelance",
                description: "Contract or project-based work",
            },
            IncomeSource::Business => Choice {
                id: "business",
                label: "Business",
                description: "Self-owned business income",
            },
            IncomeSource::Mixed => Choice {
                id: "mixed",
                label: "Mixed",
                description: "Multiple income streams",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalType {
    Savings,
    Investment,
    Custom,
}

impl GoalType {
    pub const ALL: [GoalType; 3] = [GoalType::Savings, GoalType::Investment, GoalType::Custom];

    pub fn parse(value: &str) -> Option<GoalType> {
        GoalType::ALL.into_iter().find(|goal| goal.choice().id == value)
    }

    pub fn choice(self) -> Choice {
        match self {
            GoalType::Savings => Choice {
                id: "savings",
                label: "Savings",
                description: "Build your emergency fund or save for a specific purchase",
            },
            GoalType::Investment => Choice {
                id: "investment",
                label: "Investment",
                description: "Grow your wealth through stocks, bonds, or real estate",
            },
            GoalType::Custom => Choice {
                id: "custom",
                label: "Custom",
                description: "Define your own unique financial goal",
            },
        }
    }
}

/// Options offered by a choice field, empty for typed fields.
pub fn choices_for(field: Field) -> Vec<Choice> {
    match field {
        Field::IncomeSource => IncomeSource::ALL.iter().map(|s| s.choice()).collect(),
        Field::GoalType => GoalType::ALL.iter().map(|g| g.choice()).collect(),
        _ => Vec::new(),
    }
}

/// Goal summary derived from the form when the account is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalMetadata {
    pub goal_type: String,
    pub target_amount: Option<u64>,
    pub start_date: String,
    pub end_date: String,
    pub created_at: DateTime<Utc>,
}

impl GoalMetadata {
    pub fn from_form(data: &FormData, created_at: DateTime<Utc>) -> Self {
        Self {
            goal_type: data.goal_type.clone(),
            target_amount: parse_leading_integer(&data.target_amount),
            start_date: data.start_date.clone(),
            end_date: data.end_date.clone(),
            created_at,
        }
    }
}

/// Parses the run of ASCII digits at the start of `value` (after leading
/// whitespace). `None` when there are no digits or the number overflows.
pub fn parse_leading_integer(value: &str) -> Option<u64> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u64>().ok()
}
