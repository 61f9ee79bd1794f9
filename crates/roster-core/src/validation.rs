//! # Validation Boundary
//!
//! Checks applied to a form before anything is sent to the collaborator.
//!
//! A [`StudentForm`] holds the fields exactly as entered (marks included, as
//! text). [`StudentForm::validate`] either produces a typed [`StudentDraft`]
//! or the first rule that failed. Rules run in a fixed order and stop at the
//! first violation.

use crate::primitives::{MAX_MARKS, MIN_MARKS};
use crate::{StudentDraft, Subject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// A rule violated by a form. The `Display` text is meant for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter batch year in correct format: YYYY-YYYY (e.g., 2020-2024)")]
    BatchYearFormat,

    #[error("Start year must be less than end year")]
    BatchYearOrder,

    #[error("At least one subject is required")]
    NoSubjects,

    #[error("Please fill in all subject fields")]
    IncompleteSubject,

    #[error("Marks must be between 0 and 100")]
    MarksOutOfRange,
}

// =============================================================================
// BATCH YEAR
// =============================================================================

/// A `YYYY-YYYY` batch year with start strictly before end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchYear {
    pub start: u16,
    pub end: u16,
}

impl BatchYear {
    /// Parse `YYYY-YYYY`: exactly four ASCII digits, a dash, four digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let (start, end) = s.split_once('-').ok_or(ValidationError::BatchYearFormat)?;
        let start = parse_year(start)?;
        let end = parse_year(end)?;
        if start >= end {
            return Err(ValidationError::BatchYearOrder);
        }
        Ok(Self { start, end })
    }
}

impl std::fmt::Display for BatchYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.end)
    }
}

fn parse_year(part: &str) -> Result<u16, ValidationError> {
    if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::BatchYearFormat);
    }
    part.parse().map_err(|_| ValidationError::BatchYearFormat)
}

// =============================================================================
// EMAIL
// =============================================================================

/// Loose syntactic email check: `local@domain.tld`, no whitespace.
///
/// Uniqueness and deliverability are backend concerns.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

// =============================================================================
// FORM
// =============================================================================

/// One subject row as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectForm {
    pub name: String,
    pub marks: String,
}

impl SubjectForm {
    #[must_use]
    pub fn new(name: impl Into<String>, marks: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marks: marks.into(),
        }
    }
}

/// A create/edit form as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch_year: String,
    pub subjects: Vec<SubjectForm>,
}

impl StudentForm {
    /// Prefill a form from an existing draft (edit flow).
    #[must_use]
    pub fn from_draft(draft: &StudentDraft) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            course: draft.course.clone(),
            batch_year: draft.batch_year.clone(),
            subjects: draft
                .subjects
                .iter()
                .map(|s| SubjectForm::new(s.name.clone(), s.marks.to_string()))
                .collect(),
        }
    }

    /// Validate the form and build the draft to submit.
    ///
    /// Text fields are submitted as entered; only the emptiness checks trim.
    pub fn validate(&self) -> Result<StudentDraft, ValidationError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.course.trim().is_empty()
            || self.batch_year.is_empty()
        {
            return Err(ValidationError::MissingRequiredFields);
        }

        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }

        BatchYear::parse(&self.batch_year)?;

        if self.subjects.is_empty() {
            return Err(ValidationError::NoSubjects);
        }

        let mut subjects = Vec::with_capacity(self.subjects.len());
        for row in &self.subjects {
            if row.name.trim().is_empty() || row.marks.trim().is_empty() {
                return Err(ValidationError::IncompleteSubject);
            }
            let marks: i32 = row
                .marks
                .trim()
                .parse()
                .map_err(|_| ValidationError::MarksOutOfRange)?;
            if !(MIN_MARKS..=MAX_MARKS).contains(&marks) {
                return Err(ValidationError::MarksOutOfRange);
            }
            subjects.push(Subject::new(row.name.clone(), marks));
        }

        Ok(StudentDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            course: self.course.clone(),
            batch_year: self.batch_year.clone(),
            subjects,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
