//! # Core Type Definitions
//!
//! This module contains the record types shared by every part of the engine:
//! - Identifiers (`StudentId`)
//! - Submitted data (`Subject`, `StudentDraft`)
//! - Server records (`StudentRecord`) and engine-annotated records (`Student`)
//! - Error types (`RosterError`)
//!
//! ## Ownership
//!
//! A `Student` can only be built from a `StudentRecord` through the Grade
//! Engine, so its derived fields are always consistent with its subjects.

use crate::grade::{Grade, GradeEngine, Performance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque identifier assigned by the backend when a student is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl StudentId {
    /// Create a new identifier from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last eight characters, as shown next to a name in the table view.
    #[must_use]
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// One subject and the marks obtained in it.
///
/// Marks are kept signed so that out-of-range values coming back from the
/// server reach the Grade Engine and are rejected there, instead of failing
/// deserialization with an unrelated error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub marks: i32,
}

impl Subject {
    #[must_use]
    pub fn new(name: impl Into<String>, marks: i32) -> Self {
        Self {
            name: name.into(),
            marks,
        }
    }
}

// =============================================================================
// DRAFT (what the client submits)
// =============================================================================

/// The payload sent to the collaborator on create and update.
///
/// Carries no identifier and no derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch_year: String,
    pub subjects: Vec<Subject>,
}

// =============================================================================
// RECORD (what the server returns)
// =============================================================================

/// A student record as returned by the backend.
///
/// Any `totalMarks`/`average`/`grade` the server includes are ignored on
/// purpose: the store recomputes them through the Grade Engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub batch_year: String,
    pub subjects: Vec<Subject>,
}

impl StudentRecord {
    /// Attach a server-assigned identifier to a draft.
    #[must_use]
    pub fn from_draft(id: StudentId, draft: StudentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            course: draft.course,
            batch_year: draft.batch_year,
            subjects: draft.subjects,
        }
    }
}

// =============================================================================
// STUDENT (engine-annotated record)
// =============================================================================

/// A student record annotated with its derived performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    id: StudentId,
    name: String,
    email: String,
    course: String,
    batch_year: String,
    subjects: Vec<Subject>,
    #[serde(flatten)]
    performance: Performance,
}

impl Student {
    /// Annotate a server record with total, average and grade.
    ///
    /// Returns `RosterError::InvalidRecord` if the subjects are empty or any
    /// marks fall outside [0, 100].
    pub fn from_record(record: StudentRecord) -> Result<Self, RosterError> {
        let performance = GradeEngine::evaluate(&record.subjects)?;
        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            course: record.course,
            batch_year: record.batch_year,
            subjects: record.subjects,
            performance,
        })
    }

    #[must_use]
    pub fn id(&self) -> &StudentId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    #[must_use]
    pub fn batch_year(&self) -> &str {
        &self.batch_year
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn performance(&self) -> &Performance {
        &self.performance
    }

    #[must_use]
    pub fn total_marks(&self) -> u32 {
        self.performance.total_marks
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        self.performance.average
    }

    #[must_use]
    pub fn grade(&self) -> Grade {
        self.performance.grade
    }

    /// The editable fields of this record, e.g. to prefill an edit form.
    #[must_use]
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            course: self.course.clone(),
            batch_year: self.batch_year.clone(),
            subjects: self.subjects.clone(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Contract violations inside the core.
///
/// These indicate a defect in the caller or corrupt server data. They are
/// typed failures, never panics, so a host keeps running after one record
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The Grade Engine cannot annotate the record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// The query parameters cannot be applied.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A record with this identifier is already in the store.
    #[error("Student already exists: {0}")]
    Conflict(StudentId),

    /// No record with this identifier is in the store.
    #[error("Student not found: {0}")]
    NotFound(StudentId),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, marks: &[i32]) -> StudentRecord {
        StudentRecord {
            id: StudentId::new(id),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            course: "CS".to_string(),
            batch_year: "2022-2026".to_string(),
            subjects: marks
                .iter()
                .enumerate()
                .map(|(i, m)| Subject::new(format!("S{i}"), *m))
                .collect(),
        }
    }

    #[test]
    fn short_id_is_last_eight_chars() {
        let id = StudentId::new("64f1c2aa9b3e4d0012ab34cd");
        assert_eq!(id.short(), "12ab34cd");
        assert_eq!(StudentId::new("abc").short(), "abc");
    }

    #[test]
    fn student_from_record_derives_performance() {
        let student = Student::from_record(record("1", &[90, 70])).expect("valid");
        assert_eq!(student.total_marks(), 160);
        assert_eq!(student.grade(), Grade::A);
    }

    #[test]
    fn student_from_empty_subjects_rejected() {
        let result = Student::from_record(record("1", &[]));
        assert!(matches!(result, Err(RosterError::InvalidRecord(_))));
    }

    #[test]
    fn record_accepts_mongo_style_id_and_ignores_derived_fields() {
        let json = r#"{
            "_id": "abc123",
            "name": "Bo",
            "email": "bo@example.com",
            "course": "EE",
            "batchYear": "2021-2025",
            "subjects": [{"name": "Math", "marks": 40}],
            "totalMarks": 999,
            "average": 999.0,
            "grade": "A+"
        }"#;
        let record: StudentRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(record.id, StudentId::new("abc123"));

        let student = Student::from_record(record).expect("valid");
        assert_eq!(student.total_marks(), 40);
        assert_eq!(student.grade(), Grade::F);
    }

    #[test]
    fn student_serializes_derived_fields() {
        let student = Student::from_record(record("x", &[80])).expect("valid");
        let json = serde_json::to_value(&student).expect("json");
        assert_eq!(json["_id"], "x");
        assert_eq!(json["totalMarks"], 80);
        assert_eq!(json["grade"], "A");
        assert_eq!(json["batchYear"], "2022-2026");
    }

    #[test]
    fn draft_roundtrip_through_record() {
        let student = Student::from_record(record("7", &[55])).expect("valid");
        let draft = student.to_draft();
        let rebuilt = StudentRecord::from_draft(student.id().clone(), draft);
        assert_eq!(rebuilt, record("7", &[55]));
    }
}
