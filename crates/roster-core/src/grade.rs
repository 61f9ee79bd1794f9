//! # Grade Engine
//!
//! Turns a student's subject marks into `(total, average, grade)`.
//!
//! - `total = Σ marks`
//! - `average = total / count`, unrounded (display rounding is the caller's job)
//! - `grade` is a step function of the average, see [`Grade::from_average`]
//!
//! The engine is pure. Empty subject lists and marks outside [0, 100] are
//! rejected with `RosterError::InvalidRecord`.

use crate::primitives::{
    A_PLUS_THRESHOLD, A_THRESHOLD, B_THRESHOLD, C_THRESHOLD, D_THRESHOLD, MAX_MARKS, MIN_MARKS,
};
use crate::{RosterError, Subject};
use serde::{Deserialize, Serialize};

// =============================================================================
// GRADE ENUM
// =============================================================================

/// Letter grade, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    /// Map an average in [0, 100] to its letter.
    ///
    /// | Average     | Grade |
    /// |-------------|-------|
    /// | [90, 100]   | A+    |
    /// | [80, 90)    | A     |
    /// | [70, 80)    | B     |
    /// | [60, 70)    | C     |
    /// | [50, 60)    | D     |
    /// | [0, 50)     | F     |
    #[must_use]
    pub fn from_average(average: f64) -> Self {
        if average >= A_PLUS_THRESHOLD {
            Grade::APlus
        } else if average >= A_THRESHOLD {
            Grade::A
        } else if average >= B_THRESHOLD {
            Grade::B
        } else if average >= C_THRESHOLD {
            Grade::C
        } else if average >= D_THRESHOLD {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// The letter as displayed.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    /// Lowest average that still earns this grade.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        match self {
            Grade::APlus => A_PLUS_THRESHOLD,
            Grade::A => A_THRESHOLD,
            Grade::B => B_THRESHOLD,
            Grade::C => C_THRESHOLD,
            Grade::D => D_THRESHOLD,
            Grade::F => MIN_MARKS as f64,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PERFORMANCE
// =============================================================================

/// Derived performance of one student.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub total_marks: u32,
    pub average: f64,
    pub grade: Grade,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Stateless grade computation.
pub struct GradeEngine;

impl GradeEngine {
    /// Check that every subject's marks lie in [0, 100] and that there is at
    /// least one subject.
    pub fn check(subjects: &[Subject]) -> Result<(), RosterError> {
        if subjects.is_empty() {
            return Err(RosterError::InvalidRecord(
                "a student needs at least one subject".to_string(),
            ));
        }
        if let Some(bad) = subjects
            .iter()
            .find(|s| !(MIN_MARKS..=MAX_MARKS).contains(&s.marks))
        {
            return Err(RosterError::InvalidRecord(format!(
                "marks {} for '{}' are outside {}..={}",
                bad.marks, bad.name, MIN_MARKS, MAX_MARKS
            )));
        }
        Ok(())
    }

    /// Compute total, average and grade for a subject list.
    #[allow(clippy::float_arithmetic)]
    pub fn evaluate(subjects: &[Subject]) -> Result<Performance, RosterError> {
        Self::check(subjects)?;

        // Marks are in 0..=100 after the check, so the sum cannot go negative.
        let total_marks: u32 = subjects.iter().map(|s| s.marks as u32).sum();
        let average = f64::from(total_marks) / subjects.len() as f64;

        Ok(Performance {
            total_marks,
            average,
            grade: Grade::from_average(average),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
