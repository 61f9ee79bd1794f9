//! # Dashboard Summary
//!
//! Figures computed over the whole, unfiltered collection: student count,
//! course list, and average performance. None of them depend on the active
//! search, sort or page.

use crate::primitives::ALL_COURSES;
use crate::Student;
use serde::Serialize;
use std::collections::BTreeSet;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub total_students: usize,
    pub active_courses: usize,
    /// Mean of every student's average; 0 for an empty collection.
    pub average_performance: f64,
}

impl RosterSummary {
    #[must_use]
    pub fn from_records(records: &[Student]) -> Self {
        Self {
            total_students: records.len(),
            active_courses: distinct_courses(records).len(),
            average_performance: average_performance(records),
        }
    }
}

/// Distinct course names in first-seen order.
#[must_use]
pub fn distinct_courses(records: &[Student]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|s| seen.insert(s.course()))
        .map(|s| s.course().to_string())
        .collect()
}

/// Options for the course filter: the `"all"` sentinel, then each course.
#[must_use]
pub fn course_options(records: &[Student]) -> Vec<String> {
    let mut options = vec![ALL_COURSES.to_string()];
    options.extend(distinct_courses(records));
    options
}

/// Mean of `average` across all records, 0 when there are none.
#[must_use]
#[allow(clippy::float_arithmetic)]
pub fn average_performance(records: &[Student]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(Student::average).sum();
    sum / records.len() as f64
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{StudentId, StudentRecord, Subject};

    fn student(id: &str, course: &str, marks: &[i32]) -> Student {
        Student::from_record(StudentRecord {
            id: StudentId::new(id),
            name: format!("n{id}"),
            email: format!("n{id}@uni.edu"),
            course: course.to_string(),
            batch_year: "2020-2024".to_string(),
            subjects: marks.iter().map(|m| Subject::new("S", *m)).collect(),
        })
        .expect("valid")
    }

    #[test]
    fn summary_of_three() {
        let records = vec![
            student("1", "CS", &[90]),
            student("2", "CS", &[70]),
            student("3", "EE", &[80]),
        ];
        let summary = RosterSummary::from_records(&records);
        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.active_courses, 2);
        assert_eq!(summary.average_performance, 80.0);
    }

    #[test]
    fn empty_collection_averages_zero() {
        assert_eq!(average_performance(&[]), 0.0);
        assert_eq!(course_options(&[]), ["all"]);
    }

    #[test]
    fn course_options_prepend_sentinel_once() {
        let records = vec![
            student("1", "EE", &[50]),
            student("2", "CS", &[50]),
            student("3", "EE", &[50]),
        ];
        assert_eq!(course_options(&records), ["all", "EE", "CS"]);
    }

    #[test]
    fn average_uses_per_student_average() {
        // 100 and avg(60, 60) = 60 -> mean 80, not total-weighted
        let records = vec![student("1", "CS", &[100]), student("2", "CS", &[60, 60])];
        assert_eq!(average_performance(&records), 80.0);
    }
}
