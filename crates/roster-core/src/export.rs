//! # CSV Export
//!
//! Serializes a set of students to a comma-separated table:
//!
//! ```text
//! Name,Email,Course,Total Marks,Average,Grade
//! Ada,ada@uni.edu,CS,180,90.0,A+
//! ```
//!
//! The exported set is the current selection when it is non-empty (in store
//! order), otherwise the filtered and sorted set without pagination.

use crate::primitives::EXPORT_HEADER;
use crate::{Selection, Student};

/// Pick the rows to export.
///
/// `records` is the full store snapshot; `filtered` is the pipeline's
/// unpaginated output for the active query.
#[must_use]
pub fn export_set<'a>(
    records: &'a [Student],
    selection: &Selection,
    filtered: Vec<&'a Student>,
) -> Vec<&'a Student> {
    if selection.is_empty() {
        return filtered;
    }
    records
        .iter()
        .filter(|s| selection.contains(s.id()))
        .collect()
}

/// Render rows as CSV, header first, rows separated by `\n`.
#[must_use]
pub fn to_csv(rows: &[&Student]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(EXPORT_HEADER.join(","));
    for student in rows {
        let fields = [
            csv_quote(student.name()),
            csv_quote(student.email()),
            csv_quote(student.course()),
            student.total_marks().to_string(),
            format!("{:.1}", student.average()),
            student.grade().to_string(),
        ];
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
