//! # roster-core
//!
//! The student-records engine for Roster - THE LOGIC.
//!
//! Everything here is a pure function of its inputs or a plain in-memory
//! container. Network calls, sessions and presentation live in the `roster`
//! app crate.
//!
//! ## Data Flow
//!
//! ```text
//! API client ──> RecordStore ──> GradeEngine ──> QueryPipeline ──> presentation
//!               (raw records)    (annotate)     (filter/sort/page)
//! ```
//!
//! ## Architectural Constraints
//!
//! - Derived fields (`totalMarks`, `average`, `grade`) are computed by the
//!   Grade Engine only and are never editable
//! - The Record Store is the sole owner of the collection
//! - No async, no I/O, no panics: every failure is a typed error

// =============================================================================
// MODULES
// =============================================================================

pub mod export;
pub mod grade;
pub mod primitives;
pub mod query;
pub mod selection;
pub mod store;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{RosterError, Student, StudentDraft, StudentId, StudentRecord, Subject};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use export::{export_set, to_csv};
pub use grade::{Grade, GradeEngine, Performance};
pub use query::{
    CourseFilter, Query, QueryPage, QueryPipeline, SearchScope, SortDirection, SortKey, SortSpec,
};
pub use selection::Selection;
pub use store::RecordStore;
pub use summary::{RosterSummary, average_performance, course_options, distinct_courses};
pub use validation::{BatchYear, StudentForm, SubjectForm, ValidationError};
