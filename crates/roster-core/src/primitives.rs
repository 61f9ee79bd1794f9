//! # Policy Constants
//!
//! Fixed values for the Roster engine. They are compiled in and immutable at
//! runtime.

// =============================================================================
// MARKS
// =============================================================================

/// Lowest marks a subject can carry.
pub const MIN_MARKS: i32 = 0;

/// Highest marks a subject can carry.
pub const MAX_MARKS: i32 = 100;

// =============================================================================
// GRADE BANDS
// =============================================================================
//
// Closed-open intervals over the average:
//   F [0,50)  D [50,60)  C [60,70)  B [70,80)  A [80,90)  A+ [90,100]

/// Lowest average that earns an A+.
pub const A_PLUS_THRESHOLD: f64 = 90.0;

/// Lowest average that earns an A.
pub const A_THRESHOLD: f64 = 80.0;

/// Lowest average that earns a B.
pub const B_THRESHOLD: f64 = 70.0;

/// Lowest average that earns a C.
pub const C_THRESHOLD: f64 = 60.0;

/// Lowest average that earns a D. Anything below is an F.
pub const D_THRESHOLD: f64 = 50.0;

// =============================================================================
// QUERY DEFAULTS
// =============================================================================

/// Course filter value meaning "no course filter".
pub const ALL_COURSES: &str = "all";

/// Rows per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the table view.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

// =============================================================================
// EXPORT
// =============================================================================

/// Column headers of the CSV export, in order.
pub const EXPORT_HEADER: [&str; 6] = ["Name", "Email", "Course", "Total Marks", "Average", "Grade"];

/// Default file name for exported tables.
pub const EXPORT_FILE_NAME: &str = "students.csv";
