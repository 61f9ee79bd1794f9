//! # Query Pipeline
//!
//! Filter → sort → paginate over an in-memory slice of students.
//!
//! - Search is a case-insensitive substring match on name or email (the table
//!   view also matches course). An empty term keeps everything.
//! - Course filter is an exact match; `"all"` or an empty value disables it.
//! - Sort is stable. "Performance" compares `totalMarks`, not the average.
//! - Pages are one-based. A page past the end is empty; `total_matches` is
//!   always the size of the full filtered set.
//!
//! The pipeline never mutates its input and returns borrowed rows.

use crate::primitives::{ALL_COURSES, DEFAULT_PAGE_SIZE, PAGE_WINDOW};
use crate::{RosterError, Student};
use std::cmp::Ordering;
use std::str::FromStr;

// =============================================================================
// SEARCH
// =============================================================================

/// Which fields the search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Name, email and course.
    #[default]
    Table,
    /// Name and email only.
    Dashboard,
}

/// Course filter with the "all" sentinel made explicit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CourseFilter {
    #[default]
    All,
    Only(String),
}

impl CourseFilter {
    /// Interpret a raw filter value. `"all"` and `""` disable the filter.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == ALL_COURSES {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        match self {
            Self::All => true,
            Self::Only(course) => student.course() == course,
        }
    }
}

// =============================================================================
// SORT
// =============================================================================

/// Column a table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Email,
    Course,
    BatchYear,
    /// Total marks.
    Performance,
}

impl SortKey {
    fn compare(self, a: &Student, b: &Student) -> Ordering {
        match self {
            SortKey::Name => a.name().cmp(b.name()),
            SortKey::Email => a.email().cmp(b.email()),
            SortKey::Course => a.course().cmp(b.course()),
            SortKey::BatchYear => a.batch_year().cmp(b.batch_year()),
            SortKey::Performance => a.total_marks().cmp(&b.total_marks()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Email => "email",
            SortKey::Course => "course",
            SortKey::BatchYear => "batch",
            SortKey::Performance => "performance",
        }
    }
}

impl FromStr for SortKey {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "email" => Ok(SortKey::Email),
            "course" => Ok(SortKey::Course),
            "batch" | "batch-year" | "batchyear" => Ok(SortKey::BatchYear),
            "performance" | "total" | "marks" | "subjects" => Ok(SortKey::Performance),
            other => Err(RosterError::InvalidQuery(format!(
                "unknown sort key '{}'. Use: name, email, course, batch, performance",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// Header click: same key flips direction, a new key starts ascending.
    #[must_use]
    pub fn toggle(current: Option<SortSpec>, key: SortKey) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                Self::descending(key)
            }
            _ => Self::ascending(key),
        }
    }

    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        let ord = self.key.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// Everything the pipeline needs to produce one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub scope: SearchScope,
    pub course: CourseFilter,
    pub sort: Option<SortSpec>,
    /// One-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: String::new(),
            scope: SearchScope::Table,
            course: CourseFilter::All,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn course(mut self, course: CourseFilter) -> Self {
        self.course = course;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Change the page size. Like the page-size selector, this goes back to
    /// page 1.
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self.page = 1;
        self
    }

    fn matches(&self, student: &Student, needle: &str) -> bool {
        if !self.course.matches(student) {
            return false;
        }
        if needle.is_empty() {
            return true;
        }
        let hit = |field: &str| field.to_lowercase().contains(needle);
        match self.scope {
            SearchScope::Table => {
                hit(student.name()) || hit(student.email()) || hit(student.course())
            }
            SearchScope::Dashboard => hit(student.name()) || hit(student.email()),
        }
    }

    fn validate(&self) -> Result<(), RosterError> {
        if self.page_size == 0 {
            return Err(RosterError::InvalidQuery(
                "page size must be positive".to_string(),
            ));
        }
        if self.page == 0 {
            return Err(RosterError::InvalidQuery(
                "pages are numbered from 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// RESULT PAGE
// =============================================================================

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<'a> {
    pub items: Vec<&'a Student>,
    pub total_matches: usize,
    pub page: usize,
    pub page_size: usize,
}

impl QueryPage<'_> {
    /// `ceil(total_matches / page_size)`; zero when nothing matched.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_matches.div_ceil(self.page_size)
    }

    /// One-based `(first, last)` row numbers shown on this page, for
    /// "showing X to Y of Z". `None` when the page is empty.
    #[must_use]
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page numbers for the pager buttons: at most [`PAGE_WINDOW`], centred
    /// on the current page and clamped to `1..=total_pages`.
    #[must_use]
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total <= PAGE_WINDOW {
            return (1..=total).collect();
        }
        let half = PAGE_WINDOW / 2;
        let start = if self.page <= half + 1 {
            1
        } else if self.page + half >= total {
            total + 1 - PAGE_WINDOW
        } else {
            self.page - half
        };
        (start..start + PAGE_WINDOW).collect()
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// Stateless filter/sort/paginate pipeline.
pub struct QueryPipeline;

impl QueryPipeline {
    /// Filter and sort without paginating.
    ///
    /// This is the set the table shows across all pages and the set exported
    /// when nothing is selected.
    #[must_use]
    pub fn select<'a>(records: &'a [Student], query: &Query) -> Vec<&'a Student> {
        let needle = query.search.to_lowercase();
        let mut rows: Vec<&Student> = records
            .iter()
            .filter(|s| query.matches(s, &needle))
            .collect();

        if let Some(spec) = query.sort {
            // sort_by is stable: equal keys keep their input order
            rows.sort_by(|a, b| spec.compare(a, b));
        }
        rows
    }

    /// Produce the requested page.
    ///
    /// Returns `RosterError::InvalidQuery` for a zero page size or page 0.
    pub fn apply<'a>(records: &'a [Student], query: &Query) -> Result<QueryPage<'a>, RosterError> {
        query.validate()?;

        let rows = Self::select(records, query);
        let total_matches = rows.len();
        let start = (query.page - 1).saturating_mul(query.page_size);
        let items = rows
            .into_iter()
            .skip(start)
            .take(query.page_size)
            .collect();

        Ok(QueryPage {
            items,
            total_matches,
            page: query.page,
            page_size: query.page_size,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StudentId, StudentRecord, Subject};

    fn student(id: &str, name: &str, course: &str, marks: &[i32]) -> Student {
        Student::from_record(StudentRecord {
            id: StudentId::new(id),
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            course: course.to_string(),
            batch_year: "2022-2026".to_string(),
            subjects: marks.iter().map(|m| Subject::new("S", *m)).collect(),
        })
        .expect("valid")
    }

    fn names(rows: &[&Student]) -> Vec<String> {
        rows.iter().map(|s| s.name().to_string()).collect()
    }

    fn sample() -> Vec<Student> {
        vec![
            student("1", "Al", "CS", &[90]),
            student("2", "Bo", "CS", &[70]),
            student("3", "Cy", "EE", &[80]),
        ]
    }

    #[test]
    fn course_filter_and_name_sort() {
        let records = sample();
        let query = Query::new()
            .course(CourseFilter::parse("CS"))
            .sort(SortSpec::ascending(SortKey::Name));
        let page = QueryPipeline::apply(&records, &query).expect("apply");
        assert_eq!(names(&page.items), ["Al", "Bo"]);
        assert_eq!(page.total_matches, 2);
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = sample();
        let page = QueryPipeline::apply(&records, &Query::new().search("bO")).expect("apply");
        assert_eq!(names(&page.items), ["Bo"]);
    }

    #[test]
    fn table_scope_matches_course_but_dashboard_does_not() {
        let records = sample();
        let table = QueryPipeline::select(&records, &Query::new().search("ee"));
        assert_eq!(names(&table), ["Cy"]);

        let dashboard =
            QueryPipeline::select(&records, &Query::new().search("ee").scope(SearchScope::Dashboard));
        assert!(dashboard.is_empty());
    }

    #[test]
    fn sentinel_disables_course_filter() {
        assert_eq!(CourseFilter::parse("all"), CourseFilter::All);
        assert_eq!(CourseFilter::parse(""), CourseFilter::All);
        assert_eq!(CourseFilter::parse("All"), CourseFilter::Only("All".to_string()));
    }

    #[test]
    fn performance_sorts_by_total_not_average() {
        let records = vec![
            student("a", "A", "CS", &[100]),
            student("b", "B", "CS", &[60, 60]),
        ];
        let query = Query::new().sort(SortSpec::descending(SortKey::Performance));
        let rows = QueryPipeline::select(&records, &query);
        assert_eq!(names(&rows), ["B", "A"]);
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let records = vec![
            student("1", "X", "CS", &[50]),
            student("2", "Y", "CS", &[50]),
            student("3", "Z", "AA", &[50]),
        ];
        let asc = QueryPipeline::select(&records, &Query::new().sort(SortSpec::ascending(SortKey::Course)));
        assert_eq!(names(&asc), ["Z", "X", "Y"]);

        let desc =
            QueryPipeline::select(&records, &Query::new().sort(SortSpec::descending(SortKey::Course)));
        assert_eq!(names(&desc), ["X", "Y", "Z"]);
    }

    #[test]
    fn toggle_rules() {
        let first = SortSpec::toggle(None, SortKey::Name);
        assert_eq!(first, SortSpec::ascending(SortKey::Name));
        let second = SortSpec::toggle(Some(first), SortKey::Name);
        assert_eq!(second, SortSpec::descending(SortKey::Name));
        let third = SortSpec::toggle(Some(second), SortKey::Name);
        assert_eq!(third, SortSpec::ascending(SortKey::Name));
        let other = SortSpec::toggle(Some(second), SortKey::Course);
        assert_eq!(other, SortSpec::ascending(SortKey::Course));
    }

    #[test]
    fn pages_slice_without_gaps() {
        let records: Vec<Student> = (0..7)
            .map(|i| student(&i.to_string(), &format!("N{i}"), "CS", &[50]))
            .collect();
        let base = Query::new().page_size(3);

        let p1 = QueryPipeline::apply(&records, &base.clone().page(1)).expect("p1");
        let p3 = QueryPipeline::apply(&records, &base.clone().page(3)).expect("p3");
        let p4 = QueryPipeline::apply(&records, &base.clone().page(4)).expect("p4");

        assert_eq!(names(&p1.items), ["N0", "N1", "N2"]);
        assert_eq!(names(&p3.items), ["N6"]);
        assert!(p4.items.is_empty());
        assert_eq!(p4.total_matches, 7);
        assert_eq!(p1.total_pages(), 3);
        assert_eq!(p3.range(), Some((7, 7)));
        assert_eq!(p4.range(), None);
        assert!(!p1.has_previous());
        assert!(!p3.has_next());
    }

    #[test]
    fn invalid_page_parameters_rejected() {
        let records = sample();
        let zero_size = Query {
            page_size: 0,
            ..Query::new()
        };
        assert!(matches!(
            QueryPipeline::apply(&records, &zero_size),
            Err(RosterError::InvalidQuery(_))
        ));
        assert!(matches!(
            QueryPipeline::apply(&records, &Query::new().page(0)),
            Err(RosterError::InvalidQuery(_))
        ));
    }

    #[test]
    fn page_size_change_resets_page() {
        let q = Query::new().page(4).page_size(25);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 25);
    }

    #[test]
    fn page_window_clamps_at_edges() {
        let page = |page, total_matches| QueryPage {
            items: Vec::new(),
            total_matches,
            page,
            page_size: 1,
        };
        assert_eq!(page(1, 3).page_window(), [1, 2, 3]);
        assert_eq!(page(1, 10).page_window(), [1, 2, 3, 4, 5]);
        assert_eq!(page(3, 10).page_window(), [1, 2, 3, 4, 5]);
        assert_eq!(page(6, 10).page_window(), [4, 5, 6, 7, 8]);
        assert_eq!(page(9, 10).page_window(), [6, 7, 8, 9, 10]);
        assert_eq!(page(10, 10).page_window(), [6, 7, 8, 9, 10]);
        assert!(page(1, 0).page_window().is_empty());
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("Performance".parse::<SortKey>(), Ok(SortKey::Performance));
        assert_eq!("subjects".parse::<SortKey>(), Ok(SortKey::Performance));
        assert_eq!("batch".parse::<SortKey>(), Ok(SortKey::BatchYear));
        assert!(matches!("grade".parse::<SortKey>(), Err(RosterError::InvalidQuery(_))));
    }

    #[test]
    fn apply_does_not_touch_input() {
        let records = sample();
        let before = records.clone();
        let _ = QueryPipeline::apply(
            &records,
            &Query::new().sort(SortSpec::descending(SortKey::Name)),
        );
        assert_eq!(records, before);
    }
}
