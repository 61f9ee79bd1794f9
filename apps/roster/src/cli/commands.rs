//! # CLI Command Implementations
//!
//! Each `cmd_*` loads what it needs, runs the engine and renders either a
//! human-readable view or, with `--json-mode`, a JSON document on stdout.

use super::{FormArgs, ViewArgs};
use crate::api::{AuthApi, HttpClient, RegisterRequest};
use crate::config::RosterConfig;
use crate::error::AppError;
use crate::service::Roster;
use crate::session::{SessionContext, SessionStore};
use roster_core::primitives::PAGE_SIZE_OPTIONS;
use roster_core::{
    CourseFilter, Query, QueryPipeline, RosterError, RosterSummary, SearchScope, Selection,
    SortKey, SortSpec, Student, StudentForm, StudentId, SubjectForm, course_options, export_set,
    to_csv,
};
use serde::Serialize;
use std::path::Path;

// =============================================================================
// HELPERS
// =============================================================================

fn client(config: &RosterConfig) -> Result<HttpClient, AppError> {
    Ok(HttpClient::new(config.base_url.clone(), config.timeout())?)
}

fn sessions(config: &RosterConfig) -> SessionStore {
    SessionStore::new(config.session_file.clone())
}

/// Signed-in service with the collection already loaded.
async fn connect(config: &RosterConfig) -> Result<Roster<HttpClient>, AppError> {
    let session = sessions(config).require()?;
    let mut roster = Roster::new(client(config)?.with_session(&session));
    roster.refresh().await?;
    Ok(roster)
}

fn resolve_password(given: Option<String>) -> Result<String, AppError> {
    given
        .or_else(|| std::env::var("ROSTER_PASSWORD").ok())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            AppError::Usage("A password is required (--password or ROSTER_PASSWORD)".to_string())
        })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(format!("Cannot encode output as JSON: {e}")))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Turn the shared view flags into a query.
pub fn build_query(view: &ViewArgs, scope: SearchScope) -> Result<Query, AppError> {
    let mut query = Query::new()
        .scope(scope)
        .search(view.search.clone().unwrap_or_default())
        .course(CourseFilter::parse(view.course.as_deref().unwrap_or_default()));
    if let Some(ref key) = view.sort {
        let key: SortKey = key.parse()?;
        let spec = if view.desc {
            SortSpec::descending(key)
        } else {
            SortSpec::ascending(key)
        };
        query = query.sort(spec);
    }
    tracing::debug!(?query, "Built query");
    Ok(query)
}

/// `"Math=90"` -> subject row. A missing `=` leaves the marks blank so the
/// form validation reports the incomplete row.
pub fn parse_subject(arg: &str) -> SubjectForm {
    match arg.rsplit_once('=') {
        Some((name, marks)) => SubjectForm::new(name.trim(), marks.trim()),
        None => SubjectForm::new(arg.trim(), ""),
    }
}

/// Overlay the given flags on a form. Subjects are replaced as a whole.
pub fn apply_fields(form: &mut StudentForm, fields: &FormArgs) {
    if let Some(ref name) = fields.name {
        form.name.clone_from(name);
    }
    if let Some(ref email) = fields.email {
        form.email.clone_from(email);
    }
    if let Some(ref course) = fields.course {
        form.course.clone_from(course);
    }
    if let Some(ref batch) = fields.batch {
        form.batch_year.clone_from(batch);
    }
    if !fields.subjects.is_empty() {
        form.subjects = fields.subjects.iter().map(|s| parse_subject(s)).collect();
    }
}

fn not_found(id: &StudentId) -> AppError {
    AppError::Core(RosterError::NotFound(id.clone()))
}

/// Compact table of students.
fn print_table(rows: &[&Student]) {
    println!(
        "{:<10} {:<20} {:<26} {:<12} {:<10} {:>6} {:>6}  {:<5}",
        "ID", "Name", "Email", "Course", "Batch", "Total", "Avg", "Grade"
    );
    println!("{}", "-".repeat(104));
    for s in rows {
        println!(
            "{:<10} {:<20} {:<26} {:<12} {:<10} {:>6} {:>6.1}  {:<5}",
            s.id().short(),
            s.name(),
            s.email(),
            s.course(),
            s.batch_year(),
            s.total_marks(),
            s.average(),
            s.grade()
        );
    }
}

fn print_student(s: &Student) {
    println!("{} <{}>", s.name(), s.email());
    println!("  ID:      {}", s.id());
    println!("  Course:  {}", s.course());
    println!("  Batch:   {}", s.batch_year());
    println!("  Subjects:");
    for subject in s.subjects() {
        println!("    {:<20} {:>3}", subject.name, subject.marks);
    }
    println!("  Total:   {}", s.total_marks());
    println!("  Average: {:.1}", s.average());
    println!("  Grade:   {}", s.grade());
}

/// Pager line such as `< 2 3 [4] 5 6 >`.
fn pager_line(page: &roster_core::QueryPage<'_>) -> String {
    let mut parts = Vec::new();
    if page.has_previous() {
        parts.push("<".to_string());
    }
    for n in page.page_window() {
        if n == page.page {
            parts.push(format!("[{n}]"));
        } else {
            parts.push(n.to_string());
        }
    }
    if page.has_next() {
        parts.push(">".to_string());
    }
    parts.join(" ")
}

// =============================================================================
// SESSION COMMANDS
// =============================================================================

pub async fn cmd_login(
    config: &RosterConfig,
    json_mode: bool,
    email: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = resolve_password(password)?;
    let resp = client(config)?.login(email, &password).await?;
    let session = SessionContext::from(resp);
    sessions(config).save(&session)?;
    tracing::info!(user = %session.user.email, "Logged in");

    if json_mode {
        print_json(&session.user)?;
    } else {
        println!("Logged in as {} <{}>", session.user.name, session.user.email);
    }
    Ok(())
}

pub async fn cmd_register(
    config: &RosterConfig,
    json_mode: bool,
    name: String,
    email: String,
    password: Option<String>,
    role: String,
) -> Result<(), AppError> {
    let request = RegisterRequest {
        name,
        email,
        password: resolve_password(password)?,
        role,
    };
    let resp = client(config)?.register(&request).await?;
    let session = SessionContext::from(resp);
    sessions(config).save(&session)?;
    tracing::info!(user = %session.user.email, "Registered");

    if json_mode {
        print_json(&session.user)?;
    } else {
        println!("Registered and logged in as {} <{}>", session.user.name, session.user.email);
    }
    Ok(())
}

pub fn cmd_logout(config: &RosterConfig, json_mode: bool) -> Result<(), AppError> {
    let existed = sessions(config).clear()?;
    if json_mode {
        print_json(&serde_json::json!({ "logged_out": existed }))?;
    } else if existed {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub async fn cmd_whoami(config: &RosterConfig, json_mode: bool) -> Result<(), AppError> {
    let session = sessions(config).require()?;
    let profile = client(config)?.with_session(&session).profile().await?;

    if json_mode {
        print_json(&profile)?;
    } else {
        println!("{} <{}>", profile.name, profile.email);
        if !profile.role.is_empty() {
            println!("Role: {}", profile.role);
        }
        println!("Backend: {}", config.base_url);
    }
    Ok(())
}

// =============================================================================
// VIEW COMMANDS
// =============================================================================

/// Show one page of the student table.
pub async fn cmd_list(
    config: &RosterConfig,
    json_mode: bool,
    view: &ViewArgs,
    page: usize,
    page_size: Option<usize>,
) -> Result<(), AppError> {
    let page_size = page_size.unwrap_or(config.page_size);
    if !PAGE_SIZE_OPTIONS.contains(&page_size) {
        return Err(AppError::Usage(format!(
            "Page size must be one of {PAGE_SIZE_OPTIONS:?}"
        )));
    }
    let query = build_query(view, SearchScope::Table)?
        .page_size(page_size)
        .page(page);

    let roster = connect(config).await?;
    let result = QueryPipeline::apply(roster.store().records(), &query)?;

    if json_mode {
        print_json(&serde_json::json!({
            "items": result.items,
            "totalMatches": result.total_matches,
            "page": result.page,
            "pageSize": result.page_size,
            "totalPages": result.total_pages(),
        }))?;
        return Ok(());
    }

    match result.range() {
        Some((first, last)) => {
            print_table(&result.items);
            println!();
            println!(
                "Showing {} to {} of {} results",
                first, last, result.total_matches
            );
            println!("Pages: {}", pager_line(&result));
        }
        None if result.total_matches > 0 => {
            println!(
                "Page {} is past the end ({} pages)",
                result.page,
                result.total_pages()
            );
        }
        None => println!("No students found"),
    }
    Ok(())
}

/// Summary cards followed by one card per matching student.
pub async fn cmd_dashboard(
    config: &RosterConfig,
    json_mode: bool,
    search: Option<String>,
    course: Option<String>,
) -> Result<(), AppError> {
    let view = ViewArgs {
        search,
        course,
        ..ViewArgs::default()
    };
    let query = build_query(&view, SearchScope::Dashboard)?;

    let roster = connect(config).await?;
    let records = roster.store().records();
    let summary = RosterSummary::from_records(records);
    let students = QueryPipeline::select(records, &query);

    if json_mode {
        print_json(&serde_json::json!({
            "summary": summary,
            "students": students,
        }))?;
        return Ok(());
    }

    println!("Roster Dashboard");
    println!("================");
    println!("Total Students:      {}", summary.total_students);
    println!("Active Courses:      {}", summary.active_courses);
    println!("Average Performance: {:.1}%", summary.average_performance);
    println!();
    println!("Student Performance ({} of {})", students.len(), records.len());

    if students.is_empty() {
        println!();
        println!("No students found");
    }
    for s in &students {
        println!();
        println!("{} - {} ({})", s.name(), s.course(), s.batch_year());
        println!("  {}", s.email());
        let subjects: Vec<String> = s
            .subjects()
            .iter()
            .map(|sub| format!("{}: {}", sub.name, sub.marks))
            .collect();
        println!("  {}", subjects.join(", "));
        println!(
            "  Total {}  Average {:.1}  Grade {}",
            s.total_marks(),
            s.average(),
            s.grade()
        );
    }
    Ok(())
}

pub async fn cmd_courses(config: &RosterConfig, json_mode: bool) -> Result<(), AppError> {
    let roster = connect(config).await?;
    let options = course_options(roster.store().records());

    if json_mode {
        print_json(&options)?;
    } else {
        for option in options {
            println!("{option}");
        }
    }
    Ok(())
}

pub async fn cmd_show(
    config: &RosterConfig,
    json_mode: bool,
    id: &str,
    remote: bool,
) -> Result<(), AppError> {
    let id = StudentId::new(id);
    let session = sessions(config).require()?;
    let roster = Roster::new(client(config)?.with_session(&session));

    let student = if remote {
        roster.fetch(&id).await?
    } else {
        let mut roster = roster;
        roster.refresh().await?;
        roster.store().get(&id).cloned().ok_or_else(|| not_found(&id))?
    };

    if json_mode {
        print_json(&student)?;
    } else {
        print_student(&student);
    }
    Ok(())
}

// =============================================================================
// MUTATION COMMANDS
// =============================================================================

pub async fn cmd_add(config: &RosterConfig, json_mode: bool, fields: &FormArgs) -> Result<(), AppError> {
    let mut form = StudentForm::default();
    apply_fields(&mut form, fields);
    // Fail on bad input before touching the network.
    form.validate()?;

    let mut roster = connect(config).await?;
    let student = roster.create(&form).await?;

    if json_mode {
        print_json(student)?;
    } else {
        println!("Student added: {} ({})", student.name(), student.id());
    }
    Ok(())
}

pub async fn cmd_edit(
    config: &RosterConfig,
    json_mode: bool,
    id: &str,
    fields: &FormArgs,
) -> Result<(), AppError> {
    let id = StudentId::new(id);
    let mut roster = connect(config).await?;
    let existing = roster.store().get(&id).ok_or_else(|| not_found(&id))?;

    let mut form = StudentForm::from_draft(&existing.to_draft());
    apply_fields(&mut form, fields);
    let student = roster.update(&id, &form).await?;

    if json_mode {
        print_json(student)?;
    } else {
        println!(
            "Student updated: {} (average {:.1}, grade {})",
            student.name(),
            student.average(),
            student.grade()
        );
    }
    Ok(())
}

pub async fn cmd_delete(
    config: &RosterConfig,
    json_mode: bool,
    id: &str,
    yes: bool,
) -> Result<(), AppError> {
    if !yes {
        return Err(AppError::Usage(format!(
            "Refusing to delete {id} without --yes"
        )));
    }
    let id = StudentId::new(id);
    let mut roster = connect(config).await?;
    let removed = roster.delete(&id).await?;

    if json_mode {
        print_json(&serde_json::json!({ "deleted": removed.id() }))?;
    } else {
        println!("Student deleted: {} ({})", removed.name(), removed.id());
    }
    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write the filtered view (or the selected ids) as CSV. `-` writes to stdout.
pub async fn cmd_export(
    config: &RosterConfig,
    json_mode: bool,
    output: &Path,
    view: &ViewArgs,
    select: &[String],
) -> Result<(), AppError> {
    let query = build_query(view, SearchScope::Table)?;
    let roster = connect(config).await?;
    let records = roster.store().records();

    let selection = Selection::from_ids(select.iter().map(StudentId::new));
    if let Some(missing) = selection.ids().iter().find(|id| !roster.store().contains(id)) {
        return Err(not_found(missing));
    }

    let filtered = QueryPipeline::select(records, &query);
    let rows = export_set(records, &selection, filtered);
    let csv = to_csv(&rows);

    if output == Path::new("-") {
        println!("{csv}");
        return Ok(());
    }

    std::fs::write(output, &csv)
        .map_err(|e| AppError::Io(format!("Cannot write {}: {}", output.display(), e)))?;
    tracing::info!(count = rows.len(), path = %output.display(), "Exported students");

    if json_mode {
        print_json(&serde_json::json!({
            "path": output.to_string_lossy(),
            "count": rows.len(),
        }))?;
    } else {
        println!("Exported {} students to {}", rows.len(), output.display());
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_reports_encoding_failure() {
        let ok = to_json(&serde_json::json!({ "deleted": "abc" })).expect("encodes");
        assert!(ok.contains("\"deleted\": \"abc\""));

        // JSON object keys must be strings.
        let bad = std::collections::BTreeMap::from([((1, 2), 3)]);
        let err = to_json(&bad).expect_err("tuple keys cannot be encoded");
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("Cannot encode output as JSON"));
    }

    #[test]
    fn test_parse_subject() {
        assert_eq!(parse_subject("Math=90"), SubjectForm::new("Math", "90"));
        assert_eq!(parse_subject(" Data = Science = 7 "), SubjectForm::new("Data = Science", "7"));
        assert_eq!(parse_subject("Art"), SubjectForm::new("Art", ""));
    }

    #[test]
    fn test_apply_fields_overlays() {
        let mut form = StudentForm {
            name: "Ada".to_string(),
            email: "ada@uni.edu".to_string(),
            course: "CS".to_string(),
            batch_year: "2022-2026".to_string(),
            subjects: vec![SubjectForm::new("Math", "90")],
        };
        let fields = FormArgs {
            course: Some("EE".to_string()),
            subjects: vec!["Circuits=70".to_string(), "Signals=80".to_string()],
            ..FormArgs::default()
        };
        apply_fields(&mut form, &fields);

        assert_eq!(form.name, "Ada");
        assert_eq!(form.course, "EE");
        assert_eq!(form.subjects.len(), 2);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_missing_marks_fail_validation() {
        let mut form = StudentForm::default();
        apply_fields(
            &mut form,
            &FormArgs {
                name: Some("Ada".to_string()),
                email: Some("ada@uni.edu".to_string()),
                course: Some("CS".to_string()),
                batch: Some("2022-2026".to_string()),
                subjects: vec!["Math".to_string()],
            },
        );
        assert_eq!(
            form.validate(),
            Err(roster_core::ValidationError::IncompleteSubject)
        );
    }

    #[test]
    fn test_build_query() {
        let view = ViewArgs {
            search: Some("al".to_string()),
            course: Some("all".to_string()),
            sort: Some("performance".to_string()),
            desc: true,
        };
        let query = build_query(&view, SearchScope::Table).expect("query");
        assert_eq!(query.course, CourseFilter::All);
        assert_eq!(query.sort, Some(SortSpec::descending(SortKey::Performance)));

        let bad = ViewArgs {
            sort: Some("shoe size".to_string()),
            ..ViewArgs::default()
        };
        assert!(matches!(
            build_query(&bad, SearchScope::Table),
            Err(AppError::Core(RosterError::InvalidQuery(_)))
        ));
    }
}
