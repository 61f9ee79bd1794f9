//! # Roster Service
//!
//! Sequences backend calls and Record Store commits.
//!
//! Every mutation follows the same shape: validate locally, await the
//! backend, then commit to the store. If the backend fails, or the future
//! is dropped before it resolves, the store is left exactly as it was.
//! After each commit the new store generation is published on a watch
//! channel so views can re-render.

use crate::api::StudentApi;
use crate::error::AppError;
use roster_core::{RecordStore, RosterError, Student, StudentForm, StudentId};
use tokio::sync::watch;

pub struct Roster<A> {
    api: A,
    store: RecordStore,
    changes: watch::Sender<u64>,
}

impl<A: StudentApi> Roster<A> {
    pub fn new(api: A) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            api,
            store: RecordStore::new(),
            changes,
        }
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Receive the store generation after every commit.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Replace the local collection with the backend's.
    pub async fn refresh(&mut self) -> Result<usize, AppError> {
        let records = self.api.fetch_all().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to fetch students");
        })?;
        let count = self.store.load(records)?;
        tracing::info!(count, "Loaded students");
        self.publish();
        Ok(count)
    }

    /// Fetch a single record from the backend without touching the store.
    pub async fn fetch(&self, id: &StudentId) -> Result<Student, AppError> {
        let record = self.api.fetch_one(id).await?;
        Ok(Student::from_record(record)?)
    }

    /// Validate and submit a new student.
    pub async fn create(&mut self, form: &StudentForm) -> Result<&Student, AppError> {
        let draft = form.validate()?;
        let created = self.api.create(&draft).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Create rejected by backend");
        })?;
        let id = created.id.clone();
        self.store.add(created)?;
        tracing::info!(id = %id, "Student created");
        self.publish();
        self.committed(&id)
    }

    /// Validate and submit an edit of an existing student.
    pub async fn update(&mut self, id: &StudentId, form: &StudentForm) -> Result<&Student, AppError> {
        let draft = form.validate()?;
        if !self.store.contains(id) {
            return Err(RosterError::NotFound(id.clone()).into());
        }
        let updated = self.api.update(id, &draft).await.inspect_err(|e| {
            tracing::warn!(id = %id, error = %e, "Update rejected by backend");
        })?;
        self.store.replace(id, updated)?;
        tracing::info!(id = %id, "Student updated");
        self.publish();
        self.committed(id)
    }

    /// Delete a student on the backend, then locally.
    pub async fn delete(&mut self, id: &StudentId) -> Result<Student, AppError> {
        if !self.store.contains(id) {
            return Err(RosterError::NotFound(id.clone()).into());
        }
        self.api.delete_by_id(id).await.inspect_err(|e| {
            tracing::warn!(id = %id, error = %e, "Delete rejected by backend");
        })?;
        let removed = self.store.remove(id)?;
        tracing::info!(id = %id, "Student deleted");
        self.publish();
        Ok(removed)
    }

    fn publish(&self) {
        self.changes.send_replace(self.store.generation());
    }

    fn committed(&self, id: &StudentId) -> Result<&Student, AppError> {
        self.store
            .get(id)
            .ok_or_else(|| RosterError::NotFound(id.clone()).into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use roster_core::{Grade, StudentDraft, StudentRecord, Subject, SubjectForm};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory backend with a switch to make every call fail.
    #[derive(Default)]
    struct FakeApi {
        records: Mutex<Vec<StudentRecord>>,
        next_id: AtomicUsize,
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl FakeApi {
        fn seeded(records: Vec<StudentRecord>) -> Self {
            let api = Self::default();
            *api.records.lock().expect("lock") = records;
            api
        }

        fn check(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Rejected {
                    status: 500,
                    message: "Server exploded".to_string(),
                });
            }
            Ok(())
        }

        fn not_found() -> ApiError {
            ApiError::Rejected {
                status: 404,
                message: "Student not found".to_string(),
            }
        }
    }

    impl StudentApi for FakeApi {
        async fn fetch_all(&self) -> Result<Vec<StudentRecord>, ApiError> {
            self.check()?;
            Ok(self.records.lock().expect("lock").clone())
        }

        async fn fetch_one(&self, id: &StudentId) -> Result<StudentRecord, ApiError> {
            self.check()?;
            self.records
                .lock()
                .expect("lock")
                .iter()
                .find(|r| &r.id == id)
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn create(&self, draft: &StudentDraft) -> Result<StudentRecord, ApiError> {
            self.check()?;
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            let record = StudentRecord::from_draft(StudentId::new(format!("new-{n}")), draft.clone());
            self.records.lock().expect("lock").push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: &StudentId, draft: &StudentDraft) -> Result<StudentRecord, ApiError> {
            self.check()?;
            let mut records = self.records.lock().expect("lock");
            let slot = records
                .iter_mut()
                .find(|r| &r.id == id)
                .ok_or_else(Self::not_found)?;
            *slot = StudentRecord::from_draft(id.clone(), draft.clone());
            Ok(slot.clone())
        }

        async fn delete_by_id(&self, id: &StudentId) -> Result<(), ApiError> {
            self.check()?;
            let mut records = self.records.lock().expect("lock");
            let before = records.len();
            records.retain(|r| &r.id != id);
            if records.len() == before {
                return Err(Self::not_found());
            }
            Ok(())
        }
    }

    fn record(id: &str, name: &str, marks: i32) -> StudentRecord {
        StudentRecord {
            id: StudentId::new(id),
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            course: "CS".to_string(),
            batch_year: "2022-2026".to_string(),
            subjects: vec![Subject::new("Math", marks)],
        }
    }

    fn form(name: &str, marks: &str) -> StudentForm {
        StudentForm {
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase()),
            course: "CS".to_string(),
            batch_year: "2023-2027".to_string(),
            subjects: vec![SubjectForm::new("Math", marks)],
        }
    }

    async fn loaded() -> Roster<FakeApi> {
        let mut roster = Roster::new(FakeApi::seeded(vec![
            record("1", "Al", 90),
            record("2", "Bo", 70),
        ]));
        roster.refresh().await.expect("refresh");
        roster
    }

    #[tokio::test]
    async fn test_refresh_loads_and_publishes() {
        let roster = loaded().await;
        assert_eq!(roster.store().len(), 2);
        assert_eq!(*roster.subscribe().borrow(), roster.store().generation());
    }

    #[tokio::test]
    async fn test_create_commits_after_backend() {
        let mut roster = loaded().await;
        let mut rx = roster.subscribe();

        let created = roster.create(&form("Cy", "85")).await.expect("create");
        assert_eq!(created.id().as_str(), "new-0");
        assert_eq!(created.grade(), Grade::A);
        assert_eq!(roster.store().len(), 3);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), roster.store().generation());
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_backend() {
        let mut roster = loaded().await;
        let calls = roster.api().calls.load(Ordering::SeqCst);

        let err = roster.create(&form("Cy", "101")).await.expect_err("invalid");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(roster.api().calls.load(Ordering::SeqCst), calls);
        assert_eq!(roster.store().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_calls_leave_store_unchanged() {
        let mut roster = loaded().await;
        let before = roster.store().records().to_vec();
        let generation = roster.store().generation();
        roster.api().fail.store(true, Ordering::SeqCst);

        assert!(roster.create(&form("Cy", "85")).await.is_err());
        assert!(
            roster
                .update(&StudentId::new("1"), &form("Al", "10"))
                .await
                .is_err()
        );
        let err = roster.delete(&StudentId::new("2")).await.expect_err("fail");
        assert_eq!(err.to_string(), "Server exploded");
        assert!(roster.refresh().await.is_err());

        assert_eq!(roster.store().records(), before.as_slice());
        assert_eq!(roster.store().generation(), generation);
    }

    #[tokio::test]
    async fn test_update_recomputes_grade() {
        let mut roster = loaded().await;
        let updated = roster
            .update(&StudentId::new("2"), &form("Bo", "45"))
            .await
            .expect("update");
        assert_eq!(updated.grade(), Grade::F);
        assert_eq!(updated.batch_year(), "2023-2027");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found_without_backend_call() {
        let mut roster = loaded().await;
        let calls = roster.api().calls.load(Ordering::SeqCst);
        let ghost = StudentId::new("ghost");

        assert!(matches!(
            roster.update(&ghost, &form("Gi", "50")).await,
            Err(AppError::Core(RosterError::NotFound(_)))
        ));
        assert!(matches!(
            roster.delete(&ghost).await,
            Err(AppError::Core(RosterError::NotFound(_)))
        ));
        assert_eq!(roster.api().calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let mut roster = loaded().await;
        let removed = roster.delete(&StudentId::new("1")).await.expect("delete");
        assert_eq!(removed.name(), "Al");
        assert!(!roster.store().contains(&StudentId::new("1")));
    }

    #[tokio::test]
    async fn test_dropped_call_leaves_store_unchanged() {
        let mut roster = loaded().await;
        let generation = roster.store().generation();
        let cy = form("Cy", "85");
        let pending = roster.create(&cy);
        drop(pending);
        assert_eq!(roster.store().len(), 2);
        assert_eq!(roster.store().generation(), generation);
    }

    #[tokio::test]
    async fn test_fetch_does_not_touch_store() {
        let roster = loaded().await;
        let student = roster.fetch(&StudentId::new("2")).await.expect("fetch");
        assert_eq!(student.total_marks(), 70);
        assert!(roster.fetch(&StudentId::new("zz")).await.is_err());
    }
}
