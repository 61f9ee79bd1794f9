//! # Record Store
//!
//! The client-side mirror of every student record the server knows about.
//!
//! - Sole owner of the in-memory collection; nothing else mutates it
//! - Every record passes through the Grade Engine on the way in
//! - Mutations are applied only after the collaborator confirmed them, so a
//!   failed call never reaches the store
//! - Each committed mutation bumps [`RecordStore::generation`], which readers
//!   can compare to decide whether to re-query
//!
//! Failed operations leave the collection untouched.

use crate::{RosterError, Student, StudentId, StudentRecord};
use std::collections::BTreeSet;

/// In-memory collection of annotated student records, in server order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Student>,
    generation: u64,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection after a full fetch.
    ///
    /// All-or-nothing: an invalid record or a repeated identifier fails the
    /// load and keeps the previous collection.
    pub fn load(&mut self, incoming: Vec<StudentRecord>) -> Result<usize, RosterError> {
        let mut seen = BTreeSet::new();
        let mut records = Vec::with_capacity(incoming.len());

        for record in incoming {
            if !seen.insert(record.id.clone()) {
                return Err(RosterError::Conflict(record.id));
            }
            records.push(Student::from_record(record)?);
        }

        let count = records.len();
        self.records = records;
        self.bump();
        Ok(count)
    }

    /// Append a newly created record.
    pub fn add(&mut self, record: StudentRecord) -> Result<&Student, RosterError> {
        if self.position(&record.id).is_some() {
            return Err(RosterError::Conflict(record.id));
        }
        let student = Student::from_record(record)?;
        self.records.push(student);
        self.bump();

        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    /// Replace the record stored under `id`, keeping its position.
    ///
    /// The replacement must carry the same identifier.
    pub fn replace(
        &mut self,
        id: &StudentId,
        record: StudentRecord,
    ) -> Result<&Student, RosterError> {
        let index = self
            .position(id)
            .ok_or_else(|| RosterError::NotFound(id.clone()))?;
        if &record.id != id {
            return Err(RosterError::InvalidRecord(format!(
                "replacement for {} carries identifier {}",
                id, record.id
            )));
        }
        let student = Student::from_record(record)?;
        self.records[index] = student;
        self.bump();
        Ok(&self.records[index])
    }

    /// Delete the record stored under `id` and hand it back.
    pub fn remove(&mut self, id: &StudentId) -> Result<Student, RosterError> {
        let index = self
            .position(id)
            .ok_or_else(|| RosterError::NotFound(id.clone()))?;
        let removed = self.records.remove(index);
        self.bump();
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: &StudentId) -> Option<&Student> {
        self.records.iter().find(|s| s.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &StudentId) -> bool {
        self.position(id).is_some()
    }

    /// Current snapshot, in server order.
    #[must_use]
    pub fn records(&self) -> &[Student] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of mutations committed so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn position(&self, id: &StudentId) -> Option<usize> {
        self.records.iter().position(|s| s.id() == id)
    }

    fn bump(&mut self) {
        self.generation = self.generation.saturating_add(1);
    }
}

// =============================================================================
// TESTS
// =============================================================================
