//! # Row Selection
//!
//! The set of rows ticked in the table, used to narrow an export.

use crate::{Student, StudentId};

/// Selected student identifiers, in the order they were ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<StudentId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select exactly these identifiers, ignoring repeats.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = StudentId>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Tick or untick one row.
    pub fn toggle(&mut self, id: &StudentId) {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id.clone());
        }
    }

    /// The header checkbox: clear when every row on the page is already
    /// selected, otherwise add the page's unselected rows.
    pub fn toggle_page(&mut self, page: &[&Student]) {
        if !page.is_empty() && page.iter().all(|s| self.contains(s.id())) {
            self.ids.clear();
            return;
        }
        for student in page {
            if !self.contains(student.id()) {
                self.ids.push(student.id().clone());
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: &StudentId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn ids(&self) -> &[StudentId] {
        &self.ids
    }
}
