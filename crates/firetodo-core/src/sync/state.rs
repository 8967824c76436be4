//! List View State
//!
//! Plain data describing what the todo list shows. Rebuilt from every
//! snapshot; the only local addition is the pending checkbox value of a row
//! whose toggle has not been confirmed yet.

use crate::domain::{StoreError, Todo, TodoId};
use crate::gateway::Snapshot;

pub const EMPTY_PLACEHOLDER: &str = "No tasks yet. Add your first task above!";
pub const INDEX_BUILDING_MESSAGE: &str = "Setting up the database... This might take a few minutes.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load tasks. Please refresh the page.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update task. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete task. Please try again.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to add task. Please try again.";

/// Why the subscription stopped delivering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailure {
    /// Composite index still being built; wait and reload
    IndexBuilding,
    Generic,
}

impl LoadFailure {
    pub fn classify(err: &StoreError) -> Self {
        if err.is_index_provisioning() {
            LoadFailure::IndexBuilding
        } else {
            LoadFailure::Generic
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoadFailure::IndexBuilding => INDEX_BUILDING_MESSAGE,
            LoadFailure::Generic => LOAD_FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListStatus {
    /// Waiting for the first snapshot
    #[default]
    Loading,
    /// Last snapshot had no records
    Empty,
    /// Last snapshot had records
    Rendered,
    Failed(LoadFailure),
}

/// Contents of the error indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorNotice {
    Load(LoadFailure),
    Mutation(&'static str),
}

impl ErrorNotice {
    pub fn message(&self) -> &'static str {
        match self {
            ErrorNotice::Load(failure) => failure.message(),
            ErrorNotice::Mutation(message) => message,
        }
    }

    /// Show a reload link after the message
    pub fn offers_reload(&self) -> bool {
        matches!(self, ErrorNotice::Load(LoadFailure::IndexBuilding))
    }
}

/// One rendered record
#[derive(Debug, Clone, PartialEq)]
pub struct TodoRow {
    pub todo: Todo,
    /// Checkbox value of an unconfirmed toggle
    pub pending: Option<bool>,
}

impl TodoRow {
    fn confirmed(todo: Todo) -> Self {
        Self { todo, pending: None }
    }

    /// Value the checkbox shows
    pub fn checked(&self) -> bool {
        self.pending.unwrap_or(self.todo.completed)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    pub status: ListStatus,
    pub rows: Vec<TodoRow>,
    pub error: Option<ErrorNotice>,
}

impl ListView {
    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    /// The single placeholder row shown for an empty list
    pub fn placeholder(&self) -> Option<&'static str> {
        (self.status == ListStatus::Empty).then_some(EMPTY_PLACEHOLDER)
    }

    pub fn row(&self, id: &TodoId) -> Option<&TodoRow> {
        self.rows.iter().find(|r| &r.todo.id == id)
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.error = None;
        self.status = if snapshot.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Rendered
        };
        self.rows = snapshot.todos.into_iter().map(TodoRow::confirmed).collect();
    }

    pub(crate) fn apply_failure(&mut self, failure: LoadFailure) {
        self.status = ListStatus::Failed(failure);
        self.error = Some(ErrorNotice::Load(failure));
    }

    /// Mark a row as optimistically toggled; returns the value shown before
    pub(crate) fn begin_toggle(&mut self, id: &TodoId, completed: bool) -> Option<bool> {
        let row = self.rows.iter_mut().find(|r| &r.todo.id == id)?;
        let previous = row.checked();
        row.pending = Some(completed);
        Some(previous)
    }

    /// Put the checkbox back to what it showed before the toggle
    pub(crate) fn revert_toggle(&mut self, id: &TodoId, previous: bool) {
        if let Some(row) = self.rows.iter_mut().find(|r| &r.todo.id == id) {
            row.pending = (previous != row.todo.completed).then_some(previous);
        }
    }

    pub(crate) fn show_error(&mut self, message: &'static str) {
        self.error = Some(ErrorNotice::Mutation(message));
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}
