//! Gateway Layer - Core Traits
//!
//! Abstract interfaces to the hosted identity provider and document store.
//! Implementations can use Firebase, in-memory state, etc.
//!
//! Everything runs on one thread, so the traits are `?Send` and callbacks are
//! plain `Fn` boxes.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;

use crate::domain::{AuthResult, NewTodo, OwnerId, Session, StoreError, StoreResult, Todo, TodoId, TodoPatch};

/// Called with the current session (or `None`) immediately and on every change
pub type SessionCallback = Box<dyn Fn(Option<Session>)>;
/// Called with every snapshot of a subscribed query
pub type SnapshotCallback = Box<dyn Fn(Snapshot)>;
/// Called when a subscription fails; no further snapshots follow
pub type ErrorCallback = Box<dyn Fn(StoreError)>;

/// Handle to a live listener.
///
/// `unsubscribe` may be called any number of times; only the first call reaches
/// the gateway. Dropping the handle unsubscribes as well.
pub struct Subscription {
    cancel: Cell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Cell::new(Some(Box::new(cancel))),
        }
    }

    /// A handle with nothing to release
    pub fn noop() -> Self {
        Self { cancel: Cell::new(None) }
    }

    pub fn unsubscribe(&self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        // Cell<Option<Box<_>>> has no peek; take and put back
        let cancel = self.cancel.take();
        let active = cancel.is_some();
        self.cancel.set(cancel);
        active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

/// Ordered, complete result set delivered by a subscription
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub todos: Vec<Todo>,
}

impl Snapshot {
    pub fn new(todos: Vec<Todo>) -> Self {
        Self { todos }
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }
}

/// Owner-filtered query ordered by creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    pub owner_id: OwnerId,
    pub direction: Direction,
}

impl TodoQuery {
    /// Records of `owner_id`, newest first
    pub fn owned_by(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            direction: Direction::Descending,
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        todo.owner_id == self.owner_id
    }

    /// Compare two matching records by the query order
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        let ord = a.created_at.cmp(&b.created_at);
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Identity provider capability
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Create an account; the new account is signed in on success
    async fn register_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResult<Session>;

    async fn sign_out(&self) -> AuthResult<()>;

    /// Observe the current session; fires immediately, then on every change
    fn on_session_change(&self, callback: SessionCallback) -> Subscription;
}

/// Document store capability, bound to one record collection
#[async_trait(?Send)]
pub trait DocumentStore {
    async fn create(&self, todo: &NewTodo) -> StoreResult<TodoId>;

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> StoreResult<()>;

    async fn delete(&self, id: &TodoId) -> StoreResult<()>;

    /// Open a live query. Snapshots arrive in the order the store decides.
    fn subscribe(
        &self,
        query: &TodoQuery,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription;
}
