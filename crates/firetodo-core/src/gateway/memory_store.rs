//! In-Memory Document Store
//!
//! A `DocumentStore` backed by a `Vec`, with fault injection and optional
//! manual snapshot delivery. Test double for the Firestore gateway.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use async_trait::async_trait;

use super::traits::{Direction, DocumentStore, ErrorCallback, Snapshot, SnapshotCallback, Subscription, TodoQuery};
use crate::domain::{NewTodo, StoreError, StoreErrorKind, StoreResult, Todo, TodoId, TodoPatch};

/// Store operations that can be counted or failed on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    Update,
    Delete,
    Subscribe,
}

/// When listeners see changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Synchronously, before the mutating call returns
    #[default]
    Immediate,
    /// Only when `flush` is called
    Manual,
}

struct StoredTodo {
    seq: u64,
    todo: Todo,
}

struct Listener {
    id: u64,
    query: TodoQuery,
    on_snapshot: Rc<dyn Fn(Snapshot)>,
    on_error: Rc<dyn Fn(StoreError)>,
}

#[derive(Default)]
struct StoreState {
    docs: Vec<StoredTodo>,
    next_seq: u64,
    listeners: Vec<Listener>,
    next_listener: u64,
    delivery: Delivery,
    failures: Vec<(StoreOp, StoreError)>,
    subscribe_failure: Option<StoreError>,
    pending_errors: Vec<(Rc<dyn Fn(StoreError)>, StoreError)>,
    calls: HashMap<StoreOp, usize>,
}

impl StoreState {
    fn record(&mut self, op: StoreOp) -> StoreResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.failures.iter().position(|(failing, _)| *failing == op) {
            Some(index) => Err(self.failures.remove(index).1),
            None => Ok(()),
        }
    }

    fn snapshot_for(&self, query: &TodoQuery) -> Snapshot {
        let mut matching: Vec<&StoredTodo> = self.docs.iter().filter(|d| query.matches(&d.todo)).collect();
        matching.sort_by(|a, b| {
            query.compare(&a.todo, &b.todo).then_with(|| match query.direction {
                Direction::Ascending => a.seq.cmp(&b.seq),
                Direction::Descending => b.seq.cmp(&a.seq),
            })
        });
        Snapshot::new(matching.into_iter().map(|d| d.todo.clone()).collect())
    }

    fn deliveries(&self) -> Vec<(Rc<dyn Fn(Snapshot)>, Snapshot)> {
        self.listeners
            .iter()
            .map(|l| (l.on_snapshot.clone(), self.snapshot_for(&l.query)))
            .collect()
    }
}

/// Shared, cloneable in-memory store
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delivery(delivery: Delivery) -> Self {
        let store = Self::default();
        store.state.borrow_mut().delivery = delivery;
        store
    }

    /// Fail the next call of `op` with `err`
    pub fn fail_next(&self, op: StoreOp, err: StoreError) {
        self.state.borrow_mut().failures.push((op, err));
    }

    /// Every new subscription reports `err` instead of snapshots
    pub fn fail_subscriptions(&self, err: StoreError) {
        self.state.borrow_mut().subscribe_failure = Some(err);
    }

    /// Break every open subscription with `err`
    pub fn break_subscriptions(&self, err: StoreError) {
        let broken: Vec<Rc<dyn Fn(StoreError)>> = {
            let mut state = self.state.borrow_mut();
            state.listeners.drain(..).map(|l| l.on_error).collect()
        };
        for on_error in broken {
            on_error(err.clone());
        }
    }

    /// Deliver queued errors and the current snapshot to every listener
    pub fn flush(&self) {
        let (errors, deliveries) = {
            let mut state = self.state.borrow_mut();
            let errors: Vec<_> = state.pending_errors.drain(..).collect();
            (errors, state.deliveries())
        };
        for (on_error, err) in errors {
            on_error(err);
        }
        for (on_snapshot, snapshot) in deliveries {
            on_snapshot(snapshot);
        }
    }

    /// Seed a record without going through `create`
    pub fn insert(&self, new: NewTodo) -> TodoId {
        let id = self.push(new);
        self.notify();
        id
    }

    pub fn get(&self, id: &TodoId) -> Option<Todo> {
        self.state
            .borrow()
            .docs
            .iter()
            .find(|d| &d.todo.id == id)
            .map(|d| d.todo.clone())
    }

    /// All records regardless of owner, in insertion order
    pub fn todos(&self) -> Vec<Todo> {
        self.state.borrow().docs.iter().map(|d| d.todo.clone()).collect()
    }

    /// Current result of `query`, as a listener would see it
    pub fn query(&self, query: &TodoQuery) -> Snapshot {
        self.state.borrow().snapshot_for(query)
    }

    pub fn calls(&self, op: StoreOp) -> usize {
        self.state.borrow().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn push(&self, new: NewTodo) -> TodoId {
        let mut state = self.state.borrow_mut();
        state.next_seq += 1;
        let seq = state.next_seq;
        let id = TodoId::new(format!("todo-{seq}"));
        state.docs.push(StoredTodo {
            seq,
            todo: Todo::from_new(id.clone(), new),
        });
        id
    }

    fn notify(&self) {
        let deliveries = {
            let state = self.state.borrow();
            if state.delivery == Delivery::Manual {
                return;
            }
            state.deliveries()
        };
        for (on_snapshot, snapshot) in deliveries {
            on_snapshot(snapshot);
        }
    }

    fn remove_listener(state: &Weak<RefCell<StoreState>>, id: u64) {
        if let Some(state) = state.upgrade() {
            state.borrow_mut().listeners.retain(|l| l.id != id);
            log::debug!("memory store listener {id} removed");
        }
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    async fn create(&self, todo: &NewTodo) -> StoreResult<TodoId> {
        self.state.borrow_mut().record(StoreOp::Create)?;
        let id = self.push(todo.clone());
        self.notify();
        Ok(id)
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> StoreResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.record(StoreOp::Update)?;
            let doc = state.docs.iter_mut().find(|d| &d.todo.id == id).ok_or_else(|| {
                StoreError::new(StoreErrorKind::NotFound, format!("No document to update: {id}"))
            })?;
            doc.todo.apply(patch);
        }
        self.notify();
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> StoreResult<()> {
        {
            let mut state = self.state.borrow_mut();
            state.record(StoreOp::Delete)?;
            state.docs.retain(|d| &d.todo.id != id);
        }
        self.notify();
        Ok(())
    }

    fn subscribe(&self, query: &TodoQuery, on_snapshot: SnapshotCallback, on_error: ErrorCallback) -> Subscription {
        let on_snapshot: Rc<dyn Fn(Snapshot)> = Rc::from(on_snapshot);
        let on_error: Rc<dyn Fn(StoreError)> = Rc::from(on_error);

        let (id, delivery, failure) = {
            let mut state = self.state.borrow_mut();
            let failure = state.record(StoreOp::Subscribe).err().or_else(|| state.subscribe_failure.clone());
            state.next_listener += 1;
            let id = state.next_listener;
            if failure.is_none() {
                state.listeners.push(Listener {
                    id,
                    query: query.clone(),
                    on_snapshot: on_snapshot.clone(),
                    on_error: on_error.clone(),
                });
            }
            (id, state.delivery, failure)
        };

        match (failure, delivery) {
            (Some(err), Delivery::Immediate) => on_error(err),
            (Some(err), Delivery::Manual) => self.state.borrow_mut().pending_errors.push((on_error, err)),
            (None, Delivery::Immediate) => {
                let snapshot = self.query(query);
                on_snapshot(snapshot);
            }
            (None, Delivery::Manual) => {}
        }

        let state = Rc::downgrade(&self.state);
        Subscription::new(move || Self::remove_listener(&state, id))
    }
}
