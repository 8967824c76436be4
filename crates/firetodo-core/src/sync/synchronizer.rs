//! List Synchronizer
//!
//! Owns one live, owner-scoped subscription and turns user intent into store
//! mutations. The subscription is the only source of re-render truth: commands
//! never edit rows directly, except for the pending checkbox value of a toggle
//! and its revert on failure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use log::{debug, error, info};

use super::state::{
    ListView, LoadFailure, CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
use crate::domain::{NewTodo, OwnerId, StoreError, StoreResult, TodoId, TodoPatch};
use crate::gateway::{DocumentStore, Snapshot, Subscription, TodoQuery};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// Blocking yes/no question shown before destructive commands
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Receives a copy of the view after every change
pub type ListObserver = Box<dyn Fn(&ListView)>;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Blank input, nothing sent
    Skipped,
    Created(TodoId),
    Failed(StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed(StoreError),
}

struct Shared {
    owner: OwnerId,
    store: Rc<dyn DocumentStore>,
    confirm: Rc<dyn Confirm>,
    observer: ListObserver,
    view: RefCell<ListView>,
    subscription: RefCell<Option<Subscription>>,
    stopped: Cell<bool>,
}

impl Shared {
    /// Change the view and notify the observer. Ignored once stopped.
    fn update<R>(&self, change: impl FnOnce(&mut ListView) -> R) -> Option<R> {
        if self.stopped.get() {
            return None;
        }
        let (result, view) = {
            let mut view = self.view.borrow_mut();
            let result = change(&mut view);
            (result, view.clone())
        };
        (self.observer)(&view);
        Some(result)
    }
}

/// Handle to a running list; clones share the same subscription
#[derive(Clone)]
pub struct ListSynchronizer {
    shared: Rc<Shared>,
}

impl ListSynchronizer {
    /// Show the loading state and open the owner's subscription
    pub fn start(
        owner: OwnerId,
        store: Rc<dyn DocumentStore>,
        confirm: Rc<dyn Confirm>,
        observer: impl Fn(&ListView) + 'static,
    ) -> Self {
        let shared = Rc::new(Shared {
            owner,
            store,
            confirm,
            observer: Box::new(observer),
            view: RefCell::new(ListView::default()),
            subscription: RefCell::new(None),
            stopped: Cell::new(false),
        });
        (shared.observer)(&ListView::default());

        let query = TodoQuery::owned_by(shared.owner.clone());
        info!("opening todo subscription for {}", shared.owner);

        let weak = Rc::downgrade(&shared);
        let on_snapshot = Box::new(move |snapshot: Snapshot| {
            if let Some(shared) = weak.upgrade() {
                debug!("snapshot with {} todos", snapshot.len());
                shared.update(|view| view.apply_snapshot(snapshot));
            }
        });
        let weak = Rc::downgrade(&shared);
        let on_error = Box::new(move |err: StoreError| {
            if let Some(shared) = weak.upgrade() {
                error!("todo subscription failed: {err}");
                shared.update(|view| view.apply_failure(LoadFailure::classify(&err)));
            }
        });

        let subscription = shared.store.subscribe(&query, on_snapshot, on_error);
        *shared.subscription.borrow_mut() = Some(subscription);
        Self { shared }
    }

    pub fn owner(&self) -> &OwnerId {
        &self.shared.owner
    }

    /// Latest view
    pub fn view(&self) -> ListView {
        self.shared.view.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.shared.stopped.get()
    }

    /// Release the subscription. Safe to call more than once.
    pub fn stop(&self) {
        if self.shared.stopped.replace(true) {
            return;
        }
        let subscription = self.shared.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        info!("closed todo subscription for {}", self.shared.owner);
    }

    /// Set a record's completion; the checkbox shows `completed` until the
    /// next snapshot, or goes back to its previous value if the store refuses.
    pub async fn toggle(&self, id: &TodoId, completed: bool) -> StoreResult<()> {
        let previous = self.shared.update(|view| view.begin_toggle(id, completed)).flatten();

        let result = self.shared.store.update(id, &TodoPatch::completed(completed)).await;
        if let Err(err) = &result {
            error!("failed to update todo {id}: {err}");
            self.shared.update(|view| {
                if let Some(previous) = previous {
                    view.revert_toggle(id, previous);
                }
                view.show_error(UPDATE_FAILED_MESSAGE);
            });
        }
        result
    }

    /// Ask for confirmation, then delete. The row stays until a snapshot
    /// without it arrives.
    pub async fn delete(&self, id: &TodoId) -> DeleteOutcome {
        if !self.shared.confirm.confirm(DELETE_PROMPT) {
            debug!("delete of {id} declined");
            return DeleteOutcome::Declined;
        }
        match self.shared.store.delete(id).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(err) => {
                error!("failed to delete todo {id}: {err}");
                self.shared.update(|view| view.show_error(DELETE_FAILED_MESSAGE));
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Create a record from raw input. Blank input is ignored silently.
    pub async fn create(&self, raw: &str) -> CreateOutcome {
        let Some(new) = NewTodo::from_input(raw, self.shared.owner.clone(), Utc::now()) else {
            return CreateOutcome::Skipped;
        };
        self.shared.update(ListView::clear_error);

        match self.shared.store.create(&new).await {
            Ok(id) => {
                info!("created todo {id}");
                CreateOutcome::Created(id)
            }
            Err(err) => {
                error!("failed to add todo: {err}");
                self.shared.update(|view| view.show_error(CREATE_FAILED_MESSAGE));
                CreateOutcome::Failed(err)
            }
        }
    }
}
