//! Live todo list
//!
//! `ListSynchronizer` keeps a `ListView` in step with the owner's records.

mod state;
mod synchronizer;

#[cfg(test)]
mod tests;

pub use state::{
    ErrorNotice, ListStatus, ListView, LoadFailure, TodoRow, CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE,
    EMPTY_PLACEHOLDER, INDEX_BUILDING_MESSAGE, LOAD_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
pub use synchronizer::{Confirm, CreateOutcome, DeleteOutcome, ListObserver, ListSynchronizer, DELETE_PROMPT};
