//! List Synchronizer Tests
//!
//! Drives `ListSynchronizer` against `MemoryStore`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{Duration, Utc};

use super::*;
use crate::domain::{NewTodo, OwnerId, StoreError, StoreErrorKind, TodoId};
use crate::gateway::{Delivery, DocumentStore, MemoryStore, StoreOp, TodoQuery};

struct Harness {
    store: MemoryStore,
    list: ListSynchronizer,
    views: Rc<RefCell<Vec<ListView>>>,
    answer: Rc<Cell<bool>>,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    fn start(store: &MemoryStore, owner: &str) -> Self {
        let views: Rc<RefCell<Vec<ListView>>> = Rc::default();
        let answer = Rc::new(Cell::new(true));
        let prompts: Rc<RefCell<Vec<String>>> = Rc::default();

        let sink = views.clone();
        let reply = answer.clone();
        let asked = prompts.clone();
        let list = ListSynchronizer::start(
            owner_id(owner),
            Rc::new(store.clone()),
            Rc::new(move |message: &str| {
                asked.borrow_mut().push(message.to_string());
                reply.get()
            }),
            move |view: &ListView| sink.borrow_mut().push(view.clone()),
        );
        Self {
            store: store.clone(),
            list,
            views,
            answer,
            prompts,
        }
    }

    fn last(&self) -> ListView {
        self.views.borrow().last().cloned().expect("observer was never called")
    }

    fn texts(&self) -> Vec<String> {
        self.last().rows.iter().map(|r| r.todo.text.clone()).collect()
    }
}

fn owner_id(id: &str) -> OwnerId {
    OwnerId::parse(id).unwrap()
}

fn seed(store: &MemoryStore, text: &str, owner: &str, age_secs: i64) -> TodoId {
    store.insert(NewTodo::from_input(text, owner_id(owner), Utc::now() - Duration::seconds(age_secs)).unwrap())
}

#[tokio::test]
async fn test_starts_loading_until_first_snapshot() {
    let store = MemoryStore::with_delivery(Delivery::Manual);
    let h = Harness::start(&store, "u1");

    assert!(h.last().is_loading());
    assert_eq!(store.listener_count(), 1);

    store.flush();
    let view = h.last();
    assert_eq!(view.status, ListStatus::Empty);
    assert!(view.rows.is_empty());
    assert_eq!(view.placeholder(), Some(EMPTY_PLACEHOLDER));
}

#[tokio::test]
async fn test_renders_only_owner_records_newest_first() {
    let store = MemoryStore::new();
    seed(&store, "oldest", "u1", 300);
    seed(&store, "not mine", "u2", 200);
    seed(&store, "newest", "u1", 100);

    let h = Harness::start(&store, "u1");
    assert_eq!(h.last().status, ListStatus::Rendered);
    assert_eq!(h.texts(), vec!["newest", "oldest"]);
    assert_eq!(h.last().placeholder(), None);
}

#[tokio::test]
async fn test_create_adds_one_record_for_owner() {
    let store = MemoryStore::new();
    let h = Harness::start(&store, "u1");

    let outcome = h.list.create("Buy milk").await;
    let CreateOutcome::Created(id) = outcome else {
        panic!("expected Created, got {outcome:?}");
    };

    let todos = store.todos();
    assert_eq!(todos.len(), 1);
    let todo = store.get(&id).unwrap();
    assert_eq!(todo.text, "Buy milk");
    assert!(!todo.completed);
    assert_eq!(todo.owner_id, owner_id("u1"));
    assert_eq!(h.texts(), vec!["Buy milk"]);
}

#[tokio::test]
async fn test_blank_create_makes_no_call() {
    let store = MemoryStore::new();
    let h = Harness::start(&store, "u1");
    let notifications = h.views.borrow().len();

    assert_eq!(h.list.create("  ").await, CreateOutcome::Skipped);
    assert_eq!(h.list.create("").await, CreateOutcome::Skipped);
    assert_eq!(store.calls(StoreOp::Create), 0);
    assert_eq!(h.views.borrow().len(), notifications);
}

#[tokio::test]
async fn test_create_failure_shows_error() {
    let store = MemoryStore::new();
    let h = Harness::start(&store, "u1");
    store.fail_next(StoreOp::Create, StoreError::new(StoreErrorKind::Unavailable, "offline"));

    let outcome = h.list.create("Buy milk").await;
    assert!(matches!(outcome, CreateOutcome::Failed(_)));
    assert_eq!(h.last().error, Some(ErrorNotice::Mutation(CREATE_FAILED_MESSAGE)));
    assert!(store.todos().is_empty());
}

#[tokio::test]
async fn test_create_clears_previous_error() {
    let store = MemoryStore::with_delivery(Delivery::Manual);
    let h = Harness::start(&store, "u1");
    store.flush();
    store.fail_next(StoreOp::Create, StoreError::new(StoreErrorKind::Unavailable, "offline"));
    h.list.create("first try").await;
    assert!(h.last().error.is_some());

    h.list.create("second try").await;
    assert_eq!(h.last().error, None);
}

#[tokio::test]
async fn test_toggle_shows_pending_until_snapshot() {
    let store = MemoryStore::with_delivery(Delivery::Manual);
    let id = seed(&store, "walk dog", "u1", 0);
    let h = Harness::start(&store, "u1");
    store.flush();

    h.list.toggle(&id, true).await.unwrap();
    let row = h.last().row(&id).cloned().unwrap();
    assert!(row.checked());
    assert!(row.is_pending());
    assert!(!row.todo.completed);

    store.flush();
    let row = h.last().row(&id).cloned().unwrap();
    assert!(row.checked());
    assert!(!row.is_pending());
    assert!(row.todo.completed);
}

#[tokio::test]
async fn test_toggle_failure_reverts_checkbox() {
    let store = MemoryStore::new();
    let id = seed(&store, "walk dog", "u1", 0);
    let h = Harness::start(&store, "u1");
    store.fail_next(StoreOp::Update, StoreError::new(StoreErrorKind::PermissionDenied, "denied"));

    let result = h.list.toggle(&id, true).await;
    assert!(result.is_err());

    let view = h.last();
    let row = view.row(&id).unwrap();
    assert!(!row.checked());
    assert!(!row.is_pending());
    assert!(!row.todo.completed);
    assert_eq!(view.error, Some(ErrorNotice::Mutation(UPDATE_FAILED_MESSAGE)));
    assert!(!store.get(&id).unwrap().completed);
}

#[tokio::test]
async fn test_delete_declined_makes_no_call() {
    let store = MemoryStore::new();
    let id = seed(&store, "keep me", "u1", 0);
    let h = Harness::start(&store, "u1");
    h.answer.set(false);

    assert_eq!(h.list.delete(&id).await, DeleteOutcome::Declined);
    assert_eq!(store.calls(StoreOp::Delete), 0);
    assert_eq!(h.texts(), vec!["keep me"]);
    assert_eq!(*h.prompts.borrow(), vec![DELETE_PROMPT.to_string()]);
}

#[tokio::test]
async fn test_delete_confirmed_removes_row_via_snapshot() {
    let store = MemoryStore::new();
    let id = seed(&store, "drop me", "u1", 0);
    let h = Harness::start(&store, "u1");

    assert_eq!(h.list.delete(&id).await, DeleteOutcome::Deleted);
    assert_eq!(h.last().status, ListStatus::Empty);
    assert!(store.get(&id).is_none());
}

#[tokio::test]
async fn test_delete_failure_keeps_row() {
    let store = MemoryStore::new();
    let id = seed(&store, "sticky", "u1", 0);
    let h = Harness::start(&store, "u1");
    store.fail_next(StoreOp::Delete, StoreError::new(StoreErrorKind::Unavailable, "offline"));

    assert!(matches!(h.list.delete(&id).await, DeleteOutcome::Failed(_)));
    assert_eq!(h.texts(), vec!["sticky"]);
    assert_eq!(h.last().error, Some(ErrorNotice::Mutation(DELETE_FAILED_MESSAGE)));
}

#[tokio::test]
async fn test_index_error_is_distinct_from_generic() {
    let index_store = MemoryStore::new();
    index_store.fail_subscriptions(StoreError::new(
        StoreErrorKind::FailedPrecondition,
        "The query requires an index.",
    ));
    let index = Harness::start(&index_store, "u1").last();

    let generic_store = MemoryStore::new();
    generic_store.fail_subscriptions(StoreError::new(StoreErrorKind::PermissionDenied, "denied"));
    let generic = Harness::start(&generic_store, "u1").last();

    assert_eq!(index.status, ListStatus::Failed(LoadFailure::IndexBuilding));
    assert_eq!(generic.status, ListStatus::Failed(LoadFailure::Generic));
    assert!(!index.is_loading());
    assert!(!generic.is_loading());

    let index_notice = index.error.unwrap();
    let generic_notice = generic.error.unwrap();
    assert_ne!(index_notice.message(), generic_notice.message());
    assert!(index_notice.offers_reload());
    assert!(!generic_notice.offers_reload());
}

#[tokio::test]
async fn test_error_after_render_keeps_stale_rows() {
    let store = MemoryStore::new();
    seed(&store, "stale but visible", "u1", 0);
    let h = Harness::start(&store, "u1");

    store.break_subscriptions(StoreError::new(StoreErrorKind::Unavailable, "connection lost"));
    let view = h.last();
    assert_eq!(view.status, ListStatus::Failed(LoadFailure::Generic));
    assert_eq!(view.rows.len(), 1);
}

#[tokio::test]
async fn test_stop_is_idempotent_and_silences_updates() {
    let store = MemoryStore::new();
    let h = Harness::start(&store, "u1");
    let id = seed(&store, "before stop", "u1", 0);

    h.list.stop();
    h.list.stop();
    assert!(!h.list.is_running());
    assert_eq!(store.listener_count(), 0);

    let notifications = h.views.borrow().len();
    seed(&store, "after stop", "u1", 0);
    h.list.toggle(&id, true).await.unwrap();
    assert_eq!(h.views.borrow().len(), notifications);
    assert!(store.get(&id).unwrap().completed);
}

#[tokio::test]
async fn test_dropping_last_handle_unsubscribes() {
    let store = MemoryStore::new();
    let h = Harness::start(&store, "u1");
    let Harness { list, .. } = h;
    drop(list);
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn test_view_matches_store_after_mixed_commands() {
    let store = MemoryStore::new();
    seed(&store, "someone else's", "u2", 50);
    let h = Harness::start(&store, "u1");

    let mut ids = Vec::new();
    for text in ["one", "two", "three", "four"] {
        if let CreateOutcome::Created(id) = h.list.create(text).await {
            ids.push(id);
        }
    }
    h.list.toggle(&ids[0], true).await.unwrap();
    h.list.toggle(&ids[2], true).await.unwrap();
    h.list.toggle(&ids[2], false).await.unwrap();
    h.list.delete(&ids[1]).await;
    h.store.create(&NewTodo::from_input("intruder", owner_id("u2"), Utc::now()).unwrap()).await.unwrap();

    let expected = store.query(&TodoQuery::owned_by(owner_id("u1")));
    let rendered: Vec<_> = h.last().rows.into_iter().map(|r| r.todo).collect();
    assert_eq!(rendered, expected.todos);
    assert_eq!(h.texts(), vec!["four", "three", "one"]);
    assert!(h.last().rows.iter().all(|r| !r.is_pending()));
}
