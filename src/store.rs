//! Todo Page State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The list field
//! is replaced wholesale whenever the synchronizer reports a new view.

use leptos::prelude::*;
use reactive_stores::Store;

use firetodo_core::ListView;

#[derive(Clone, Debug, Default, Store)]
pub struct TodoPageState {
    /// Shown in the user bar once the session is known
    pub user_email: Option<String>,
    /// Latest view from the list synchronizer
    pub list: ListView,
}

pub type TodoStore = Store<TodoPageState>;

pub fn use_todo_store() -> TodoStore {
    expect_context::<TodoStore>()
}

pub fn store_set_list(store: &TodoStore, view: &ListView) {
    *store.list().write() = view.clone();
}

pub fn store_set_user(store: &TodoStore, email: Option<String>) {
    *store.user_email().write() = email;
}
