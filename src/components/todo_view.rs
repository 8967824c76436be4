//! Todo View Component
//!
//! The todo page. Opens the session gate: no session sends the visitor to
//! the sign-in page, a session reveals the page and starts its list.

use leptos::prelude::*;
use reactive_stores::Store;

use firetodo_core::{ListSynchronizer, ListView, Session, SessionGate};

use crate::browser;
use crate::components::{NewTodoForm, TodoList, UserBar};
use crate::context::use_app_context;
use crate::store::{store_set_list, store_set_user, TodoPageState, TodoPageStateStoreFields};

#[component]
pub fn TodoView() -> impl IntoView {
    let ctx = use_app_context();
    let store = Store::new(TodoPageState::default());
    provide_context(store);

    let backend = ctx.backend();
    let documents = backend.store.clone();
    let gate = SessionGate::open(backend.identity, browser::navigator(), move |session: &Session| {
        store_set_user(&store, Some(session.display_name().to_string()));
        ListSynchronizer::start(
            session.id.clone(),
            documents.clone(),
            browser::confirm(),
            move |view: &ListView| store_set_list(&store, view),
        )
    });
    ctx.set_gate(gate);
    browser::on_page_lifecycle(
        move || {
            if let Some(gate) = ctx.gate() {
                gate.close();
            }
        },
        move || {
            if let Some(gate) = ctx.gate() {
                gate.reopen();
            }
        },
    );

    view! {
        <Show
            when=move || store.user_email().with(Option::is_some)
            fallback=|| view! { <div class="loading-state">"Checking session..."</div> }
        >
            <div class="container">
                <UserBar />
                <NewTodoForm />
                <TodoList />
            </div>
        </Show>
    }
}
