//! Todo List Component
//!
//! Loading indicator, error indicator and the rows of the current view.

use leptos::prelude::*;

use firetodo_core::sync::{ErrorNotice, TodoRow};
use firetodo_core::ListView;

use crate::browser;
use crate::components::TodoRowItem;
use crate::store::{use_todo_store, TodoPageStateStoreFields};

#[component]
fn ErrorBanner(notice: ErrorNotice) -> impl IntoView {
    let reload = notice.offers_reload().then(|| {
        view! {
            " "
            <a
                href="#"
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.prevent_default();
                    browser::reload();
                }
            >
                "refresh the page"
            </a>
            " to try again."
        }
    });

    view! {
        <div id="errorState" class="error-state">
            {notice.message()}
            {reload}
        </div>
    }
}

#[component]
pub fn TodoList() -> impl IntoView {
    let store = use_todo_store();

    let rows = move || store.list().with(|view| view.rows.clone());
    let row_key = |row: &TodoRow| (row.todo.id.clone(), row.checked(), row.todo.completed, row.todo.text.clone());

    view! {
        <Show when=move || store.list().with(ListView::is_loading)>
            <div id="loadingState" class="loading-state">
                <span class="loading-spinner"></span>
                " Loading tasks..."
            </div>
        </Show>
        {move || store.list().with(|view| view.error.clone()).map(|notice| view! { <ErrorBanner notice /> })}
        <div id="todoList" class="todo-list">
            {move || {
                store.list().with(ListView::placeholder).map(|text| view! { <div class="todo-placeholder">{text}</div> })
            }}
            <For each=rows key=row_key children=|row: TodoRow| view! { <TodoRowItem row /> } />
        </div>
    }
}
