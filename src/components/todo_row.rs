//! Todo Row Component
//!
//! One record: completion checkbox, text and a delete button. Rows are keyed
//! on what they show, so a changed record gets a fresh row.

use leptos::prelude::*;
use leptos::task::spawn_local;

use firetodo_core::sync::TodoRow;

use crate::context::use_app_context;

#[component]
pub fn TodoRowItem(row: TodoRow) -> impl IntoView {
    let ctx = use_app_context();
    let id = row.todo.id.clone();
    let toggle_id = id.clone();

    let class = match (row.todo.completed, row.is_pending()) {
        (true, true) => "todo-item completed pending",
        (true, false) => "todo-item completed",
        (false, true) => "todo-item pending",
        (false, false) => "todo-item",
    };

    let on_toggle = move |ev: web_sys::Event| {
        let completed = event_target_checked(&ev);
        let Some(list) = ctx.list() else {
            return;
        };
        let id = toggle_id.clone();
        spawn_local(async move {
            // failures are reverted and reported through the list view
            let _ = list.toggle(&id, completed).await;
        });
    };

    let on_delete = move |_| {
        let Some(list) = ctx.list() else {
            return;
        };
        let id = id.clone();
        spawn_local(async move {
            list.delete(&id).await;
        });
    };

    view! {
        <div class=class>
            <input type="checkbox" class="checkbox" prop:checked=row.checked() on:change=on_toggle />
            <span class="text">{row.todo.text.clone()}</span>
            <div class="actions">
                <button class="delete-btn" on:click=on_delete>"Delete"</button>
            </div>
        </div>
    }
}
