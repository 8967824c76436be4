//! New Todo Form Component
//!
//! Text input and add button; the input is cleared once the record exists.

use leptos::prelude::*;
use leptos::task::spawn_local;

use firetodo_core::CreateOutcome;

use crate::context::use_app_context;

#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let (new_text, set_new_text) = signal(String::new());

    let create_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(list) = ctx.list() else {
            return;
        };
        let text = new_text.get_untracked();
        spawn_local(async move {
            if let CreateOutcome::Created(_) = list.create(&text).await {
                set_new_text.set(String::new());
            }
        });
    };

    view! {
        <form id="todoForm" class="todo-form" on:submit=create_todo>
            <input
                type="text"
                id="todoInput"
                placeholder="Add a new task..."
                prop:value=move || new_text.get()
                on:input=move |ev| set_new_text.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
