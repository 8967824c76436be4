//! User Bar Component
//!
//! Signed-in user's email and the logout button.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::store::{use_todo_store, TodoPageStateStoreFields};

#[component]
pub fn UserBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_todo_store();

    let logout = move |_| {
        let Some(gate) = ctx.gate() else {
            return;
        };
        spawn_local(async move {
            // a failed sign-out is logged by the gate and leaves the page as is
            let _ = gate.sign_out().await;
        });
    };

    view! {
        <div class="user-bar">
            <span id="userEmail">{move || store.user_email().get().unwrap_or_default()}</span>
            <button id="logoutBtn" class="logout-btn" on:click=logout>
                "Logout"
            </button>
        </div>
    }
}
