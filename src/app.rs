//! Firetodo Frontend App
//!
//! Picks the view for the current document: `login.html` gets the
//! credential form, everything else the todo page.

use leptos::prelude::*;

use firetodo_core::Page;

use crate::components::{AuthView, TodoView};
use crate::context::{AppContext, Backend};

#[component]
pub fn App(backend: Backend, page: Page) -> impl IntoView {
    provide_context(AppContext::new(backend));
    log::debug!("mounting {}", page.path());

    match page {
        Page::SignIn => view! { <AuthView /> }.into_any(),
        Page::Todos => view! { <TodoView /> }.into_any(),
    }
}

/// Shown instead of the app when Firebase cannot be set up
#[component]
pub fn StartupError(message: String) -> impl IntoView {
    view! {
        <div class="container">
            <div class="error-state">
                <strong>"Unable to start: "</strong>
                {message}
            </div>
        </div>
    }
}
