//! Auth View Component
//!
//! Login / register form of the sign-in page. One form, two modes; a
//! visitor who already has a session is sent on to the todo page.

use gloo_timers::future::sleep;
use leptos::prelude::*;
use leptos::task::spawn_local;

use firetodo_core::credentials::{MESSAGE_TIMEOUT, REDIRECT_DELAY};
use firetodo_core::{AuthMode, CredentialForm, FormMessage, SubmitOutcome};

use crate::browser;
use crate::context::use_app_context;

#[component]
pub fn AuthView() -> impl IntoView {
    let ctx = use_app_context();
    let form = StoredValue::new_local(CredentialForm::new(ctx.backend().identity, browser::navigator()));
    // Dropped with the view, which unsubscribes
    let _watch = StoredValue::new_local(form.with_value(|form| form.watch_session()));

    let (mode, set_mode) = signal(AuthMode::default());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (busy, set_busy) = signal(false);
    let (message, set_message) = signal::<Option<FormMessage>>(None);
    // Bumped per message so an older hide timer leaves a newer message alone
    let generation = StoredValue::new(0u32);

    let show_message = move |msg: FormMessage| {
        generation.update_value(|g| *g += 1);
        let shown = generation.get_value();
        set_message.set(Some(msg));
        spawn_local(async move {
            sleep(MESSAGE_TIMEOUT).await;
            if generation.get_value() == shown {
                set_message.set(None);
            }
        });
    };

    let switch_mode = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        set_mode.update(|m| *m = m.toggled());
        set_email.set(String::new());
        set_password.set(String::new());
        set_message.set(None);
        set_busy.set(false);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let current = mode.get_untracked();
        let email = email.get_untracked();
        let password = password.get_untracked();
        let form = form.get_value();

        set_busy.set(true);
        set_message.set(None);
        spawn_local(async move {
            let outcome = form.submit(current, &email, &password).await;
            if let Some(msg) = outcome.message() {
                show_message(msg);
            }
            match outcome {
                SubmitOutcome::Registered(_) => {
                    sleep(REDIRECT_DELAY).await;
                    form.finish_registration();
                }
                SubmitOutcome::SignedIn(_) => {}
                SubmitOutcome::Rejected(_) | SubmitOutcome::Failed(_) => set_busy.set(false),
            }
        });
    };

    view! {
        <div class="auth-container">
            <h1 id="authTitle">{move || mode.get().title()}</h1>
            <form id="authForm" class="auth-form" on:submit=on_submit>
                <input
                    type="email"
                    id="email"
                    placeholder="Email"
                    required
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    id="password"
                    placeholder="Password"
                    required
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" id="submitBtn" disabled=move || busy.get()>
                    {move || {
                        let mode = mode.get();
                        if busy.get() { mode.busy_label() } else { mode.title() }
                    }}
                </button>
            </form>
            <Show when=move || message.with(Option::is_some)>
                <div
                    id="error"
                    class=move || message.with(|m| m.as_ref().map(|m| m.tone.class()).unwrap_or_default())
                >
                    {move || message.with(|m| m.as_ref().map(|m| m.text.clone()).unwrap_or_default())}
                </div>
            </Show>
            <p id="switchText">
                {move || mode.get().switch_prompt().0}
                " "
                <a href="#" class="switch-auth" on:click=switch_mode>
                    {move || mode.get().switch_prompt().1}
                </a>
            </p>
        </div>
    }
}
