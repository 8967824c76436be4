//! Browser glue: page navigation, confirm dialog and page teardown

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use firetodo_core::{Confirm, Navigator, Page};

fn go_to(page: Page) {
    let Some(window) = web_sys::window() else {
        return;
    };
    log::debug!("navigating to {}", page.path());
    if let Err(err) = window.location().set_href(page.path()) {
        log::error!("failed to navigate to {}: {err:?}", page.path());
    }
}

/// Blocking `window.confirm`; a missing window or a thrown dialog counts as "no"
fn ask(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn navigator() -> Rc<dyn Navigator> {
    Rc::new(go_to)
}

pub fn confirm() -> Rc<dyn Confirm> {
    Rc::new(ask)
}

/// Path of the current document
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default()
}

pub fn reload() {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().reload() {
            log::error!("failed to reload: {err:?}");
        }
    }
}

fn listen(event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if let Err(err) = window.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref()) {
        log::warn!("failed to watch {event}: {err:?}");
        return;
    }
    handler.forget();
}

fn persisted(ev: &web_sys::Event) -> bool {
    ev.dyn_ref::<web_sys::PageTransitionEvent>()
        .is_some_and(|ev| ev.persisted())
}

/// `hide` runs whenever the page is hidden; `restore` runs when a hidden
/// page comes back from the back/forward cache instead of being reloaded.
pub fn on_page_lifecycle(hide: impl Fn() + 'static, restore: impl Fn() + 'static) {
    listen("pagehide", move |ev| {
        log::debug!("pagehide (persisted: {})", persisted(&ev));
        hide();
    });
    listen("pageshow", move |ev| {
        if persisted(&ev) {
            log::debug!("page restored from cache");
            restore();
        }
    });
}
