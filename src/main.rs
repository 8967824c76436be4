//! Firetodo Frontend Entry Point

mod app;
mod browser;
mod components;
mod context;
mod firebase;
mod store;

use app::{App, StartupError};
use leptos::prelude::*;
use log::LevelFilter;

use firetodo_core::{AppConfig, Page};

const CONFIG_JSON: &str = include_str!("../firebase.config.json");

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_logger::init_logger("firetodo", LevelFilter::Debug) {
        web_sys::console::warn_1(&format!("logger already set: {err}").into());
    }

    let page = Page::from_path(&browser::current_path());
    let backend = AppConfig::from_json(CONFIG_JSON)
        .map_err(|e| e.to_string())
        .and_then(|config| firebase::connect(&config));

    match backend {
        Ok(backend) => mount_to_body(move || view! { <App backend page /> }),
        Err(message) => {
            log::error!("startup failed: {message}");
            mount_to_body(move || view! { <StartupError message /> })
        }
    }
}
