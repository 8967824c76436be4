//! Firebase Bindings
//!
//! Imports of the Firebase compat SDK globals (loaded by index.html) and the
//! gateway implementations built on them.

mod auth;
mod firestore;

use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;

use firetodo_core::{AppConfig, AuthError, StoreError};

use crate::context::Backend;

pub use auth::FirebaseIdentity;
pub use firestore::FirestoreStore;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = firebase, js_name = initializeApp)]
    fn initialize_app(options: &JsValue) -> Result<JsValue, JsValue>;
}

/// Initialize the Firebase app and build both gateways on it
pub fn connect(config: &AppConfig) -> Result<Backend, String> {
    let options = serde_wasm_bindgen::to_value(&config.firebase).map_err(|e| e.to_string())?;
    initialize_app(&options).map_err(|e| error_parts(&e).1)?;
    log::info!("firebase app initialized for project {}", config.firebase.project_id);

    Ok(Backend {
        identity: Rc::new(FirebaseIdentity::new()),
        store: Rc::new(FirestoreStore::new(&config.collection)),
    })
}

/// `(code, message)` of a rejected Firebase call
fn error_parts(err: &JsValue) -> (String, String) {
    let field = |name: &str| {
        Reflect::get(err, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };
    let code = field("code").unwrap_or_default();
    let message = field("message")
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    (code, message)
}

fn auth_error(err: JsValue) -> AuthError {
    let (code, message) = error_parts(&err);
    AuthError::new(code, message)
}

fn store_error(err: JsValue) -> StoreError {
    let (code, message) = error_parts(&err);
    StoreError::from_code(&code, message)
}

/// Call a JS unsubscribe function, logging if it throws
fn release(unsubscribe: &js_sys::Function, what: &str) {
    if let Err(err) = unsubscribe.call0(&JsValue::NULL) {
        log::warn!("failed to release {what}: {}", error_parts(&err).1);
    }
}
