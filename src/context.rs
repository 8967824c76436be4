//! Application Context
//!
//! Backend handles shared via Leptos Context API. The gateways are `Rc`
//! based, so they sit in local `StoredValue`s and the context stays `Copy`.

use std::rc::Rc;

use leptos::prelude::*;

use firetodo_core::{DocumentStore, IdentityProvider, ListSynchronizer, SessionGate};

/// The two gateways the pages talk to
#[derive(Clone)]
pub struct Backend {
    pub identity: Rc<dyn IdentityProvider>,
    pub store: Rc<dyn DocumentStore>,
}

#[derive(Clone, Copy)]
pub struct AppContext {
    backend: StoredValue<Backend, LocalStorage>,
    /// Gate of the todo page, once opened
    gate: StoredValue<Option<Rc<SessionGate>>, LocalStorage>,
}

impl AppContext {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend: StoredValue::new_local(backend),
            gate: StoredValue::new_local(None),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.get_value()
    }

    pub fn set_gate(&self, gate: SessionGate) {
        self.gate.set_value(Some(Rc::new(gate)));
    }

    pub fn gate(&self) -> Option<Rc<SessionGate>> {
        self.gate.get_value()
    }

    /// List of the current session, if one is revealed
    pub fn list(&self) -> Option<ListSynchronizer> {
        self.gate().and_then(|gate| gate.list())
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
