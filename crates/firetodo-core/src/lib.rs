//! firetodo core
//!
//! Layered like the UI needs it:
//! - domain: records, sessions, errors
//! - gateway: identity provider / document store traits and in-memory versions
//! - sync: the live, owner-scoped todo list
//! - gate / credentials: page-level session handling
//! - config: Firebase settings

pub mod config;
pub mod credentials;
pub mod domain;
pub mod gate;
pub mod gateway;
pub mod sync;

pub use config::{AppConfig, ConfigError, FirebaseConfig};
pub use credentials::{AuthMode, CredentialForm, FormMessage, SubmitOutcome, Tone};
pub use domain::{AuthError, NewTodo, OwnerId, Session, StoreError, StoreErrorKind, Todo, TodoId, TodoPatch};
pub use gate::{Navigator, Page, SessionGate};
pub use gateway::{DocumentStore, IdentityProvider, Snapshot, Subscription, TodoQuery};
pub use sync::{Confirm, CreateOutcome, DeleteOutcome, ListSynchronizer, ListView};
