//! Domain Layer
//!
//! Records, sessions and the error taxonomy shared by every other layer.
//! No gateway or UI code lives here.

mod error;
mod session;
mod todo;

pub use error::{AuthError, AuthResult, StoreError, StoreErrorKind, StoreResult, ValidationError};
pub use session::Session;
pub use todo::{NewTodo, OwnerId, Todo, TodoId, TodoPatch};
