//! Gateway Layer
//!
//! Capabilities consumed from the hosted backend, plus in-memory stand-ins.

mod memory_identity;
mod memory_store;
mod traits;

pub use memory_identity::MemoryIdentity;
pub use memory_store::{Delivery, MemoryStore, StoreOp};
pub use traits::{
    Direction, DocumentStore, ErrorCallback, IdentityProvider, SessionCallback, Snapshot, SnapshotCallback,
    Subscription, TodoQuery,
};
