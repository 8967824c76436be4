//! Session
//!
//! An authenticated identity handed out by the identity provider.

use super::todo::OwnerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Provider-assigned user id, used as the record owner
    pub id: OwnerId,
    /// Display only
    pub email: Option<String>,
}

impl Session {
    pub fn new(id: OwnerId, email: Option<String>) -> Self {
        Self { id, email }
    }

    /// Text shown in the user bar
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}
