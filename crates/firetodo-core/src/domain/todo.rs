//! Todo Record
//!
//! A single to-do item as persisted in the document store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Store-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the session that owns a record.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A to-do record
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    /// Assigned by the store, immutable
    pub id: TodoId,
    /// Trimmed, non-empty text
    pub text: String,
    /// Completion status
    pub completed: bool,
    /// Creating session
    pub owner_id: OwnerId,
    /// Sort key, newest first
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn from_new(id: TodoId, new: NewTodo) -> Self {
        Self {
            id,
            text: new.text,
            completed: new.completed,
            owner_id: new.owner_id,
            created_at: new.created_at,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// Build a payload from raw user input.
    ///
    /// Returns `None` when the text is blank after trimming.
    pub fn from_input(raw: &str, owner_id: OwnerId, created_at: DateTime<Utc>) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            completed: false,
            owner_id,
            created_at,
        })
    }
}

/// Partial update; absent fields are left untouched and not serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::parse("u1").unwrap()
    }

    #[test]
    fn test_new_todo_trims_input() {
        let new = NewTodo::from_input("  Buy milk \n", owner(), Utc::now()).unwrap();
        assert_eq!(new.text, "Buy milk");
        assert!(!new.completed);
        assert_eq!(new.owner_id.as_str(), "u1");
    }

    #[test]
    fn test_new_todo_rejects_blank() {
        assert!(NewTodo::from_input("   ", owner(), Utc::now()).is_none());
        assert!(NewTodo::from_input("", owner(), Utc::now()).is_none());
    }

    #[test]
    fn test_owner_id_rejects_empty() {
        assert_eq!(OwnerId::parse(" "), Err(ValidationError::EmptyOwner));
    }

    #[test]
    fn test_patch_only_serializes_present_fields() {
        let json = serde_json::to_string(&TodoPatch::completed(true)).unwrap();
        assert_eq!(json, r#"{"completed":true}"#);
    }

    #[test]
    fn test_apply_patch() {
        let new = NewTodo::from_input("Walk dog", owner(), Utc::now()).unwrap();
        let mut todo = Todo::from_new(TodoId::new("t1"), new);
        todo.apply(&TodoPatch::completed(true));
        assert!(todo.completed);
        assert_eq!(todo.text, "Walk dog");
    }
}
