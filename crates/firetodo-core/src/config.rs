//! Application configuration
//!
//! The Firebase web app snippet plus the collection holding the records,
//! read from JSON with the same camelCase keys the Firebase console prints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_COLLECTION: &str = "todos";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
}

/// Firebase web app settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
    /// Collection holding the todo records
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("firebase.apiKey", &self.firebase.api_key),
            ("firebase.authDomain", &self.firebase.auth_domain),
            ("firebase.projectId", &self.firebase.project_id),
            ("firebase.appId", &self.firebase.app_id),
            ("collection", &self.collection),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::Missing(*name)),
            None => Ok(()),
        }
    }
}
