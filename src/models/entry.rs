use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded generation cycle: the raw AI text plus derived metadata.
///
/// The preview path is a weak reference to a file on disk; it is regenerated
/// on load and revoked when a newer preview supersedes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HistoryEntry {
    pub fn new(content: impl Into<String>, project_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            timestamp: Utc::now(),
            preview_path: None,
            project_name,
            description: None,
        }
    }
}

/// An explicitly saved snapshot, created by a "save version" action.
///
/// Versions and history entries are independent parallel logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub content: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

impl Version {
    pub fn new(
        content: impl Into<String>,
        description: impl Into<String>,
        project_name: Option<String>,
        model_used: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            description: description.into(),
            timestamp: Utc::now(),
            project_name,
            model_used,
        }
    }
}
