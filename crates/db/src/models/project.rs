use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared artifact: the result of one vibe-coding session.
///
/// Records are immutable once created; the only lifecycle operations are
/// create and delete. Field names on the wire keep the original camelCase
/// slot format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// The generation prompt the artifact was built from. May be empty.
    pub prompt: String,
    /// Optional links; empty string means absent, no validation beyond that.
    pub builder_url: String,
    pub repo_url: String,
    pub deploy_url: String,
    pub author: String,
    /// Set once at creation, epoch milliseconds on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Ordered, non-unique across records, may be empty.
    pub tags: Vec<String>,
}

/// User-supplied form fields; id, timestamp and tags are assigned on submit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFormData {
    pub title: String,
    pub description: String,
    pub prompt: String,
    pub builder_url: String,
    pub repo_url: String,
    pub deploy_url: String,
    pub author: String,
}

impl Project {
    pub fn from_form(form: ProjectFormData, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: form.title,
            description: form.description,
            prompt: form.prompt,
            builder_url: form.builder_url,
            repo_url: form.repo_url,
            deploy_url: form.deploy_url,
            author: form.author,
            created_at: now_millis(),
            tags,
        }
    }
}

/// Current time truncated to the millisecond precision the slot format keeps.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
