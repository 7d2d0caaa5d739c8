//! The task entity and its wire/record representations.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Partition key attribute of the task table.
pub const KEY_ATTRIBUTE: &str = "taskId";

/// Raw shape the record store deals in.
pub type Record = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    #[serde(rename = "taskId")]
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    #[serde(rename = "updatedAt")]
    pub updated_at: u64,
}

/// Client-supplied candidate for a new task. The id and completion flag are
/// optional; the repository fills in whatever is missing.
#[derive(Debug, Deserialize)]
pub struct NewTask {
    #[serde(rename = "taskId", default)]
    pub task_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl Task {
    pub fn to_record(&self) -> Record {
        let mut record = HashMap::new();
        record.insert(
            KEY_ATTRIBUTE.to_string(),
            AttributeValue::S(self.task_id.clone()),
        );
        record.insert("title".to_string(), AttributeValue::S(self.title.clone()));
        record.insert(
            "completed".to_string(),
            AttributeValue::Bool(self.completed),
        );
        record.insert(
            "createdAt".to_string(),
            AttributeValue::N(self.created_at.to_string()),
        );
        record.insert(
            "updatedAt".to_string(),
            AttributeValue::N(self.updated_at.to_string()),
        );
        record
    }

    /// Decodes a raw record. Returns `None` when a required attribute is
    /// missing or has the wrong type.
    pub fn from_record(record: &Record) -> Option<Self> {
        let task_id = record.get(KEY_ATTRIBUTE)?.as_s().ok()?.clone();
        let title = record.get("title")?.as_s().ok()?.clone();
        let completed = *record.get("completed")?.as_bool().ok()?;
        let created_at = record.get("createdAt")?.as_n().ok()?.parse().ok()?;
        let updated_at = record.get("updatedAt")?.as_n().ok()?.parse().ok()?;

        Some(Self {
            task_id,
            title,
            completed,
            created_at,
            updated_at,
        })
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}
