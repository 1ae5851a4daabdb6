use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Comment;

pub mod mongo;

/// Raw persisted shape of a comment document.
///
/// The string fields default to empty when absent so a malformed record still
/// maps to a domain value; the collection's schema validator is what actually
/// guarantees they exist. Dates round-trip through bson datetimes
/// (millisecond precision).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Comment {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            task_id: record.task_id,
            account_id: record.account_id,
            text: record.text,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Compound-key match condition for point operations on the comments
/// collection. Every populated field must match exactly.
///
/// Reads use `(comment_id, task_id)`; update and delete add `account_id` so
/// only the authoring account can mutate, with a mismatch on any part
/// indistinguishable from the comment not existing.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub comment_id: Option<String>,
    pub task_id: Option<String>,
    pub account_id: Option<String>,
}

impl CommentFilter {
    pub fn by_id(comment_id: &str) -> Self {
        Self {
            comment_id: Some(comment_id.to_string()),
            ..Self::default()
        }
    }

    pub fn by_id_and_task(comment_id: &str, task_id: &str) -> Self {
        Self {
            comment_id: Some(comment_id.to_string()),
            task_id: Some(task_id.to_string()),
            account_id: None,
        }
    }

    pub fn by_id_task_and_account(comment_id: &str, task_id: &str, account_id: &str) -> Self {
        Self {
            comment_id: Some(comment_id.to_string()),
            task_id: Some(task_id.to_string()),
            account_id: Some(account_id.to_string()),
        }
    }
}

/// Point operations the comment module relies on, and nothing else.
///
/// `find_one_and_update` and `delete_one` are atomic at the single-document
/// level; that is the only concurrency guarantee callers may assume.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_one(&self, filter: &CommentFilter) -> anyhow::Result<Option<CommentRecord>>;

    /// Inserts a fully-populated record and returns the generated id.
    async fn insert_one(&self, record: &CommentRecord) -> anyhow::Result<String>;

    /// Atomically matches `filter`, sets `text` and `updated_at`, and returns
    /// the post-update record. `None` when nothing matched.
    async fn find_one_and_update(
        &self,
        filter: &CommentFilter,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<Option<CommentRecord>>;

    /// Deletes the record matching `filter`, returning the deleted count.
    async fn delete_one(&self, filter: &CommentFilter) -> anyhow::Result<u64>;
}

/// Interface boundary to the task store: the comment writer only needs a
/// point existence check at creation time.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn task_exists(&self, task_id: &str) -> anyhow::Result<bool>;
}
