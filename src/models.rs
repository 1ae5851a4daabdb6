use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to a task, as seen by business logic and the API.
///
/// Immutable once returned; `id` is the hex form of the store-generated
/// document id. Timestamps serialize as RFC 3339 strings.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: String,
    pub task_id: String,
    pub account_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Informational result of a hard delete. Not persisted anywhere.
#[derive(Debug, Clone, Serialize)]
pub struct CommentDeletionResult {
    pub comment_id: String,
    pub deleted_at: DateTime<Utc>,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub account_id: String,
    pub task_id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct GetCommentParams {
    pub account_id: String,
    pub task_id: String,
    pub comment_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCommentParams {
    pub account_id: String,
    pub task_id: String,
    pub comment_id: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DeleteCommentParams {
    pub account_id: String,
    pub task_id: String,
    pub comment_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}
