use std::sync::Arc;

use chrono::Utc;

use crate::error::AppError;
use crate::models::{
    Comment, CommentDeletionResult, CreateCommentParams, DeleteCommentParams, GetCommentParams,
    UpdateCommentParams,
};
use crate::store::{CommentFilter, CommentRecord, CommentStore, TaskStore};

/// Read-path queries by compound key.
#[derive(Clone)]
struct CommentReader {
    comments: Arc<dyn CommentStore>,
}

impl CommentReader {
    /// Looks up a comment scoped to its owning task. Reads are not scoped by
    /// account: any authenticated caller who knows a valid task/comment pair
    /// may fetch it, unlike update and delete.
    async fn get_comment(&self, params: &GetCommentParams) -> Result<Comment, AppError> {
        let filter = CommentFilter::by_id_and_task(&params.comment_id, &params.task_id);
        let record = self
            .comments
            .find_one(&filter)
            .await?
            .ok_or_else(|| AppError::NotFound(params.comment_id.clone()))?;
        Ok(record.into())
    }
}

/// Create/update/delete, each a single logical transaction against the store.
#[derive(Clone)]
struct CommentWriter {
    comments: Arc<dyn CommentStore>,
    tasks: Arc<dyn TaskStore>,
}

impl CommentWriter {
    async fn create_comment(&self, params: &CreateCommentParams) -> Result<Comment, AppError> {
        // A missing task surfaces through the comment-not-found error kind,
        // keyed on the task id.
        if !self.tasks.task_exists(&params.task_id).await? {
            return Err(AppError::NotFound(params.task_id.clone()));
        }

        let now = Utc::now();
        let record = CommentRecord {
            id: None,
            task_id: params.task_id.clone(),
            account_id: params.account_id.clone(),
            text: params.text.clone(),
            created_at: now,
            updated_at: now,
        };
        let comment_id = self.comments.insert_one(&record).await?;

        // Re-fetch by the generated id so the caller gets the canonical
        // persisted form, including any store-side normalization.
        let created = self
            .comments
            .find_one(&CommentFilter::by_id(&comment_id))
            .await?
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("comment {comment_id} missing after insert"))
            })?;
        Ok(created.into())
    }

    async fn update_comment(&self, params: &UpdateCommentParams) -> Result<Comment, AppError> {
        let filter = CommentFilter::by_id_task_and_account(
            &params.comment_id,
            &params.task_id,
            &params.account_id,
        );
        let updated = self
            .comments
            .find_one_and_update(&filter, &params.text, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(params.comment_id.clone()))?;
        Ok(updated.into())
    }

    async fn delete_comment(
        &self,
        params: &DeleteCommentParams,
    ) -> Result<CommentDeletionResult, AppError> {
        let filter = CommentFilter::by_id_task_and_account(
            &params.comment_id,
            &params.task_id,
            &params.account_id,
        );
        let deleted_count = self.comments.delete_one(&filter).await?;
        if deleted_count == 0 {
            return Err(AppError::NotFound(params.comment_id.clone()));
        }
        Ok(CommentDeletionResult {
            comment_id: params.comment_id.clone(),
            deleted_at: Utc::now(),
            success: true,
        })
    }
}

/// Facade over the reader and writer: the single call surface for the HTTP
/// layer and for tests that bypass it. Pure pass-through per verb.
#[derive(Clone)]
pub struct CommentService {
    reader: CommentReader,
    writer: CommentWriter,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            reader: CommentReader {
                comments: comments.clone(),
            },
            writer: CommentWriter { comments, tasks },
        }
    }

    pub async fn get_comment(&self, params: &GetCommentParams) -> Result<Comment, AppError> {
        self.reader.get_comment(params).await
    }

    pub async fn create_comment(&self, params: &CreateCommentParams) -> Result<Comment, AppError> {
        self.writer.create_comment(params).await
    }

    pub async fn update_comment(&self, params: &UpdateCommentParams) -> Result<Comment, AppError> {
        self.writer.update_comment(params).await
    }

    pub async fn delete_comment(
        &self,
        params: &DeleteCommentParams,
    ) -> Result<CommentDeletionResult, AppError> {
        self.writer.delete_comment(params).await
    }
}
