use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::AppError;
use crate::models::{
    Comment, CreateCommentParams, CreateCommentRequest, DeleteCommentParams, GetCommentParams,
    UpdateCommentParams, UpdateCommentRequest,
};
use crate::routes::AppState;

/// POST /accounts/:account_id/tasks/:task_id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path((account_id, task_id)): Path<(String, String)>,
    body: Option<Json<CreateCommentRequest>>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let text = body
        .and_then(|Json(req)| req.text)
        .ok_or_else(|| AppError::BadRequest("Missing 'text' in request body.".to_string()))?;

    let params = CreateCommentParams {
        account_id,
        task_id,
        text,
    };
    let comment = state.service.create_comment(&params).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /accounts/:account_id/tasks/:task_id/comments
///
/// There is no list endpoint; fetching requires a comment id.
pub async fn comment_id_required() -> Result<Json<Comment>, AppError> {
    Err(AppError::BadRequest(
        "Comment ID is required for fetching a specific comment".to_string(),
    ))
}

/// GET /accounts/:account_id/tasks/:task_id/comments/:comment_id
pub async fn get_comment(
    State(state): State<AppState>,
    Path((account_id, task_id, comment_id)): Path<(String, String, String)>,
) -> Result<Json<Comment>, AppError> {
    let params = GetCommentParams {
        account_id,
        task_id,
        comment_id,
    };
    let comment = state.service.get_comment(&params).await?;
    Ok(Json(comment))
}

/// PATCH /accounts/:account_id/tasks/:task_id/comments/:comment_id
pub async fn update_comment(
    State(state): State<AppState>,
    Path((account_id, task_id, comment_id)): Path<(String, String, String)>,
    body: Option<Json<UpdateCommentRequest>>,
) -> Result<Json<Comment>, AppError> {
    let Json(req) =
        body.ok_or_else(|| AppError::BadRequest("Request body is required".to_string()))?;
    let text = match req.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(AppError::BadRequest("Text is required".to_string())),
    };

    let params = UpdateCommentParams {
        account_id,
        task_id,
        comment_id,
        text,
    };
    let comment = state.service.update_comment(&params).await?;
    Ok(Json(comment))
}

/// DELETE /accounts/:account_id/tasks/:task_id/comments/:comment_id
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((account_id, task_id, comment_id)): Path<(String, String, String)>,
) -> Result<StatusCode, AppError> {
    let params = DeleteCommentParams {
        account_id,
        task_id,
        comment_id,
    };
    state.service.delete_comment(&params).await?;
    Ok(StatusCode::NO_CONTENT)
}
