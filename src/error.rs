use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const COMMENT_NOT_FOUND: &str = "COMMENT_ERR_01";
pub const COMMENT_BAD_REQUEST: &str = "COMMENT_ERR_02";
pub const ACCESS_TOKEN_INVALID: &str = "ACCESS_TOKEN_ERR_01";
pub const UNAUTHORIZED_ACCESS: &str = "ACCESS_TOKEN_ERR_02";
pub const SERVER_ERROR: &str = "SERVER_ERR_01";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied for this account")]
    UnauthorizedAccess,

    #[error("Comment with id {0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => ACCESS_TOKEN_INVALID,
            AppError::UnauthorizedAccess => UNAUTHORIZED_ACCESS,
            AppError::NotFound(_) => COMMENT_NOT_FOUND,
            AppError::BadRequest(_) => COMMENT_BAD_REQUEST,
            AppError::Internal(_) => SERVER_ERROR,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::UnauthorizedAccess => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "code": self.code(),
            "message": message,
        }));

        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_comment_code() {
        let err = AppError::NotFound("507f1f77bcf86cd799439011".to_string());
        assert_eq!(err.code(), COMMENT_NOT_FOUND);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("507f1f77bcf86cd799439011"));
    }

    #[test]
    fn bad_request_maps_to_400_with_comment_code() {
        let err = AppError::BadRequest("Text is required".to_string());
        assert_eq!(err.code(), COMMENT_BAD_REQUEST);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Text is required");
    }

    #[test]
    fn infrastructure_faults_map_to_500() {
        let err = AppError::Internal(anyhow::anyhow!("connection reset"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
