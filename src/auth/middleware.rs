use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, routes::AppState};

use super::jwt::verify_access_token;

/// Account identity resolved from the bearer token, attached to the request
/// before any handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: String,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    path_params: RawPathParams,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_access_token(token, &state.config.jwt_secret)?;

    // The token must belong to the account the route is scoped under.
    let path_account = path_params
        .iter()
        .find(|(name, _)| *name == "account_id")
        .map(|(_, value)| value);
    if let Some(account_id) = path_account {
        if account_id != claims.sub {
            return Err(AppError::UnauthorizedAccess);
        }
    }

    let auth_user = AuthUser {
        account_id: claims.sub,
    };

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
