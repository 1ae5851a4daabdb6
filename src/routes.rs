use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::auth_middleware;
use crate::handlers::comments as comment_handlers;
use crate::service::CommentService;
use crate::Config;

#[derive(Clone)]
pub struct AppState {
    pub service: CommentService,
    pub config: Config,
}

pub fn create_router(state: AppState) -> Router {
    // Comment routes (nested under accounts/tasks, all protected)
    let comment_routes = Router::new()
        .route("/", post(comment_handlers::create_comment))
        .route("/", get(comment_handlers::comment_id_required))
        .route("/:comment_id", get(comment_handlers::get_comment))
        .route("/:comment_id", patch(comment_handlers::update_comment))
        .route("/:comment_id", delete(comment_handlers::delete_comment))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/accounts/:account_id/tasks/:task_id/comments",
            comment_routes,
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
