use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard_server::config::Config;
use taskboard_server::db;
use taskboard_server::routes::{self, AppState};
use taskboard_server::service::CommentService;
use taskboard_server::store::mongo::{MongoCommentStore, MongoTaskStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let (client, database) = db::connect(&config).await?;

    let comments = MongoCommentStore::new(&database);
    comments.ensure_schema().await;
    let tasks = MongoTaskStore::new(&database);

    let service = CommentService::new(Arc::new(comments), Arc::new(tasks));
    let app = routes::create_router(AppState {
        service,
        config: config.clone(),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    client.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
