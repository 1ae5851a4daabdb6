pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use routes::AppState;
pub use service::CommentService;
