//! HTTP API for the project showcase

pub mod auth_handlers;
pub mod comment_handlers;
pub mod handlers;
pub mod like_handlers;
pub mod routes;

pub use handlers::AppError;
pub use routes::create_router;
