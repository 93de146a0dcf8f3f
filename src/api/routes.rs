//! API route definitions

use super::{auth_handlers, comment_handlers, handlers, like_handlers};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(handlers::health))
        // ====================================================================
        // Accounts
        // ====================================================================
        .route("/api/auth/register", post(auth_handlers::register))
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/users/{user_id}", get(auth_handlers::get_user))
        // ====================================================================
        // Likes
        // ====================================================================
        .route(
            "/api/likes",
            post(like_handlers::create_like).delete(like_handlers::remove_like),
        )
        .route("/api/likes/{project_name}", get(like_handlers::list_likes))
        .route(
            "/api/likes/{project_name}/{user_id}",
            get(like_handlers::check_like),
        )
        // ====================================================================
        // Comments
        // ====================================================================
        .route("/api/comments", post(comment_handlers::create_comment))
        // GET takes a project name, PUT/DELETE a comment id
        .route(
            "/api/comments/{id}",
            get(comment_handlers::list_comments)
                .put(comment_handlers::update_comment)
                .delete(comment_handlers::delete_comment),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
