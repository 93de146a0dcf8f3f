//! Comment route handlers
//!
//! Edits and deletes are only honoured for the comment's author. A comment
//! that does not exist and a comment written by someone else both yield 404,
//! so the response does not reveal which case applied.

use crate::api::handlers::AppError;
use crate::api::like_handlers::SuccessResponse;
use crate::neo4j::models::{CreatedComment, ProjectComment};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of POST /api/comments
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub user_id: String,
    pub project_name: String,
    #[serde(default)]
    pub text: String,
}

/// Body of PUT /api/comments/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// Body of DELETE /api/comments/{id}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<ProjectComment>,
}

#[derive(Debug, Serialize)]
pub struct CommentCreatedResponse {
    pub comment: CreatedComment,
}

fn comment_text(text: &str) -> Result<&str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest(
            "Comentário não pode estar vazio".to_string(),
        ));
    }
    Ok(text)
}

fn not_found_or_forbidden() -> AppError {
    AppError::NotFound("Comentário não encontrado ou sem permissão".to_string())
}

/// GET /api/comments/{project_name}
pub async fn list_comments(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> Result<Json<CommentsResponse>, AppError> {
    let comments = state.store.get_comments_by_project(&project_name).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentCreatedResponse>), AppError> {
    let text = comment_text(&req.text)?;
    if req.project_name.trim().is_empty() {
        return Err(AppError::BadRequest("projectName é obrigatório".to_string()));
    }

    let comment = state
        .store
        .create_comment(&req.user_id, &req.project_name, text)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    tracing::debug!(comment_id = %comment.id, project = %req.project_name, "Comment created");
    Ok((StatusCode::CREATED, Json(CommentCreatedResponse { comment })))
}

/// PUT /api/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let text = comment_text(&req.text)?;

    if !state
        .store
        .update_comment(&comment_id, &req.user_id, text)
        .await?
    {
        return Err(not_found_or_forbidden());
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(req): Json<DeleteCommentRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state
        .store
        .delete_comment(&comment_id, &req.user_id)
        .await?
    {
        return Err(not_found_or_forbidden());
    }

    tracing::debug!(comment_id = %comment_id, "Comment deleted");
    Ok(Json(SuccessResponse { success: true }))
}
