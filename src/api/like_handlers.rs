//! Like route handlers

use crate::api::handlers::AppError;
use crate::neo4j::models::{LikeReceipt, ProjectLike};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

/// Body of POST and DELETE /api/likes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub user_id: String,
    pub project_name: String,
}

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: Vec<ProjectLike>,
}

#[derive(Debug, Serialize)]
pub struct LikeStatusResponse {
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeCreatedResponse {
    pub like: LikeReceipt,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn require_non_empty(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(())
}

fn validate_like_request(req: &LikeRequest) -> Result<(), AppError> {
    require_non_empty(&req.user_id, "userId é obrigatório")?;
    require_non_empty(&req.project_name, "projectName é obrigatório")
}

/// GET /api/likes/{project_name}
pub async fn list_likes(
    State(state): State<AppState>,
    Path(project_name): Path<String>,
) -> Result<Json<LikesResponse>, AppError> {
    let likes = state.store.get_likes_by_project(&project_name).await?;
    Ok(Json(LikesResponse { likes }))
}

/// GET /api/likes/{project_name}/{user_id}
pub async fn check_like(
    State(state): State<AppState>,
    Path((project_name, user_id)): Path<(String, String)>,
) -> Result<Json<LikeStatusResponse>, AppError> {
    let liked = state.store.check_user_like(&user_id, &project_name).await?;
    Ok(Json(LikeStatusResponse { liked }))
}

/// POST /api/likes
pub async fn create_like(
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> Result<(StatusCode, Json<LikeCreatedResponse>), AppError> {
    validate_like_request(&req)?;

    let like = state
        .store
        .create_like(&req.user_id, &req.project_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    tracing::debug!(user_id = %req.user_id, project = %req.project_name, "Project liked");
    Ok((StatusCode::CREATED, Json(LikeCreatedResponse { like })))
}

/// DELETE /api/likes
///
/// Succeeds whether or not the like existed.
pub async fn remove_like(
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    validate_like_request(&req)?;

    let success = state
        .store
        .remove_like(&req.user_id, &req.project_name)
        .await?;
    Ok(Json(SuccessResponse { success }))
}
