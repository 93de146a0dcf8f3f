//! Account route handlers: registration, password login, user lookup.
//!
//! Endpoints:
//! - `POST /api/auth/register`  Create an account (201)
//! - `POST /api/auth/login`     Email/password login
//! - `GET  /api/users/{id}`     Public user info
//!
//! Error messages are user-facing and match what the web client displays.

use crate::api::handlers::AppError;
use crate::auth::password::{hash_password_with_cost, verify_password};
use crate::auth::validation::{validate_email, validate_password, validate_username};
use crate::neo4j::models::UserNode;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request / Response types
// ============================================================================

/// Request body for POST /api/auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public user info (safe to send to client)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<UserNode> for UserSession {
    fn from(u: UserNode) -> Self {
        Self {
            user_id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserSession,
    pub message: String,
}

/// Response for GET /api/users/{id}
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserSession,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/register
///
/// Create a password account.
///
/// Username and email are trimmed and lowercased before storage. Existing
/// accounts are looked up by email first, then by username, so the client
/// gets the most specific message. A registration racing past those checks
/// is still stopped by the store's uniqueness constraints (409).
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let username = req.username.trim();
    let email = req.email.trim();
    tracing::debug!(username, email, "Register attempt");

    validate_username(username).map_err(AppError::BadRequest)?;
    if !validate_email(email) {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }
    validate_password(&req.password).map_err(AppError::BadRequest)?;

    let username = username.to_lowercase();
    let email = email.to_lowercase();

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Este email já está registrado".to_string(),
        ));
    }
    if state.store.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::BadRequest(
            "Este nome de usuário já está em uso".to_string(),
        ));
    }

    let password_hash = hash_password_with_cost(&req.password, state.config.bcrypt_cost)
        .map_err(AppError::Internal)?;
    let user = state
        .store
        .create_user(&username, &email, &password_hash)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserSession::from(user),
            message: "Conta criada com sucesso!".to_string(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Email/password login.
///
/// Unknown email and wrong password produce the same 401 so the response
/// never reveals whether an account exists.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if !validate_email(&req.email) {
        return Err(AppError::BadRequest("Email inválido".to_string()));
    }

    let invalid_credentials = || AppError::Unauthorized("Email ou senha incorretos".to_string());

    let user = state
        .store
        .find_user_by_email(&req.email.to_lowercase())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let message = format!("Bem-vindo, {}!", user.username);
    Ok(Json(SessionResponse {
        user: UserSession::from(user),
        message,
    }))
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .store
        .find_user_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(UserResponse {
        user: UserSession::from(user),
    }))
}
