//! GraphStore trait definition
//!
//! Defines the abstract interface for all showcase graph operations.
//! This trait mirrors the public async methods of `Neo4jClient`,
//! enabling testing with the in-memory mock and future backend swaps.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for all graph database operations.
///
/// Absence is reported as `None` and failed ownership checks as `false`;
/// an `Err` always means the store itself could not answer.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Whether the store answers a trivial query
    async fn health_check(&self) -> Result<bool>;

    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a user with a fresh id and server-side timestamp.
    ///
    /// Does not look for an existing user first; a store uniqueness constraint
    /// turns a duplicate email/username into `StoreError::Duplicate`.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserNode>;

    /// Exact-match lookup by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserNode>>;

    /// Exact-match lookup by username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserNode>>;

    /// Lookup by id
    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserNode>>;

    /// Number of User nodes
    async fn count_users(&self) -> Result<i64>;

    // ========================================================================
    // Like operations
    // ========================================================================

    /// Like a project, creating the Project node on first use.
    ///
    /// Returns `None` (and changes nothing) when the user does not exist.
    async fn create_like(&self, user_id: &str, project_name: &str)
        -> Result<Option<LikeReceipt>>;

    /// Remove every LIKES edge between the user and the project.
    ///
    /// Always `true`: removing a like that does not exist is not a failure.
    async fn remove_like(&self, user_id: &str, project_name: &str) -> Result<bool>;

    /// All likes of a project, most recent first
    async fn get_likes_by_project(&self, project_name: &str) -> Result<Vec<ProjectLike>>;

    /// Whether the user has at least one LIKES edge to the project
    async fn check_user_like(&self, user_id: &str, project_name: &str) -> Result<bool>;

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// Write a comment about a project, creating the Project node on first use.
    ///
    /// `text` is stored as given. Returns `None` when the user does not exist.
    async fn create_comment(
        &self,
        user_id: &str,
        project_name: &str,
        text: &str,
    ) -> Result<Option<CreatedComment>>;

    /// All comments about a project with their authors, newest first
    async fn get_comments_by_project(&self, project_name: &str) -> Result<Vec<ProjectComment>>;

    /// Replace a comment's text if `user_id` wrote it.
    ///
    /// `false` both when the comment is missing and when someone else wrote it.
    async fn update_comment(&self, comment_id: &str, user_id: &str, new_text: &str)
        -> Result<bool>;

    /// Delete a comment and its edges if `user_id` wrote it.
    ///
    /// `false` both when the comment is missing and when someone else wrote it.
    async fn delete_comment(&self, comment_id: &str, user_id: &str) -> Result<bool>;
}
