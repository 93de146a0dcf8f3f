//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserNode> {
        self.create_user(username, email, password_hash).await
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserNode>> {
        self.find_user_by_email(email).await
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<UserNode>> {
        self.find_user_by_username(username).await
    }

    async fn find_user_by_id(&self, user_id: &str) -> anyhow::Result<Option<UserNode>> {
        self.find_user_by_id(user_id).await
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        self.count_users().await
    }

    // ========================================================================
    // Like operations
    // ========================================================================

    async fn create_like(
        &self,
        user_id: &str,
        project_name: &str,
    ) -> anyhow::Result<Option<LikeReceipt>> {
        self.create_like(user_id, project_name).await
    }

    async fn remove_like(&self, user_id: &str, project_name: &str) -> anyhow::Result<bool> {
        self.remove_like(user_id, project_name).await
    }

    async fn get_likes_by_project(&self, project_name: &str) -> anyhow::Result<Vec<ProjectLike>> {
        self.get_likes_by_project(project_name).await
    }

    async fn check_user_like(&self, user_id: &str, project_name: &str) -> anyhow::Result<bool> {
        self.check_user_like(user_id, project_name).await
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn create_comment(
        &self,
        user_id: &str,
        project_name: &str,
        text: &str,
    ) -> anyhow::Result<Option<CreatedComment>> {
        self.create_comment(user_id, project_name, text).await
    }

    async fn get_comments_by_project(
        &self,
        project_name: &str,
    ) -> anyhow::Result<Vec<ProjectComment>> {
        self.get_comments_by_project(project_name).await
    }

    async fn update_comment(
        &self,
        comment_id: &str,
        user_id: &str,
        new_text: &str,
    ) -> anyhow::Result<bool> {
        self.update_comment(comment_id, user_id, new_text).await
    }

    async fn delete_comment(&self, comment_id: &str, user_id: &str) -> anyhow::Result<bool> {
        self.delete_comment(comment_id, user_id).await
    }
}
