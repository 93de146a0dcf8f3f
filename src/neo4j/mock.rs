//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the Cypher behaviour of `Neo4jClient` using
//! `tokio::sync::RwLock` collections. Each operation holds a single write
//! (or read) guard for its whole duration, which stands in for the
//! single-statement atomicity of the real store.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::error::StoreError;
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A LIKES edge
#[derive(Debug, Clone)]
pub struct LikeEdge {
    pub user_id: String,
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    seq: u64,
}

/// A Comment node together with its WROTE and ABOUT edges
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author_id: String,
    pub project_name: String,
    seq: u64,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    like_mode: LikeMode,
    seq: AtomicU64,

    pub users: RwLock<HashMap<String, UserNode>>,
    pub projects: RwLock<HashSet<String>>,
    pub likes: RwLock<Vec<LikeEdge>>,
    pub comments: RwLock<HashMap<String, CommentRecord>>,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore (single-edge likes).
    pub fn new() -> Self {
        Self::with_like_mode(LikeMode::Single)
    }

    pub fn with_like_mode(like_mode: LikeMode) -> Self {
        Self {
            like_mode,
            seq: AtomicU64::new(0),
            users: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashSet::new()),
            likes: RwLock::new(Vec::new()),
            comments: RwLock::new(HashMap::new()),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a user with a throwaway password hash.
    pub async fn seed_user(&self, username: &str, email: &str) -> UserNode {
        self.create_user(username, email, "test-hash")
            .await
            .expect("seed_user: duplicate user")
    }

    /// Number of LIKES edges between a user and a project.
    pub async fn like_edge_count(&self, user_id: &str, project_name: &str) -> usize {
        self.likes
            .read()
            .await
            .iter()
            .filter(|l| l.user_id == user_id && l.project_name == project_name)
            .count()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserNode> {
        let mut users = self.users.write().await;
        // Same uniqueness constraints the Neo4j schema installs
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate {
                field: "email".to_string(),
            }
            .into());
        }
        if users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate {
                field: "username".to_string(),
            }
            .into());
        }

        let user = UserNode {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserNode>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserNode>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserNode>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }

    // ========================================================================
    // Like operations
    // ========================================================================

    async fn create_like(
        &self,
        user_id: &str,
        project_name: &str,
    ) -> Result<Option<LikeReceipt>> {
        let users = self.users.read().await;
        let Some(user) = users.get(user_id) else {
            return Ok(None);
        };

        self.projects
            .write()
            .await
            .insert(project_name.to_string());

        let mut likes = self.likes.write().await;
        if self.like_mode == LikeMode::Single {
            let existing = likes
                .iter()
                .filter(|l| l.user_id == user_id && l.project_name == project_name)
                .min_by_key(|l| (l.created_at, l.seq));
            if let Some(edge) = existing {
                return Ok(Some(LikeReceipt {
                    username: user.username.clone(),
                    created_at: edge.created_at,
                }));
            }
        }

        let edge = LikeEdge {
            user_id: user_id.to_string(),
            project_name: project_name.to_string(),
            created_at: Utc::now(),
            seq: self.next_seq(),
        };
        let receipt = LikeReceipt {
            username: user.username.clone(),
            created_at: edge.created_at,
        };
        likes.push(edge);
        Ok(Some(receipt))
    }

    async fn remove_like(&self, user_id: &str, project_name: &str) -> Result<bool> {
        self.likes
            .write()
            .await
            .retain(|l| !(l.user_id == user_id && l.project_name == project_name));
        Ok(true)
    }

    async fn get_likes_by_project(&self, project_name: &str) -> Result<Vec<ProjectLike>> {
        let users = self.users.read().await;
        let likes = self.likes.read().await;

        let mut matching: Vec<&LikeEdge> = likes
            .iter()
            .filter(|l| l.project_name == project_name)
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));

        Ok(matching
            .into_iter()
            .filter_map(|l| {
                users.get(&l.user_id).map(|u| ProjectLike {
                    username: u.username.clone(),
                    user_id: u.id.clone(),
                    created_at: l.created_at,
                })
            })
            .collect())
    }

    async fn check_user_like(&self, user_id: &str, project_name: &str) -> Result<bool> {
        Ok(self
            .likes
            .read()
            .await
            .iter()
            .any(|l| l.user_id == user_id && l.project_name == project_name))
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn create_comment(
        &self,
        user_id: &str,
        project_name: &str,
        text: &str,
    ) -> Result<Option<CreatedComment>> {
        let users = self.users.read().await;
        let Some(user) = users.get(user_id) else {
            return Ok(None);
        };

        self.projects
            .write()
            .await
            .insert(project_name.to_string());

        let record = CommentRecord {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
            updated_at: None,
            author_id: user_id.to_string(),
            project_name: project_name.to_string(),
            seq: self.next_seq(),
        };
        let created = CreatedComment {
            id: record.id.clone(),
            text: record.text.clone(),
            created_at: record.created_at,
            username: user.username.clone(),
        };
        self.comments
            .write()
            .await
            .insert(record.id.clone(), record);
        Ok(Some(created))
    }

    async fn get_comments_by_project(&self, project_name: &str) -> Result<Vec<ProjectComment>> {
        let users = self.users.read().await;
        let comments = self.comments.read().await;

        let mut matching: Vec<&CommentRecord> = comments
            .values()
            .filter(|c| c.project_name == project_name)
            .collect();
        matching.sort_by(|a, b| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));

        Ok(matching
            .into_iter()
            .filter_map(|c| {
                users.get(&c.author_id).map(|u| ProjectComment {
                    id: c.id.clone(),
                    text: c.text.clone(),
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                    username: u.username.clone(),
                    user_id: u.id.clone(),
                })
            })
            .collect())
    }

    async fn update_comment(&self, comment_id: &str, user_id: &str, new_text: &str) -> Result<bool> {
        let mut comments = self.comments.write().await;
        match comments.get_mut(comment_id) {
            Some(c) if c.author_id == user_id => {
                c.text = new_text.to_string();
                c.updated_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_comment(&self, comment_id: &str, user_id: &str) -> Result<bool> {
        let mut comments = self.comments.write().await;
        let owned = comments
            .get(comment_id)
            .is_some_and(|c| c.author_id == user_id);
        if owned {
            comments.remove(comment_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = "AVC Alerta";

    #[tokio::test]
    async fn test_alice_likes_project() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;

        let receipt = store.create_like(&alice.id, PROJECT).await.unwrap().unwrap();
        assert_eq!(receipt.username, "alice");

        let likes = store.get_likes_by_project(PROJECT).await.unwrap();
        assert_eq!(
            likes,
            vec![ProjectLike {
                username: "alice".to_string(),
                user_id: alice.id.clone(),
                created_at: receipt.created_at,
            }]
        );
        assert!(store.projects.read().await.contains(PROJECT));
    }

    #[tokio::test]
    async fn test_like_then_check_then_remove() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;

        store.create_like(&alice.id, PROJECT).await.unwrap();
        assert!(store.check_user_like(&alice.id, PROJECT).await.unwrap());

        assert!(store.remove_like(&alice.id, PROJECT).await.unwrap());
        assert!(!store.check_user_like(&alice.id, PROJECT).await.unwrap());
        assert!(store.get_likes_by_project(PROJECT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_like_is_success_and_noop() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        let bob = store.seed_user("bob", "bob@x.com").await;
        store.create_like(&bob.id, PROJECT).await.unwrap();

        assert!(store.remove_like(&alice.id, PROJECT).await.unwrap());
        assert!(store.remove_like("no-such-user", "No Such Project").await.unwrap());

        let likes = store.get_likes_by_project(PROJECT).await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].username, "bob");
    }

    #[tokio::test]
    async fn test_like_by_unknown_user_changes_nothing() {
        let store = MockGraphStore::new();
        let receipt = store.create_like("ghost", PROJECT).await.unwrap();
        assert!(receipt.is_none());
        assert!(store.projects.read().await.is_empty());
        assert!(store.likes.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_single_mode_repeat_like_reuses_edge() {
        let store = MockGraphStore::with_like_mode(LikeMode::Single);
        let alice = store.seed_user("alice", "alice@x.com").await;

        let first = store.create_like(&alice.id, PROJECT).await.unwrap().unwrap();
        let second = store.create_like(&alice.id, PROJECT).await.unwrap().unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(store.like_edge_count(&alice.id, PROJECT).await, 1);
        assert_eq!(store.get_likes_by_project(PROJECT).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_multi_mode_repeat_like_adds_edge() {
        let store = MockGraphStore::with_like_mode(LikeMode::Multi);
        let alice = store.seed_user("alice", "alice@x.com").await;

        store.create_like(&alice.id, PROJECT).await.unwrap();
        store.create_like(&alice.id, PROJECT).await.unwrap();

        assert_eq!(store.like_edge_count(&alice.id, PROJECT).await, 2);
        let likes = store.get_likes_by_project(PROJECT).await.unwrap();
        assert_eq!(likes.len(), 2);
        assert!(likes.iter().all(|l| l.username == "alice"));

        // One removal clears every edge of the pair
        store.remove_like(&alice.id, PROJECT).await.unwrap();
        assert_eq!(store.like_edge_count(&alice.id, PROJECT).await, 0);
        assert!(!store.check_user_like(&alice.id, PROJECT).await.unwrap());
    }

    #[tokio::test]
    async fn test_likes_newest_first() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        let bob = store.seed_user("bob", "bob@x.com").await;
        let carol = store.seed_user("carol", "carol@x.com").await;

        store.create_like(&alice.id, PROJECT).await.unwrap();
        store.create_like(&bob.id, PROJECT).await.unwrap();
        store.create_like(&carol.id, PROJECT).await.unwrap();
        store.create_like(&alice.id, "Other").await.unwrap();

        let likes = store.get_likes_by_project(PROJECT).await.unwrap();
        let names: Vec<_> = likes.iter().map(|l| l.username.as_str()).collect();
        assert_eq!(names, vec!["carol", "bob", "alice"]);
        assert!(likes.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_comment_round_trip() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;

        let created = store
            .create_comment(&alice.id, PROJECT, "hello")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.text, "hello");
        assert_eq!(created.username, "alice");

        let comments = store.get_comments_by_project(PROJECT).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, created.id);
        assert_eq!(comments[0].text, "hello");
        assert_eq!(comments[0].username, "alice");
        assert_eq!(comments[0].user_id, alice.id);
        assert!(comments[0].updated_at.is_none());
    }

    #[tokio::test]
    async fn test_comment_by_unknown_user() {
        let store = MockGraphStore::new();
        let created = store.create_comment("ghost", PROJECT, "hello").await.unwrap();
        assert!(created.is_none());
        assert!(store.comments.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_comments_newest_first_and_scoped_to_project() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;

        store.create_comment(&alice.id, PROJECT, "first").await.unwrap();
        store.create_comment(&alice.id, PROJECT, "second").await.unwrap();
        store.create_comment(&alice.id, "Other", "elsewhere").await.unwrap();

        let texts: Vec<_> = store
            .get_comments_by_project(PROJECT)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_update_comment_requires_author() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        let bob = store.seed_user("bob", "bob@x.com").await;
        let comment = store
            .create_comment(&alice.id, PROJECT, "ótimo app")
            .await
            .unwrap()
            .unwrap();

        assert!(!store.update_comment(&comment.id, &bob.id, "hack").await.unwrap());
        let comments = store.get_comments_by_project(PROJECT).await.unwrap();
        assert_eq!(comments[0].text, "ótimo app");
        assert!(comments[0].updated_at.is_none());

        assert!(store
            .update_comment(&comment.id, &alice.id, "editado")
            .await
            .unwrap());
        let comments = store.get_comments_by_project(PROJECT).await.unwrap();
        assert_eq!(comments[0].text, "editado");
        assert!(comments[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_with_same_text_bumps_updated_at() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        let comment = store
            .create_comment(&alice.id, PROJECT, "same")
            .await
            .unwrap()
            .unwrap();

        store.update_comment(&comment.id, &alice.id, "same").await.unwrap();
        let first = store.comments.read().await[&comment.id].updated_at;
        store.update_comment(&comment.id, &alice.id, "same").await.unwrap();
        let second = store.comments.read().await[&comment.id].updated_at;

        assert!(first.is_some());
        assert!(second >= first);
        assert_eq!(store.comments.read().await[&comment.id].text, "same");
    }

    #[tokio::test]
    async fn test_update_missing_comment() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        assert!(!store.update_comment("missing", &alice.id, "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_comment_requires_author_and_is_single_shot() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;
        let bob = store.seed_user("bob", "bob@x.com").await;
        let comment = store
            .create_comment(&alice.id, PROJECT, "ótimo app")
            .await
            .unwrap()
            .unwrap();

        assert!(!store.delete_comment(&comment.id, &bob.id).await.unwrap());
        assert_eq!(store.get_comments_by_project(PROJECT).await.unwrap().len(), 1);

        assert!(store.delete_comment(&comment.id, &alice.id).await.unwrap());
        assert!(!store.delete_comment(&comment.id, &alice.id).await.unwrap());
        assert!(store.get_comments_by_project(PROJECT).await.unwrap().is_empty());
        // The project node outlives its comments
        assert!(store.projects.read().await.contains(PROJECT));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let store = MockGraphStore::new();
        let alice = store.seed_user("alice", "alice@x.com").await;

        assert_eq!(
            store.find_user_by_email("alice@x.com").await.unwrap(),
            Some(alice.clone())
        );
        assert_eq!(
            store.find_user_by_username("alice").await.unwrap(),
            Some(alice.clone())
        );
        assert_eq!(store.find_user_by_id(&alice.id).await.unwrap(), Some(alice));
        assert!(store.find_user_by_email("ALICE@x.com").await.unwrap().is_none());
        assert!(store.find_user_by_id("nope").await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let store = MockGraphStore::new();
        store.seed_user("alice", "alice@x.com").await;

        let err = store
            .create_user("alice2", "alice@x.com", "h")
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::Duplicate {
                field: "email".to_string()
            })
        );

        let err = store
            .create_user("alice", "other@x.com", "h")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Duplicate { field }) if field == "username"
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registration_yields_one_user() {
        let store = MockGraphStore::new();

        let (a, b) = tokio::join!(
            store.create_user("alice", "alice@x.com", "h1"),
            store.create_user("alice_b", "alice@x.com", "h2"),
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
