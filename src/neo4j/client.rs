//! Neo4j client for the showcase graph
//!
//! Graph layout:
//!
//! ```text
//! (:User {id, username, email, passwordHash, createdAt})
//! (:Project {name})
//! (:Comment {id, text, createdAt, updatedAt?})
//! (User)-[:LIKES {createdAt}]->(Project)
//! (User)-[:WROTE]->(Comment)-[:ABOUT]->(Project)
//! ```
//!
//! Every operation opens its own session, runs exactly one Cypher statement and
//! drops the session before returning.

use super::connection::{Connection, Session};
use super::error::{StoreError, CONSTRAINT_VIOLATION_CODE};
use super::models::*;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use neo4rs::{query, ConfigBuilder, Graph, Query, Row};

/// Columns every user query returns, bound to the alias `u`.
const USER_COLUMNS: &str = "u.id AS id, u.username AS username, u.email AS email, \
     u.passwordHash AS passwordHash, toString(u.createdAt) AS createdAt";

/// Connection settings for [`Neo4jClient::connect_with`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl ConnectOptions {
    pub fn new(uri: &str, user: &str, password: &str) -> Self {
        Self {
            uri: uri.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

/// Client for Neo4j operations
pub struct Neo4jClient {
    conn: Connection<Graph>,
    like_mode: LikeMode,
}

impl Default for Neo4jClient {
    fn default() -> Self {
        Self::new(LikeMode::default())
    }
}

impl Neo4jClient {
    /// Create a client that is not connected yet.
    pub fn new(like_mode: LikeMode) -> Self {
        Self {
            conn: Connection::new(),
            like_mode,
        }
    }

    // ========================================================================
    // Connection lifecycle
    // ========================================================================

    /// Connect with default pool settings.
    ///
    /// Calling it again replaces the driver; in-flight operations keep the old one.
    pub async fn connect(&self, uri: &str, user: &str, password: &str) -> Result<()> {
        self.connect_with(&ConnectOptions::new(uri, user, password))
            .await
    }

    /// Connect with explicit pool settings.
    pub async fn connect_with(&self, options: &ConnectOptions) -> Result<()> {
        let config = ConfigBuilder::default()
            .uri(options.uri.as_str())
            .user(options.user.as_str())
            .password(options.password.as_str())
            .max_connections(options.max_connections)
            .fetch_size(options.fetch_size)
            .build()
            .context("Invalid Neo4j connection settings")?;

        let graph = Graph::connect(config)
            .await
            .context("Failed to connect to Neo4j")?;

        self.conn.install(graph).await;
        tracing::info!(uri = %options.uri, "Connected to Neo4j");
        Ok(())
    }

    /// Open a session. Fails with `StoreError::NotInitialized` before `connect()`.
    pub async fn get_session(&self) -> Result<Session<Graph>> {
        Ok(self.conn.session().await?)
    }

    /// Release the connection pool. Later operations fail with `NotInitialized`.
    pub async fn close(&self) {
        if self.conn.take().await.is_some() {
            tracing::info!(
                open_sessions = self.conn.open_sessions(),
                "Neo4j connection closed"
            );
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.is_connected().await
    }

    /// Sessions currently checked out.
    pub fn open_sessions(&self) -> usize {
        self.conn.open_sessions()
    }

    pub fn like_mode(&self) -> LikeMode {
        self.like_mode
    }

    /// Round-trip a trivial query. `false` when disconnected or unreachable.
    pub async fn health_check(&self) -> Result<bool> {
        match self.fetch_first(query("RETURN 1 AS ok")).await {
            Ok(row) => Ok(row.is_some()),
            Err(e) => {
                tracing::debug!("Neo4j health check failed: {:#}", e);
                Ok(false)
            }
        }
    }

    /// Install uniqueness constraints so duplicate users and projects are
    /// rejected by the store itself.
    pub async fn init_schema(&self) -> Result<()> {
        let constraints = [
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
            "CREATE CONSTRAINT user_email IF NOT EXISTS FOR (u:User) REQUIRE u.email IS UNIQUE",
            "CREATE CONSTRAINT user_username IF NOT EXISTS FOR (u:User) REQUIRE u.username IS UNIQUE",
            "CREATE CONSTRAINT comment_id IF NOT EXISTS FOR (c:Comment) REQUIRE c.id IS UNIQUE",
            "CREATE CONSTRAINT project_name IF NOT EXISTS FOR (p:Project) REQUIRE p.name IS UNIQUE",
        ];

        for constraint in constraints {
            if let Err(e) = self.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Scoped execution
    // ========================================================================

    /// Run a query in a fresh session and collect its rows.
    async fn fetch_all(&self, q: Query) -> Result<Vec<Row>> {
        let session = self.get_session().await?;
        let mut result = session.execute(q).await.map_err(store_error)?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await.map_err(store_error)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Run a query in a fresh session and return its first row, if any.
    async fn fetch_first(&self, q: Query) -> Result<Option<Row>> {
        Ok(self.fetch_all(q).await?.into_iter().next())
    }

    /// Run a query in a fresh session, discarding results.
    async fn run(&self, q: Query) -> Result<()> {
        let session = self.get_session().await?;
        session.run(q).await.map_err(store_error)?;
        Ok(())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a user node with a generated id and the current time.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserNode> {
        let q = query(&format!(
            r#"
            CREATE (u:User {{
                id: randomUUID(),
                username: $username,
                email: $email,
                passwordHash: $passwordHash,
                createdAt: datetime()
            }})
            RETURN {}
            "#,
            USER_COLUMNS
        ))
        .param("username", username)
        .param("email", email)
        .param("passwordHash", password_hash);

        match self.fetch_first(q).await? {
            Some(row) => row_to_user(&row),
            None => anyhow::bail!("create_user: no row returned"),
        }
    }

    /// Get a user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserNode>> {
        let q = query(&format!(
            "MATCH (u:User {{email: $email}}) RETURN {} LIMIT 1",
            USER_COLUMNS
        ))
        .param("email", email);

        self.fetch_first(q).await?.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<UserNode>> {
        let q = query(&format!(
            "MATCH (u:User {{username: $username}}) RETURN {} LIMIT 1",
            USER_COLUMNS
        ))
        .param("username", username);

        self.fetch_first(q).await?.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by id
    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserNode>> {
        let q = query(&format!(
            "MATCH (u:User {{id: $userId}}) RETURN {} LIMIT 1",
            USER_COLUMNS
        ))
        .param("userId", user_id);

        self.fetch_first(q).await?.map(|r| row_to_user(&r)).transpose()
    }

    /// Count all users
    pub async fn count_users(&self) -> Result<i64> {
        let q = query("MATCH (u:User) RETURN count(u) AS count");
        match self.fetch_first(q).await? {
            Some(row) => Ok(row.get::<i64>("count")?),
            None => Ok(0),
        }
    }

    // ========================================================================
    // Like operations
    // ========================================================================

    /// Like a project (Project node merged by name).
    pub async fn create_like(
        &self,
        user_id: &str,
        project_name: &str,
    ) -> Result<Option<LikeReceipt>> {
        let cypher = match self.like_mode {
            LikeMode::Single => {
                r#"
                MATCH (u:User {id: $userId})
                MERGE (p:Project {name: $projectName})
                MERGE (u)-[l:LIKES]->(p)
                ON CREATE SET l.createdAt = datetime()
                RETURN u.username AS username, toString(l.createdAt) AS createdAt
                ORDER BY l.createdAt ASC
                LIMIT 1
                "#
            }
            LikeMode::Multi => {
                r#"
                MATCH (u:User {id: $userId})
                MERGE (p:Project {name: $projectName})
                CREATE (u)-[l:LIKES {createdAt: datetime()}]->(p)
                RETURN u.username AS username, toString(l.createdAt) AS createdAt
                "#
            }
        };

        let q = query(cypher)
            .param("userId", user_id)
            .param("projectName", project_name);

        match self.fetch_first(q).await? {
            Some(row) => Ok(Some(LikeReceipt {
                username: row.get("username")?,
                created_at: parse_timestamp(&row.get::<String>("createdAt")?)?,
            })),
            None => {
                tracing::debug!(user_id, project_name, "create_like: user not found");
                Ok(None)
            }
        }
    }

    /// Remove all LIKES edges between a user and a project
    pub async fn remove_like(&self, user_id: &str, project_name: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u:User {id: $userId})-[l:LIKES]->(p:Project {name: $projectName})
            DELETE l
            "#,
        )
        .param("userId", user_id)
        .param("projectName", project_name);

        self.run(q).await?;
        Ok(true)
    }

    /// Get all likes of a project, most recent first
    pub async fn get_likes_by_project(&self, project_name: &str) -> Result<Vec<ProjectLike>> {
        let q = query(
            r#"
            MATCH (u:User)-[l:LIKES]->(p:Project {name: $projectName})
            RETURN u.username AS username, u.id AS userId, toString(l.createdAt) AS createdAt
            ORDER BY l.createdAt DESC
            "#,
        )
        .param("projectName", project_name);

        self.fetch_all(q)
            .await?
            .iter()
            .map(|row| {
                Ok(ProjectLike {
                    username: row.get("username")?,
                    user_id: row.get("userId")?,
                    created_at: parse_timestamp(&row.get::<String>("createdAt")?)?,
                })
            })
            .collect()
    }

    /// Check whether a user likes a project
    pub async fn check_user_like(&self, user_id: &str, project_name: &str) -> Result<bool> {
        let q = query(
            r#"
            OPTIONAL MATCH (u:User {id: $userId})-[l:LIKES]->(p:Project {name: $projectName})
            RETURN count(l) > 0 AS liked
            "#,
        )
        .param("userId", user_id)
        .param("projectName", project_name);

        match self.fetch_first(q).await? {
            Some(row) => Ok(row.get::<bool>("liked")?),
            None => Ok(false),
        }
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// Create a comment (Project node merged by name)
    pub async fn create_comment(
        &self,
        user_id: &str,
        project_name: &str,
        text: &str,
    ) -> Result<Option<CreatedComment>> {
        let q = query(
            r#"
            MATCH (u:User {id: $userId})
            MERGE (p:Project {name: $projectName})
            CREATE (c:Comment {
                id: randomUUID(),
                text: $text,
                createdAt: datetime()
            })
            CREATE (u)-[:WROTE]->(c)
            CREATE (c)-[:ABOUT]->(p)
            RETURN c.id AS id, c.text AS text, toString(c.createdAt) AS createdAt,
                   u.username AS username
            "#,
        )
        .param("userId", user_id)
        .param("projectName", project_name)
        .param("text", text);

        match self.fetch_first(q).await? {
            Some(row) => Ok(Some(CreatedComment {
                id: row.get("id")?,
                text: row.get("text")?,
                created_at: parse_timestamp(&row.get::<String>("createdAt")?)?,
                username: row.get("username")?,
            })),
            None => {
                tracing::debug!(user_id, project_name, "create_comment: user not found");
                Ok(None)
            }
        }
    }

    /// Get all comments about a project, newest first
    pub async fn get_comments_by_project(
        &self,
        project_name: &str,
    ) -> Result<Vec<ProjectComment>> {
        let q = query(
            r#"
            MATCH (u:User)-[:WROTE]->(c:Comment)-[:ABOUT]->(p:Project {name: $projectName})
            RETURN c.id AS id, c.text AS text,
                   toString(c.createdAt) AS createdAt, toString(c.updatedAt) AS updatedAt,
                   u.username AS username, u.id AS userId
            ORDER BY c.createdAt DESC
            "#,
        )
        .param("projectName", project_name);

        self.fetch_all(q)
            .await?
            .iter()
            .map(|row| {
                let updated_at = match row.get::<String>("updatedAt").ok() {
                    Some(s) => Some(parse_timestamp(&s)?),
                    None => None,
                };
                Ok(ProjectComment {
                    id: row.get("id")?,
                    text: row.get("text")?,
                    created_at: parse_timestamp(&row.get::<String>("createdAt")?)?,
                    updated_at,
                    username: row.get("username")?,
                    user_id: row.get("userId")?,
                })
            })
            .collect()
    }

    /// Update a comment's text, only through its author's WROTE edge
    pub async fn update_comment(
        &self,
        comment_id: &str,
        user_id: &str,
        new_text: &str,
    ) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u:User {id: $userId})-[:WROTE]->(c:Comment {id: $commentId})
            SET c.text = $newText, c.updatedAt = datetime()
            RETURN c.id AS id
            "#,
        )
        .param("commentId", comment_id)
        .param("userId", user_id)
        .param("newText", new_text);

        Ok(!self.fetch_all(q).await?.is_empty())
    }

    /// Delete a comment, only through its author's WROTE edge
    pub async fn delete_comment(&self, comment_id: &str, user_id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u:User {id: $userId})-[:WROTE]->(c:Comment {id: $commentId})
            DETACH DELETE c
            RETURN count(c) AS deleted
            "#,
        )
        .param("commentId", comment_id)
        .param("userId", user_id);

        match self.fetch_first(q).await? {
            Some(row) => Ok(row.get::<i64>("deleted")? > 0),
            None => Ok(false),
        }
    }
}

/// Convert a driver error, surfacing uniqueness violations as `StoreError::Duplicate`.
fn store_error(err: neo4rs::Error) -> anyhow::Error {
    if let neo4rs::Error::Neo4j(ref e) = err {
        if e.code() == CONSTRAINT_VIOLATION_CODE {
            return StoreError::duplicate_from_message(e.message()).into();
        }
    }
    anyhow::Error::new(err).context("Neo4j query failed")
}

/// Parse a `toString(datetime)` value
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp from store: {}", s))
}

/// Build a UserNode from a row projected with `USER_COLUMNS`
fn row_to_user(row: &Row) -> Result<UserNode> {
    Ok(UserNode {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("passwordHash")?,
        created_at: parse_timestamp(&row.get::<String>("createdAt")?)?,
    })
}
