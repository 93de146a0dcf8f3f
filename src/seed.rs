//! First-boot demo accounts.

use anyhow::{Context, Result};

use crate::neo4j::GraphStore;

/// SHA-256 hex digest of `password`, shared by both demo accounts.
pub const DEMO_PASSWORD_HASH: &str =
    "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";

/// (username, email) of the demo accounts.
pub const DEMO_USERS: [(&str, &str); 2] = [
    ("demo", "demo@tcc-saude.com"),
    ("test", "test@example.com"),
];

/// Create the demo accounts if the store holds no users at all.
///
/// Returns whether anything was created. Not meant to run alongside
/// registration traffic: a user registered between the count and the inserts
/// does not stop the seeding.
pub async fn initialize_demo_users(store: &dyn GraphStore) -> Result<bool> {
    let count = store
        .count_users()
        .await
        .context("Failed to count users")?;

    if count != 0 {
        tracing::debug!(count, "Users already present, skipping demo seed");
        return Ok(false);
    }

    for (username, email) in DEMO_USERS {
        store
            .create_user(username, email, DEMO_PASSWORD_HASH)
            .await
            .with_context(|| format!("Failed to create demo user {}", username))?;
    }

    tracing::info!("Demo users created in Neo4j");
    Ok(true)
}
