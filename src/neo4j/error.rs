//! Typed store conditions carried inside `anyhow::Error`.
//!
//! Store operations return `anyhow::Result`; the variants here are the
//! conditions a caller may want to branch on, recovered with
//! `err.downcast_ref::<StoreError>()`.

use thiserror::Error;

/// Neo4j status code raised when a uniqueness constraint rejects a write.
pub const CONSTRAINT_VIOLATION_CODE: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An operation ran before `connect()` or after `close()`.
    #[error("Neo4j driver not initialized. Call connect() first.")]
    NotInitialized,

    /// A uniqueness constraint rejected the write.
    #[error("a user with this {field} already exists")]
    Duplicate { field: String },
}

impl StoreError {
    /// Build a `Duplicate` from a Neo4j constraint message such as
    /// "Node(12) already exists with label `User` and property `email` = 'a@b.c'".
    pub fn duplicate_from_message(message: &str) -> Self {
        let field = ["email", "username", "id"]
            .into_iter()
            .find(|f| message.contains(&format!("`{}`", f)))
            .unwrap_or("key");
        StoreError::Duplicate {
            field: field.to_string(),
        }
    }

    /// Whether `err` (or something it wraps) is `NotInitialized`.
    pub fn is_not_initialized(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotInitialized)
        )
    }
}
