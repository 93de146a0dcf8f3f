//! Records read from and written to the showcase graph

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// User Node
// ============================================================================

/// A registered account.
///
/// `username` and `email` are stored already normalized (lowercase) by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Likes
// ============================================================================

/// How repeated likes of the same project by the same user are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeMode {
    /// At most one LIKES edge per (User, Project); a repeat like keeps the first timestamp.
    #[default]
    Single,
    /// Every like adds its own LIKES edge.
    Multi,
}

impl std::fmt::Display for LikeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LikeMode::Single => write!(f, "single"),
            LikeMode::Multi => write!(f, "multi"),
        }
    }
}

impl std::str::FromStr for LikeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(LikeMode::Single),
            "multi" => Ok(LikeMode::Multi),
            _ => Err(format!("Unknown like mode: {}", s)),
        }
    }
}

/// Returned by `create_like`: who liked, and the stored edge timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikeReceipt {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// One entry of a project's like list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLike {
    pub username: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Comments
// ============================================================================

/// Returned by `create_comment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedComment {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
}

/// A comment about a project together with its author.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectComment {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub username: String,
    pub user_id: String,
}
