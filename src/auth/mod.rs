//! Credential helpers used by the HTTP layer

pub mod password;
pub mod validation;

pub use password::{hash_password, verify_password};
