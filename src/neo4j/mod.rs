//! Neo4j client and models for the showcase graph

pub mod client;
pub mod connection;
pub mod error;
mod impl_graph_store;
pub mod models;
pub mod traits;

pub use client::{ConnectOptions, Neo4jClient};
pub use error::StoreError;
pub use models::*;
pub use traits::GraphStore;

#[cfg(test)]
pub(crate) mod mock;
