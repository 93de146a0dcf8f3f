//! Driver slot and scoped sessions.
//!
//! A [`Connection`] owns the process-wide driver (for Neo4j, the `neo4rs::Graph`
//! connection pool). Every store operation takes a [`Session`] from it, runs its
//! query through the session and lets it drop. Dropping is the release, so the
//! handle goes back on every exit path, including `?` propagation and panics.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::StoreError;

/// Holds the current driver, if any.
///
/// `install` replaces the driver without waiting for sessions opened against the
/// previous one; those keep their own reference until they drop.
///
/// ```
/// # tokio_test::block_on(async {
/// use project_showcase::neo4j::connection::Connection;
///
/// let conn: Connection<String> = Connection::new();
/// assert!(conn.session().await.is_err());
///
/// conn.install("driver".to_string()).await;
/// {
///     let session = conn.session().await.unwrap();
///     assert_eq!(session.as_str(), "driver");
///     assert_eq!(conn.open_sessions(), 1);
/// }
/// assert_eq!(conn.open_sessions(), 0);
/// # });
/// ```
pub struct Connection<D> {
    driver: RwLock<Option<Arc<D>>>,
    open_sessions: Arc<AtomicUsize>,
    next_session_id: AtomicU64,
}

impl<D> Default for Connection<D> {
    fn default() -> Self {
        Self {
            driver: RwLock::new(None),
            open_sessions: Arc::new(AtomicUsize::new(0)),
            next_session_id: AtomicU64::new(1),
        }
    }
}

impl<D> Connection<D> {
    /// Create an empty (not yet connected) slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a driver, returning the one it replaced.
    pub async fn install(&self, driver: D) -> Option<Arc<D>> {
        let mut slot = self.driver.write().await;
        let previous = slot.replace(Arc::new(driver));
        if previous.is_some() {
            tracing::debug!("Replacing existing driver");
        }
        previous
    }

    /// Remove the driver. Later `session()` calls fail with `NotInitialized`.
    pub async fn take(&self) -> Option<Arc<D>> {
        self.driver.write().await.take()
    }

    /// Whether a driver is installed.
    pub async fn is_connected(&self) -> bool {
        self.driver.read().await.is_some()
    }

    /// Open a new unit of work against the current driver.
    pub async fn session(&self) -> Result<Session<D>, StoreError> {
        let driver = self
            .driver
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotInitialized)?;

        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(session = id, "Session opened");

        Ok(Session {
            id,
            driver,
            open_sessions: self.open_sessions.clone(),
        })
    }

    /// Number of sessions currently alive.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

/// A scoped handle on the driver. Released when dropped.
pub struct Session<D> {
    id: u64,
    driver: Arc<D>,
    open_sessions: Arc<AtomicUsize>,
}

impl<D> Session<D> {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<D> Deref for Session<D> {
    type Target = D;

    fn deref(&self) -> &D {
        &self.driver
    }
}

impl<D> Drop for Session<D> {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(session = self.id, "Session closed");
    }
}
