//! Short-lived cache for completion listings.
//!
//! Tab completion may fire several times while the user types one word;
//! caching each listing for a few hundred milliseconds avoids re-running
//! the same backend query on every keystroke.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::backend::{Backend, KubectlQueries};
use crate::error::ShellResult;

/// Identifies one backend listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Namespace names.
    Namespaces,
    /// Resource type names.
    ResourceTypes,
    /// Instance names of one resource type.
    Resources(String),
}

#[derive(Debug)]
struct Entry {
    fetched_at: Instant,
    names: Vec<String>,
}

/// Backend listings with time-bounded memoization.
pub struct CachedQueries {
    backend: Arc<dyn Backend>,
    ttl: Duration,
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generation: AtomicU64,
}

impl CachedQueries {
    /// Creates a cache over `backend`; a zero `ttl` disables caching.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            entries: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Namespace names.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing had to be fetched and failed.
    pub fn namespaces(&self) -> ShellResult<Vec<String>> {
        self.fetch(QueryKey::Namespaces)
    }

    /// Resource type names.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing had to be fetched and failed.
    pub fn resource_types(&self) -> ShellResult<Vec<String>> {
        self.fetch(QueryKey::ResourceTypes)
    }

    /// Instance names of `kind`.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing had to be fetched and failed.
    pub fn resources(&self, kind: &str) -> ShellResult<Vec<String>> {
        self.fetch(QueryKey::Resources(kind.to_string()))
    }

    /// Forgets every entry, including fetches still in flight.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().clear();
    }

    fn fetch(&self, key: QueryKey) -> ShellResult<Vec<String>> {
        if self.ttl.is_zero() {
            return self.query(&key);
        }

        if let Some(entry) = self.entries.lock().get(&key) {
            if entry.fetched_at.elapsed() < self.ttl {
                trace!(?key, "completion cache hit");
                return Ok(entry.names.clone());
            }
        }

        // The lock is not held across the subprocess call.
        let generation = self.generation.load(Ordering::SeqCst);
        let names = self.query(&key)?;
        let mut entries = self.entries.lock();
        if self.generation.load(Ordering::SeqCst) == generation {
            entries.insert(
                key,
                Entry {
                    fetched_at: Instant::now(),
                    names: names.clone(),
                },
            );
        }
        Ok(names)
    }

    fn query(&self, key: &QueryKey) -> ShellResult<Vec<String>> {
        match key {
            QueryKey::Namespaces => self.backend.namespaces(),
            QueryKey::ResourceTypes => self.backend.resource_types(),
            QueryKey::Resources(kind) => self.backend.resources_of_type(kind),
        }
    }
}
