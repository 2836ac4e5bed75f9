//! Resolver call tracking for testing resolution order and caching.
//!
//! [`ScriptedResolver`] serves definitions from memory, fails or stalls on
//! request, and records every call so tests can assert how often and in
//! which order a pass asked for each type.
//!
//! ## Usage
//!
//! ```ignore
//! let resolver = ScriptedResolver::new().with_output("User", user_json);
//!
//! let checkpoint = resolver.checkpoint();
//! catalog_to_sdl(&catalog, &resolver, &NoopReporter, &options).await?;
//! assert_eq!(resolver.count_since("User", checkpoint), 1);
//! ```

use async_trait::async_trait;
use catalog_synth::{ResolveError, TypeKind, TypeResolver};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct ResolveLog {
    calls: Vec<(TypeKind, String)>,
    counts: HashMap<String, usize>,
}

impl ResolveLog {
    fn record(&mut self, kind: TypeKind, name: &str) {
        self.calls.push((kind, name.to_string()));
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    fn checkpoint(&self) -> usize {
        self.calls.len()
    }

    fn count_since(&self, name: &str, checkpoint: usize) -> usize {
        self.calls[checkpoint..]
            .iter()
            .filter(|(_, n)| n == name)
            .count()
    }

    fn total_count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

/// An in-memory [`TypeResolver`] with scripted failures and delays.
///
/// Each instance has its own call log, so tests stay hermetic when run in
/// parallel.
#[derive(Clone, Default)]
pub struct ScriptedResolver {
    definitions: HashMap<(TypeKind, String), serde_json::Value>,
    failures: HashMap<String, ResolveError>,
    delays: HashMap<String, Duration>,
    log: Arc<Mutex<ResolveLog>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, name: &str, definition: serde_json::Value) -> Self {
        self.definitions
            .insert((TypeKind::Input, name.to_string()), definition);
        self
    }

    pub fn with_output(mut self, name: &str, definition: serde_json::Value) -> Self {
        self.definitions
            .insert((TypeKind::Output, name.to_string()), definition);
        self
    }

    /// Every lookup of `name` fails with a network error.
    pub fn failing(self, name: &str) -> Self {
        self.failing_with(name, ResolveError::Network(format!("{name} unavailable")))
    }

    pub fn failing_with(mut self, name: &str, error: ResolveError) -> Self {
        self.failures.insert(name.to_string(), error);
        self
    }

    /// Every lookup of `name` sleeps for `delay` before answering.
    pub fn delayed(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    fn with_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ResolveLog) -> R,
    {
        f(&self.log.lock().expect("ResolveLog mutex poisoned"))
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<(TypeKind, String)> {
        self.with_log(|log| log.calls.clone())
    }

    /// Names of every call so far, in order.
    pub fn names(&self) -> Vec<String> {
        self.with_log(|log| log.calls.iter().map(|(_, name)| name.clone()).collect())
    }

    /// Get the current checkpoint (log position) for later comparison.
    pub fn checkpoint(&self) -> usize {
        self.with_log(ResolveLog::checkpoint)
    }

    /// Count lookups of `name` since the given checkpoint.
    pub fn count_since(&self, name: &str, checkpoint: usize) -> usize {
        self.with_log(|log| log.count_since(name, checkpoint))
    }

    pub fn total_count(&self, name: &str) -> usize {
        self.with_log(|log| log.total_count(name))
    }

    /// Highest number of lookups that were ever in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TypeResolver for ScriptedResolver {
    async fn resolve(
        &self,
        kind: TypeKind,
        name: &str,
    ) -> Result<serde_json::Value, ResolveError> {
        self.log
            .lock()
            .expect("ResolveLog mutex poisoned")
            .record(kind, name);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }

        let result = if let Some(error) = self.failures.get(name) {
            Err(error.clone())
        } else {
            self.definitions
                .get(&(kind, name.to_string()))
                .cloned()
                .ok_or_else(|| ResolveError::NotFound(name.to_string()))
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
