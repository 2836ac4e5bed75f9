//! Tunables for a synthesis pass.

use std::time::Duration;

/// Default per-type resolve timeout (30 seconds).
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 30;

/// Mutation names that several groups commonly share.
pub const DEFAULT_RESERVED_MUTATIONS: &[&str] = &["create"];

/// Options for [`catalog_to_sdl`](crate::catalog_to_sdl).
///
/// # Examples
///
/// ```
/// use catalog_synth::SynthOptions;
/// use std::time::Duration;
///
/// let options = SynthOptions::new()
///     .with_reserved_mutations(["create", "update"])
///     .with_resolve_timeout(Some(Duration::from_secs(5)))
///     .with_descriptions(true);
/// assert!(options.is_reserved_mutation("update"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthOptions {
    reserved_mutations: Vec<String>,
    reserved_queries: Vec<String>,
    resolve_timeout: Option<Duration>,
    emit_descriptions: bool,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthOptions {
    /// Default options:
    /// - `create` is a reserved mutation name
    /// - no reserved query names
    /// - 30 second resolve timeout
    /// - descriptions are not emitted
    #[must_use]
    pub fn new() -> Self {
        Self {
            reserved_mutations: DEFAULT_RESERVED_MUTATIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            reserved_queries: Vec::new(),
            resolve_timeout: Some(Duration::from_secs(DEFAULT_RESOLVE_TIMEOUT_SECS)),
            emit_descriptions: false,
        }
    }

    /// Replaces the reserved mutation names. A mutation with one of these
    /// names gets its group name appended.
    #[must_use]
    pub fn with_reserved_mutations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_mutations = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_reserved_queries<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_queries = names.into_iter().map(Into::into).collect();
        self
    }

    /// Bounds every resolver call. `None` waits indefinitely.
    #[must_use]
    pub const fn with_resolve_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Emits operation, type and field descriptions as SDL descriptions.
    #[must_use]
    pub const fn with_descriptions(mut self, enabled: bool) -> Self {
        self.emit_descriptions = enabled;
        self
    }

    #[must_use]
    pub fn is_reserved_mutation(&self, name: &str) -> bool {
        self.reserved_mutations.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn is_reserved_query(&self, name: &str) -> bool {
        self.reserved_queries.iter().any(|n| n == name)
    }

    #[must_use]
    pub const fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout
    }

    #[must_use]
    pub const fn emit_descriptions(&self) -> bool {
        self.emit_descriptions
    }
}
