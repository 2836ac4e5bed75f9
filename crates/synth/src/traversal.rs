//! Per-pass traversal state shared by the input and output compilers.

use crate::sdl::placeholder_scalar;
use crate::types::{is_builtin_scalar, ref_name};
use crate::{
    InputTypeDefinition, OutputTypeDefinition, PendingReference, ProgressReporter, ResolveError,
    Result, SdlFragment, SynthError, SynthOptions, TypeCache, TypeKind, TypeMark, TypeResolver,
};
use futures_util::future::BoxFuture;
use indexmap::IndexSet;
use serde::de::DeserializeOwned;

/// What to emit when a queued reference cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Emit `scalar Name` and cache the name as a placeholder.
    PlaceholderScalar,
    /// Log the failure and contribute nothing. The name is not cached, so a
    /// later placeholder-policy reference fetches it again.
    Drop,
}

/// The cache, resolver and reporter of one synthesis pass.
///
/// Input and output compilation recurse into each other through a single
/// `Traversal`, so a type handled by either compiler is never handled again.
pub struct Traversal<'a> {
    pub(crate) cache: TypeCache,
    resolver: &'a dyn TypeResolver,
    reporter: &'a dyn ProgressReporter,
    pub(crate) options: &'a SynthOptions,
    dropped: IndexSet<String>,
    fetches: usize,
}

impl<'a> Traversal<'a> {
    #[must_use]
    pub fn new(
        resolver: &'a dyn TypeResolver,
        reporter: &'a dyn ProgressReporter,
        options: &'a SynthOptions,
    ) -> Self {
        Self {
            cache: TypeCache::new(),
            resolver,
            reporter,
            options,
            dropped: IndexSet::new(),
            fetches: 0,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Number of resolver calls made so far.
    #[must_use]
    pub const fn fetches(&self) -> usize {
        self.fetches
    }

    /// Names dropped under [`FailurePolicy::Drop`] that nothing defined
    /// later in the pass, in the order they were first dropped.
    pub fn dropped(&self) -> impl Iterator<Item = &str> + '_ {
        self.dropped
            .iter()
            .map(String::as_str)
            .filter(|name| !self.cache.contains(name))
    }

    #[must_use]
    pub fn into_cache(self) -> TypeCache {
        self.cache
    }

    /// Fetches and compiles `reference`, depth-first.
    ///
    /// Returns an empty fragment if the name is already cached, or if it was
    /// dropped before and `policy` would drop it again. Resolution failures
    /// are recovered according to `policy`; a definition that does not decode
    /// aborts the pass.
    pub fn resolve_reference<'t>(
        &'t mut self,
        reference: PendingReference,
        policy: FailurePolicy,
    ) -> BoxFuture<'t, Result<SdlFragment>> {
        Box::pin(async move {
            if self.cache.contains(&reference.name)
                || (policy == FailurePolicy::Drop && self.dropped.contains(&reference.name))
            {
                return Ok(SdlFragment::new());
            }

            self.reporter
                .report(&format!("Fetching type {}", reference.name));

            let definition = match self.fetch(&reference).await {
                Ok(definition) => definition,
                Err(error) => return Ok(self.recover(&reference, &error, policy)),
            };

            match reference.kind {
                TypeKind::Input => {
                    let definition: InputTypeDefinition = decode(&reference, definition)?;
                    self.compile_input(&reference.name, &definition).await
                }
                TypeKind::Output => {
                    let definition: OutputTypeDefinition = decode(&reference, definition)?;
                    self.compile_output(&reference.name, &definition).await
                }
            }
        })
    }

    /// One resolver call, bounded by the configured resolve timeout.
    async fn fetch(&mut self, reference: &PendingReference) -> std::result::Result<serde_json::Value, ResolveError> {
        self.fetches += 1;
        tracing::debug!(kind = %reference.kind, name = %reference.name, "Resolving type");

        let call = self.resolver.resolve(reference.kind, &reference.name);
        let definition = match self.options.resolve_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(ResolveError::Timeout(limit)))?,
            None => call.await?,
        };

        if definition.is_null() {
            return Err(ResolveError::NotFound(reference.name.clone()));
        }
        Ok(definition)
    }

    fn recover(
        &mut self,
        reference: &PendingReference,
        error: &ResolveError,
        policy: FailurePolicy,
    ) -> SdlFragment {
        self.reporter
            .report(&format!("Failed to fetch {}", reference.name));

        let mut fragment = SdlFragment::new();
        match policy {
            FailurePolicy::PlaceholderScalar => {
                tracing::warn!(
                    kind = %reference.kind,
                    name = %reference.name,
                    error = %error,
                    "Type resolution failed, substituting placeholder scalar"
                );
                if self.cache.mark(&reference.name, TypeMark::Placeholder) {
                    fragment.push(placeholder_scalar(&reference.name));
                }
            }
            FailurePolicy::Drop => {
                tracing::warn!(
                    kind = %reference.kind,
                    name = %reference.name,
                    error = %error,
                    "Type resolution failed, dropping type"
                );
                self.dropped.insert(reference.name.clone());
            }
        }
        fragment
    }
}

fn decode<T: DeserializeOwned>(reference: &PendingReference, definition: serde_json::Value) -> Result<T> {
    serde_json::from_value(definition).map_err(|e| SynthError::MalformedDefinition {
        kind: reference.kind,
        name: reference.name.clone(),
        message: e.to_string(),
    })
}

/// Queues the type named by `reference` unless it is cached or already
/// queued, and returns the name to use as the SDL type. Built-in scalars are
/// used as-is and never queued.
pub(crate) fn queue_reference(
    reference: &str,
    kind: TypeKind,
    cache: &TypeCache,
    queued: &mut Vec<PendingReference>,
) -> Option<String> {
    let name = ref_name(reference)?;
    if !is_builtin_scalar(name)
        && !cache.contains(name)
        && !queued.iter().any(|pending| pending.name == name)
    {
        queued.push(PendingReference::new(kind, name));
    }
    Some(name.to_owned())
}
