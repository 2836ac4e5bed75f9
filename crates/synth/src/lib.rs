//! GraphQL SDL synthesis from a remote operation catalog.
//!
//! A catalog maps each group of a service to its query and mutation
//! operations. Every operation names its argument types and its return type;
//! the definitions of those types are looked up one at a time through a
//! [`TypeResolver`] and compiled, depth-first, into SDL `input` and `type`
//! blocks.
//!
//! # Examples
//!
//! ```
//! use catalog_synth::{catalog_to_sdl, NoopReporter, OperationCatalog, StaticResolver, SynthOptions};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog: OperationCatalog = serde_json::from_value(json!({
//!     "users": {
//!         "query": {
//!             "getUser": { "inputTypeNames": ["IdInput"], "returnTypeName": "User", "isArray": false }
//!         },
//!         "mutation": {}
//!     }
//! }))?;
//!
//! let resolver = StaticResolver::new()
//!     .with_input("IdInput", json!({ "properties": { "id": { "type": "string" } }, "required": ["id"] }))
//!     .with_output("User", json!({ "schema": { "properties": { "name": { "bsonType": "string" } } } }));
//!
//! let sdl = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &SynthOptions::new()).await?;
//! assert!(sdl.contains("getUser(IdInput: IdInput): User"));
//! assert!(sdl.contains("input IdInput {\n  id: String!\n}"));
//! # Ok(())
//! # }
//! ```

mod cache;
mod catalog;
mod error;
mod input;
mod options;
mod output;
mod resolver;
mod sdl;
mod traversal;
mod types;

pub use cache::{TypeCache, TypeMark};
pub use catalog::{field_signature, read_catalog, CatalogRoots};
pub use error::{ResolveError, Result, SynthError};
pub use options::{SynthOptions, DEFAULT_RESERVED_MUTATIONS, DEFAULT_RESOLVE_TIMEOUT_SECS};
pub use resolver::{
    NoopReporter, PendingReference, ProgressReporter, StaticResolver, TypeKind, TypeResolver,
};
pub use sdl::{assemble_sdl, placeholder_scalar, SdlDocument, SdlFragment, SCHEMA_BLOCK};
pub use traversal::{FailurePolicy, Traversal};
pub use types::*;

/// The SDL of one pass together with what happened to each referenced type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub sdl: String,
    /// Types that were compiled into `input` or `type` blocks.
    pub compiled: Vec<String>,
    /// Types rendered as `scalar Name` because they could not be resolved.
    pub placeholders: Vec<String>,
    /// Types that could not be resolved and were left out.
    pub dropped: Vec<String>,
    /// Number of resolver calls made.
    pub fetches: usize,
}

/// Runs one synthesis pass over `catalog`.
///
/// Root references are resolved in discovery order, strictly one resolver call
/// at a time. A root reference that cannot be resolved becomes a placeholder
/// scalar so the root field still names a defined type.
///
/// # Errors
///
/// Returns an error if the catalog or a resolved definition is malformed.
/// Resolver failures never surface here.
#[tracing::instrument(skip_all, fields(groups = catalog.len()))]
pub async fn synthesize(
    catalog: &OperationCatalog,
    resolver: &dyn TypeResolver,
    reporter: &dyn ProgressReporter,
    options: &SynthOptions,
) -> Result<Synthesis> {
    reporter.report("Generating SDL");
    let roots = read_catalog(catalog, options)?;

    let mut document = SdlDocument {
        query: roots.query,
        mutation: roots.mutation,
        ..SdlDocument::default()
    };
    let mut traversal = Traversal::new(resolver, reporter, options);

    for reference in roots.pending {
        let name = reference.name.clone();
        let kind = reference.kind;
        let fragment = traversal
            .resolve_reference(reference, FailurePolicy::PlaceholderScalar)
            .await?;

        let section = match (traversal.cache().get(&name), kind) {
            (Some(TypeMark::Placeholder), _) => &mut document.placeholders,
            (_, TypeKind::Input) => &mut document.inputs,
            (_, TypeKind::Output) => &mut document.outputs,
        };
        section.append(fragment);
    }

    let sdl = assemble_sdl(&document);
    let fetches = traversal.fetches();
    let dropped: Vec<String> = traversal.dropped().map(str::to_string).collect();
    let cache = traversal.into_cache();
    let names = |mark: TypeMark| {
        cache
            .iter()
            .filter(|(_, m)| *m == mark)
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>()
    };
    let synthesis = Synthesis {
        compiled: names(TypeMark::Compiled),
        placeholders: names(TypeMark::Placeholder),
        dropped,
        fetches,
        sdl,
    };

    reporter.report("SDL generated");
    tracing::info!(
        sdl_length = synthesis.sdl.len(),
        compiled = synthesis.compiled.len(),
        placeholders = synthesis.placeholders.len(),
        dropped = synthesis.dropped.len(),
        fetches,
        "SDL synthesis complete"
    );
    Ok(synthesis)
}

/// Runs one synthesis pass and returns only the SDL.
///
/// # Errors
///
/// See [`synthesize`].
pub async fn catalog_to_sdl(
    catalog: &OperationCatalog,
    resolver: &dyn TypeResolver,
    reporter: &dyn ProgressReporter,
    options: &SynthOptions,
) -> Result<String> {
    synthesize(catalog, resolver, reporter, options)
        .await
        .map(|synthesis| synthesis.sdl)
}
