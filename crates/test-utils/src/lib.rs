//! # Catalog Test Utilities
//!
//! Shared test infrastructure for the catalog-sdl crates: scripted type
//! resolvers that record every call, a progress reporter that keeps every
//! message, fixtures, and snapshot formatting helpers.

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::missing_panics_doc)]
//!
//! ## Quick Start
//!
//! ```ignore
//! use catalog_test_utils::{ScriptedResolver, RecordingReporter};
//!
//! let resolver = ScriptedResolver::new()
//!     .with_input("IdInput", json!({ "properties": { "id": { "type": "string" } } }))
//!     .failing("Widget");
//! let reporter = RecordingReporter::new();
//! let sdl = catalog_to_sdl(&catalog, &resolver, &reporter, &SynthOptions::new()).await?;
//! assert_eq!(resolver.calls(), vec![(TypeKind::Input, "IdInput".into())]);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod reporting;
pub mod tracking;

pub use assertions::{format_calls, format_messages};
pub use reporting::RecordingReporter;
pub use tracking::ScriptedResolver;
