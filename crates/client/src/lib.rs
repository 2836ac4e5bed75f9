//! HTTP transport for catalog services.
//!
//! A catalog service answers a `GET` with its operation catalog and a `PATCH`
//! with the definition of one named type. This crate fetches both and plugs
//! the type lookups into [`catalog_synth`] through [`RemoteTypeResolver`].
//!
//! # Examples
//!
//! ## One-step catalog to SDL
//!
//! ```no_run
//! use catalog_client::catalog_url_to_sdl;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sdl = catalog_url_to_sdl("https://api.example.com/api").await?;
//!     println!("{}", sdl);
//!     Ok(())
//! }
//! ```
//!
//! ## With custom headers, retry and options
//!
//! ```no_run
//! use catalog_client::{CatalogClient, RemoteTypeResolver};
//! use catalog_synth::{catalog_to_sdl, NoopReporter, SynthOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "https://api.example.com/api";
//!     let client = CatalogClient::new()
//!         .with_header("Authorization", "Bearer my-token")
//!         .with_retries(3);
//!
//!     let catalog = client.fetch_catalog(url).await?;
//!     let resolver = RemoteTypeResolver::new(client, url);
//!     let options = SynthOptions::new().with_descriptions(true);
//!     let sdl = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &options).await?;
//!     println!("{}", sdl);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod resolver;

pub use client::CatalogClient;
pub use error::{ClientError, Result};
pub use resolver::RemoteTypeResolver;

use catalog_synth::{catalog_to_sdl, NoopReporter, SynthOptions};

/// Fetches the catalog at `url`, resolves its types against the same URL and
/// returns the synthesized SDL.
///
/// Uses a default [`CatalogClient`] and default [`SynthOptions`].
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or decoded, or if a
/// resolved type definition is malformed. Failed type lookups do not fail
/// the call; they become placeholder scalars.
#[tracing::instrument]
pub async fn catalog_url_to_sdl(url: &str) -> Result<String> {
    let client = CatalogClient::new();
    let catalog = client.fetch_catalog(url).await?;
    let resolver = RemoteTypeResolver::new(client, url);

    catalog_to_sdl(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .map_err(|e| ClientError::Invalid(e.to_string()))
}
