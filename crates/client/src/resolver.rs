//! [`TypeResolver`] over HTTP.

use crate::{CatalogClient, ClientError};
use async_trait::async_trait;
use catalog_synth::{ResolveError, TypeKind, TypeResolver};

/// Resolves types by `PATCH`ing `{ "t": kind, "n": name }` to `url`.
#[derive(Debug, Clone)]
pub struct RemoteTypeResolver {
    client: CatalogClient,
    url: String,
}

impl RemoteTypeResolver {
    #[must_use]
    pub fn new(client: CatalogClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TypeResolver for RemoteTypeResolver {
    async fn resolve(&self, kind: TypeKind, name: &str) -> Result<serde_json::Value, ResolveError> {
        match self.client.fetch_type(&self.url, kind, name).await {
            Ok(definition) => Ok(definition),
            Err(ClientError::Invalid(_)) => Err(ResolveError::NotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
