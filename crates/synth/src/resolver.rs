//! The two collaborators a synthesis pass is handed: a type resolver and a
//! progress reporter.

use crate::ResolveError;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which compiler a type definition is meant for.
///
/// Serializes as the single-letter code the remote service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    #[serde(rename = "i")]
    Input,
    #[serde(rename = "o")]
    Output,
}

impl TypeKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Input => "i",
            Self::Output => "o",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "i" => Some(Self::Input),
            "o" => Some(Self::Output),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// A type name discovered during traversal that still needs resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingReference {
    pub kind: TypeKind,
    pub name: String,
}

impl PendingReference {
    #[must_use]
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Looks up the structural definition of a named type.
///
/// Implementations return the raw JSON definition; the compilers decode it.
/// A pass calls `resolve` once per pending reference, strictly one call at a
/// time.
#[async_trait]
pub trait TypeResolver: Send + Sync {
    async fn resolve(
        &self,
        kind: TypeKind,
        name: &str,
    ) -> Result<serde_json::Value, ResolveError>;
}

/// Receives advisory, human-readable status messages during a pass.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str);
}

/// Reporter that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _message: &str) {}
}

impl<F> ProgressReporter for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message);
    }
}

/// Resolver backed by in-memory definitions.
///
/// Deserializes from `{ "input": { name: definition }, "output": { ... } }`,
/// which is the format of an offline types file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticResolver {
    #[serde(default)]
    input: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    output: IndexMap<String, serde_json::Value>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_input(mut self, name: impl Into<String>, definition: serde_json::Value) -> Self {
        self.insert(TypeKind::Input, name, definition);
        self
    }

    #[must_use]
    pub fn with_output(mut self, name: impl Into<String>, definition: serde_json::Value) -> Self {
        self.insert(TypeKind::Output, name, definition);
        self
    }

    pub fn insert(&mut self, kind: TypeKind, name: impl Into<String>, definition: serde_json::Value) {
        let map = match kind {
            TypeKind::Input => &mut self.input,
            TypeKind::Output => &mut self.output,
        };
        map.insert(name.into(), definition);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.input.len() + self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TypeResolver for StaticResolver {
    async fn resolve(
        &self,
        kind: TypeKind,
        name: &str,
    ) -> Result<serde_json::Value, ResolveError> {
        let map = match kind {
            TypeKind::Input => &self.input,
            TypeKind::Output => &self.output,
        };
        match map.get(name) {
            Some(serde_json::Value::Null) | None => Err(ResolveError::NotFound(name.to_owned())),
            Some(definition) => Ok(definition.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_kind_codes() {
        assert_eq!(TypeKind::Input.code(), "i");
        assert_eq!(TypeKind::Output.code(), "o");
        assert_eq!(TypeKind::from_code("i"), Some(TypeKind::Input));
        assert_eq!(TypeKind::from_code("x"), None);
        assert_eq!(serde_json::to_value(TypeKind::Output).unwrap(), json!("o"));
        assert_eq!(TypeKind::Input.to_string(), "input");
    }

    #[tokio::test]
    async fn test_static_resolver_by_kind() {
        let resolver = StaticResolver::new()
            .with_input("IdInput", json!({ "properties": {} }))
            .with_output("User", json!({ "schema": { "properties": {} } }));

        assert_eq!(resolver.len(), 2);
        assert!(resolver.resolve(TypeKind::Input, "IdInput").await.is_ok());
        assert_eq!(
            resolver.resolve(TypeKind::Output, "IdInput").await,
            Err(ResolveError::NotFound("IdInput".to_string()))
        );
    }

    #[tokio::test]
    async fn test_static_resolver_null_is_not_found() {
        let resolver = StaticResolver::new().with_input("Gone", serde_json::Value::Null);
        assert!(matches!(
            resolver.resolve(TypeKind::Input, "Gone").await,
            Err(ResolveError::NotFound(_))
        ));
    }

    #[test]
    fn test_static_resolver_from_types_file() {
        let resolver: StaticResolver = serde_json::from_value(json!({
            "input": { "IdInput": { "properties": {} } }
        }))
        .unwrap();
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Mutex::new(Vec::new());
        let reporter = |message: &str| seen.lock().unwrap().push(message.to_string());
        reporter.report("Generating SDL");
        NoopReporter.report("ignored");
        assert_eq!(*seen.lock().unwrap(), vec!["Generating SDL"]);
    }
}
