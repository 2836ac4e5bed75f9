use catalog_synth::SynthOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level catalog configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogConfig {
    /// Multi-project configuration
    Multi {
        projects: HashMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl CatalogConfig {
    /// Get all projects as an iterator.
    /// For single project configs, yields a single item with name "default".
    #[must_use]
    pub fn projects(&self) -> Box<dyn Iterator<Item = (&str, &ProjectConfig)> + '_> {
        match self {
            Self::Single(config) => Box::new(std::iter::once(("default", config.as_ref()))),
            Self::Multi { projects } => Box::new(
                projects
                    .iter()
                    .map(|(name, config)| (name.as_str(), config)),
            ),
        }
    }

    /// Get a specific project by name.
    /// For single project configs, returns the project if name is "default".
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        match self {
            Self::Single(config) if name == "default" => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { projects } => projects.get(name),
        }
    }

    /// Project names in sorted order.
    #[must_use]
    pub fn project_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.projects().map(|(name, _)| name).collect();
        names.sort_unstable();
        names
    }

    /// Check if this is a multi-project configuration
    #[must_use]
    pub const fn is_multi_project(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    /// Get the number of projects
    #[must_use]
    pub fn project_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { projects } => projects.len(),
        }
    }
}

/// Configuration for a single catalog service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Where the catalog and the type definitions are served
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointConfig>,

    /// How the SDL is generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateConfig>,
}

impl ProjectConfig {
    /// Synthesis options for this project; defaults when `generate` is absent.
    #[must_use]
    pub fn synth_options(&self) -> SynthOptions {
        self.generate
            .as_ref()
            .map_or_else(SynthOptions::new, GenerateConfig::synth_options)
    }

    /// Output file for the generated SDL, if configured.
    #[must_use]
    pub fn output(&self) -> Option<&PathBuf> {
        self.generate.as_ref().and_then(|g| g.output.as_ref())
    }
}

/// Configuration for the remote catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// URL that serves the catalog (`GET`) and, unless `typesUrl` is set,
    /// type definitions (`PATCH`)
    pub url: String,

    /// Separate URL for type definition lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types_url: Option<String>,

    /// HTTP headers sent with every request (e.g., for authentication)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Number of retry attempts on failure (default: 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,
}

impl EndpointConfig {
    /// The URL type definitions are looked up at.
    #[must_use]
    pub fn types_url(&self) -> &str {
        self.types_url.as_deref().unwrap_or(&self.url)
    }
}

/// SDL generation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    /// Mutation names that get their group name appended (default: `[create]`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_mutations: Option<Vec<String>>,

    /// Query names that get their group name appended (default: none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_queries: Option<Vec<String>>,

    /// Per-type resolve timeout in seconds; `0` disables it (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_timeout: Option<u64>,

    /// Emit catalog and schema descriptions as SDL descriptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<bool>,

    /// File the SDL is written to (default: stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl GenerateConfig {
    #[must_use]
    pub fn synth_options(&self) -> SynthOptions {
        let mut options = SynthOptions::new();
        if let Some(names) = &self.reserved_mutations {
            options = options.with_reserved_mutations(names.iter().cloned());
        }
        if let Some(names) = &self.reserved_queries {
            options = options.with_reserved_queries(names.iter().cloned());
        }
        if let Some(secs) = self.resolve_timeout {
            options = options.with_resolve_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        if let Some(descriptions) = self.descriptions {
            options = options.with_descriptions(descriptions);
        }
        options
    }

    /// All reserved names, mutations first.
    pub(crate) fn reserved_names(&self) -> impl Iterator<Item = &str> {
        self.reserved_mutations
            .iter()
            .chain(self.reserved_queries.iter())
            .flatten()
            .map(String::as_str)
    }
}
