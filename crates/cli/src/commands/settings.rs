//! Endpoint and project settings shared by the network commands.
//!
//! Settings come from an explicit URL or the config file, with CLI flags
//! taking precedence over config values.

use anyhow::{Context, Result};
use catalog_client::CatalogClient;
use catalog_config::{find_config, load_config, ProjectConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout in seconds for catalog and type requests.
const DEFAULT_TIMEOUT: u64 = 30;

/// A project loaded from a config file, with the directory relative paths
/// in it resolve against.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub base_dir: PathBuf,
}

impl LoadedProject {
    /// The configured output file, resolved against the config directory.
    pub fn output(&self) -> Option<PathBuf> {
        self.config.output().map(|path| self.base_dir.join(path))
    }
}

/// Resolved endpoint settings from config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    pub url: String,
    pub types_url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: u64,
    pub retry: u32,
}

impl EndpointSettings {
    pub fn client(&self) -> CatalogClient {
        CatalogClient::new()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retries(self.retry)
            .with_headers(self.headers.iter().cloned())
    }
}

/// Loads the selected project.
///
/// With an explicit `config_path` the file must load. Otherwise the config is
/// discovered from the working directory and is optional unless a project
/// name was given.
pub fn load_project(
    config_path: Option<&Path>,
    project_name: Option<&str>,
) -> Result<Option<LoadedProject>> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let current_dir = std::env::current_dir()?;
            match find_config(&current_dir).context("Failed to search for config")? {
                Some(path) => path,
                None if project_name.is_some() => anyhow::bail!(
                    "No catalog config file found. Use --config to specify one."
                ),
                None => return Ok(None),
            }
        }
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let project_name = project_name.unwrap_or("default");
    let project = config.get_project(project_name).with_context(|| {
        if config.is_multi_project() {
            format!(
                "Project '{}' not found. Available projects: {}",
                project_name,
                config.project_names().join(", ")
            )
        } else {
            format!("Project '{project_name}' not found")
        }
    })?;

    let base_dir = config_path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    Ok(Some(LoadedProject {
        config: project.clone(),
        base_dir,
    }))
}

/// Parses a header string in "Name: Value" format.
pub fn parse_header(header: &str) -> Result<(String, String)> {
    let Some((name, value)) = header.split_once(':') else {
        anyhow::bail!("Invalid header format: '{header}'. Expected 'Header-Name: Header-Value'");
    };
    let name = name.trim().to_string();
    let value = value.trim().to_string();
    if name.is_empty() {
        anyhow::bail!("Header name cannot be empty");
    }
    Ok((name, value))
}

/// Resolve endpoint settings from URL/config and CLI overrides.
///
/// A URL argument serves both the catalog and the type lookups, and the
/// configured endpoint is not consulted.
pub fn resolve_endpoint(
    url: Option<String>,
    project: Option<&LoadedProject>,
    cli_headers: &[String],
    cli_timeout: Option<u64>,
    cli_retry: Option<u32>,
) -> Result<EndpointSettings> {
    let cli_parsed = cli_headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Vec<_>>>()
        .context("Failed to parse headers")?;

    if let Some(url) = url {
        return Ok(EndpointSettings {
            types_url: url.clone(),
            url,
            headers: cli_parsed,
            timeout: cli_timeout.unwrap_or(DEFAULT_TIMEOUT),
            retry: cli_retry.unwrap_or(0),
        });
    }

    let Some(endpoint) = project.and_then(|p| p.config.endpoint.as_ref()) else {
        anyhow::bail!(
            "Either a URL argument or a config file with an endpoint is required.\n\n\
            Usage:\n  \
            catalog-sdl generate <URL>\n  \
            catalog-sdl generate --project <NAME>"
        );
    };

    let mut headers: Vec<(String, String)> = endpoint
        .headers
        .clone()
        .unwrap_or_default()
        .into_iter()
        .collect();
    headers.sort();

    for (name, value) in cli_parsed {
        headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        headers.push((name, value));
    }

    Ok(EndpointSettings {
        url: endpoint.url.clone(),
        types_url: endpoint.types_url().to_string(),
        headers,
        timeout: cli_timeout.unwrap_or(endpoint.timeout.unwrap_or(DEFAULT_TIMEOUT)),
        retry: cli_retry.unwrap_or(endpoint.retry.unwrap_or(0)),
    })
}
