use crate::{CatalogConfig, ConfigError, EndpointConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".catalogrc.yml",
    ".catalogrc.yaml",
    ".catalogrc.json",
    ".catalogrc.toml",
    ".catalogrc",
    "catalog.config.yml",
    "catalog.config.yaml",
    "catalog.config.json",
    "catalog.config.toml",
];

/// Find a catalog config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a catalog config from the specified path.
/// Automatically detects the format based on file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<CatalogConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        projects = config.project_count(),
        multi_project = config.is_multi_project(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a catalog config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<CatalogConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        "toml" => parse_toml(contents, path)?,
        "" if file_name == ".catalogrc" => {
            tracing::trace!("Trying YAML then JSON for .catalogrc");
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<CatalogConfig> {
    serde_saphyr::from_str(contents).map_err(|e| invalid(path, format!("YAML parse error: {e}")))
}

fn parse_json(contents: &str, path: &Path) -> Result<CatalogConfig> {
    serde_json::from_str(contents).map_err(|e| invalid(path, format!("JSON parse error: {e}")))
}

fn parse_toml(contents: &str, path: &Path) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| invalid(path, format!("TOML parse error: {e}")))
}

fn invalid(path: &Path, message: String) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    }
}

#[tracing::instrument(skip(config, path), fields(path = %path.display(), projects = config.project_count()))]
fn validate_config(config: &CatalogConfig, path: &Path) -> Result<()> {
    if config.is_multi_project() && config.project_count() == 0 {
        return Err(invalid(path, "No projects configured".to_string()));
    }

    for (project_name, project_config) in config.projects() {
        tracing::trace!(project = project_name, "Validating project config");

        if let Some(endpoint) = &project_config.endpoint {
            validate_endpoint(endpoint, project_name, path)?;
        }

        if let Some(generate) = &project_config.generate {
            if generate.reserved_names().any(|name| name.trim().is_empty()) {
                return Err(invalid(
                    path,
                    format!("Project '{project_name}' has an empty reserved operation name"),
                ));
            }
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}

fn validate_endpoint(endpoint: &EndpointConfig, project_name: &str, path: &Path) -> Result<()> {
    let urls = std::iter::once(("url", endpoint.url.as_str()))
        .chain(endpoint.types_url.as_deref().map(|url| ("typesUrl", url)));

    for (key, url) in urls {
        if url.trim().is_empty() {
            return Err(invalid(
                path,
                format!("Project '{project_name}' has an empty endpoint {key}"),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(
                path,
                format!("Project '{project_name}' endpoint {key} must be an http(s) URL, got '{url}'"),
            ));
        }
    }
    Ok(())
}
