mod config;
mod error;
mod loader;

pub use config::{CatalogConfig, EndpointConfig, GenerateConfig, ProjectConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
