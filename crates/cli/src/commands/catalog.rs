//! The `catalog` command: download the raw operation catalog.

use crate::commands::settings::{load_project, resolve_endpoint};
use crate::commands::write_output;
use crate::progress::spinner;
use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct CatalogArgs {
    /// Catalog service URL (optional if the config file has an endpoint)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Output file path (writes to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// HTTP headers to include in the request (can be specified multiple times)
    /// Format: "Header-Name: Header-Value"
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of retry attempts on failure (overrides config file)
    #[arg(long)]
    pub retry: Option<u32>,
}

#[tracing::instrument(skip_all, fields(url = ?args.url))]
pub async fn run(
    args: CatalogArgs,
    config_path: Option<PathBuf>,
    project_name: Option<&str>,
    output_opts: OutputOptions,
) -> Result<()> {
    let start_time = std::time::Instant::now();
    let project = load_project(config_path.as_deref(), project_name)?;
    let settings = resolve_endpoint(
        args.url,
        project.as_ref(),
        &args.headers,
        args.timeout,
        args.retry,
    )?;

    let pb = spinner(
        &format!("Fetching catalog from {}...", settings.url),
        output_opts.show_progress && args.output.is_some(),
    );
    let response = settings.client().fetch_catalog_raw(&settings.url).await;
    pb.finish_and_clear();

    let catalog =
        response.with_context(|| format!("Failed to fetch catalog from {}", settings.url))?;
    let content =
        serde_json::to_string_pretty(&catalog).context("Failed to serialize catalog")?;

    write_output(args.output.as_deref(), &content)?;

    if let Some(path) = args.output {
        if output_opts.show_info {
            let groups = catalog.as_object().map_or(0, serde_json::Map::len);
            println!(
                "{} Catalog downloaded to {} ({} groups)",
                "✓".green(),
                path.display().to_string().cyan(),
                groups
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
