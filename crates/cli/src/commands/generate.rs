//! The `generate` command: operation catalog to GraphQL SDL.

use crate::commands::settings::{load_project, resolve_endpoint, LoadedProject};
use crate::commands::validate::check_sdl;
use crate::commands::write_output;
use crate::progress::{spinner, SpinnerReporter};
use crate::OutputOptions;
use anyhow::{Context, Result};
use catalog_client::RemoteTypeResolver;
use catalog_synth::{
    synthesize, OperationCatalog, ProgressReporter, StaticResolver, SynthOptions, Synthesis,
};
use colored::Colorize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct GenerateArgs {
    /// Catalog service URL (optional if the config file has an endpoint)
    #[arg(value_name = "URL", conflicts_with = "catalog")]
    pub url: Option<String>,

    /// Read the operation catalog from a JSON file instead of a service
    #[arg(long, value_name = "FILE", requires = "types")]
    pub catalog: Option<PathBuf>,

    /// Read type definitions from a JSON file: { "input": {...}, "output": {...} }
    #[arg(long, value_name = "FILE", requires = "catalog")]
    pub types: Option<PathBuf>,

    /// Output file path (writes to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// HTTP headers to include in every request (can be specified multiple times)
    /// Format: "Header-Name: Header-Value"
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request timeout in seconds (overrides config file)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of retry attempts on failure (overrides config file)
    #[arg(long)]
    pub retry: Option<u32>,

    /// Per-type resolve timeout in seconds, 0 to disable (overrides config file)
    #[arg(long, value_name = "SECS")]
    pub resolve_timeout: Option<u64>,

    /// Emit catalog and schema descriptions as SDL descriptions
    #[arg(long)]
    pub descriptions: bool,
}

pub async fn run(
    args: GenerateArgs,
    config_path: Option<PathBuf>,
    project_name: Option<&str>,
    output_opts: OutputOptions,
) -> Result<()> {
    let project = load_project(config_path.as_deref(), project_name)?;
    generate(&args, project.as_ref(), output_opts).await
}

/// Config options with CLI overrides applied.
fn synth_options(args: &GenerateArgs, project: Option<&LoadedProject>) -> SynthOptions {
    let mut options = project.map_or_else(SynthOptions::new, |p| p.config.synth_options());
    if let Some(secs) = args.resolve_timeout {
        options = options.with_resolve_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    if args.descriptions {
        options = options.with_descriptions(true);
    }
    options
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[tracing::instrument(skip_all, fields(offline = args.catalog.is_some()))]
async fn generate(
    args: &GenerateArgs,
    project: Option<&LoadedProject>,
    output_opts: OutputOptions,
) -> Result<()> {
    let start_time = std::time::Instant::now();
    let options = synth_options(args, project);
    let output = args
        .output
        .clone()
        .or_else(|| project.and_then(LoadedProject::output));

    let reporter = SpinnerReporter::new(spinner(
        "Generating SDL",
        output_opts.show_progress && output.is_some(),
    ));
    let result = synthesize_from_source(args, project, &reporter, &options).await;
    reporter.finish();
    let synthesis = result?;

    let (issues, _) = check_sdl(&synthesis.sdl);
    for issue in &issues {
        tracing::warn!(%issue, "Generated SDL has a syntax error");
        eprintln!("{} Generated SDL has a syntax error at {}", "⚠".yellow(), issue);
    }
    if output_opts.show_info && !synthesis.placeholders.is_empty() {
        eprintln!(
            "{} Unresolved types emitted as scalars: {}",
            "⚠".yellow(),
            synthesis.placeholders.join(", ")
        );
    }

    write_output(output.as_deref(), &synthesis.sdl)?;

    if let Some(path) = output {
        if output_opts.show_info {
            println!(
                "{} SDL generated to {} ({} types, {} placeholders, {} dropped)",
                "✓".green(),
                path.display().to_string().cyan(),
                synthesis.compiled.len(),
                synthesis.placeholders.len(),
                synthesis.dropped.len()
            );
            println!("  {} {:.2}s", "⏱".dimmed(), start_time.elapsed().as_secs_f64());
        }
    }

    Ok(())
}

async fn synthesize_from_source(
    args: &GenerateArgs,
    project: Option<&LoadedProject>,
    reporter: &SpinnerReporter,
    options: &SynthOptions,
) -> Result<Synthesis> {
    if let (Some(catalog_path), Some(types_path)) = (&args.catalog, &args.types) {
        let catalog: OperationCatalog = read_json(catalog_path)?;
        let resolver: StaticResolver = read_json(types_path)?;
        tracing::debug!(types = resolver.len(), "Loaded type definitions");
        return synthesize(&catalog, &resolver, reporter, options)
            .await
            .context("Failed to generate SDL");
    }

    let settings = resolve_endpoint(
        args.url.clone(),
        project,
        &args.headers,
        args.timeout,
        args.retry,
    )?;
    let client = settings.client();

    reporter.report(&format!("Fetching catalog from {}", settings.url));
    let catalog = client
        .fetch_catalog(&settings.url)
        .await
        .with_context(|| format!("Failed to fetch catalog from {}", settings.url))?;

    let resolver = RemoteTypeResolver::new(client, settings.types_url.clone());
    synthesize(&catalog, &resolver, reporter, options)
        .await
        .context("Failed to generate SDL")
}
