pub mod catalog;
pub mod generate;
pub mod settings;
pub mod validate;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return std::fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()));
    }

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}
