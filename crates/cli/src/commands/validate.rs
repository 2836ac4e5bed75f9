//! SDL syntax checking with `apollo-parser`.

use crate::exit_code::SyntaxErrors;
use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// One syntax error, with a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Parses `sdl` and returns every syntax error plus the number of top-level
/// definitions.
pub fn check_sdl(sdl: &str) -> (Vec<SyntaxIssue>, usize) {
    let tree = apollo_parser::Parser::new(sdl).parse();

    let issues = tree
        .errors()
        .map(|e| {
            let (line, column) = line_col(sdl, e.index());
            SyntaxIssue {
                message: e.message().to_string(),
                line,
                column,
            }
        })
        .collect();
    let definitions = tree.document().definitions().count();

    (issues, definitions)
}

fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}

#[tracing::instrument(skip(output_opts), fields(file = %file.display()))]
pub fn run(file: &Path, output_opts: OutputOptions) -> Result<()> {
    let sdl = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let (issues, definitions) = check_sdl(&sdl);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!(
                "{} {}:{}",
                "✗".red(),
                file.display().to_string().cyan(),
                issue
            );
        }
        return Err(SyntaxErrors(issues.len()).into());
    }

    if output_opts.show_info {
        println!(
            "{} {} is valid SDL ({} definitions)",
            "✓".green(),
            file.display().to_string().cyan(),
            definitions
        );
    }
    Ok(())
}
