//! SDL fragments and final document assembly.

use std::fmt::{self, Write};

/// Root operation binding appended after the `Query` and `Mutation` blocks.
pub const SCHEMA_BLOCK: &str = "schema {\n  query: Query\n  mutation: Mutation\n}";

/// SDL blocks produced by one compiler call, in emission order.
///
/// An empty fragment is the contribution of a type that was already handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdlFragment {
    blocks: Vec<String>,
}

impl SdlFragment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: String) {
        self.blocks.push(block);
    }

    pub fn append(&mut self, other: Self) {
        self.blocks.extend(other.blocks);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

impl fmt::Display for SdlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blocks.join("\n\n"))
    }
}

/// Everything a pass produced, grouped by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdlDocument {
    pub query: String,
    pub mutation: String,
    /// `scalar` stand-ins for root references that could not be resolved.
    pub placeholders: SdlFragment,
    pub inputs: SdlFragment,
    pub outputs: SdlFragment,
}

/// Concatenates the sections of `document` into the final SDL.
///
/// The order is fixed: `Query`, `Mutation`, the `schema` block, placeholder
/// scalars, `input` blocks, then `type` blocks. Blocks are separated by a
/// blank line and the document ends with a single newline.
#[must_use]
pub fn assemble_sdl(document: &SdlDocument) -> String {
    let roots = [
        document.query.as_str(),
        document.mutation.as_str(),
        SCHEMA_BLOCK,
    ];
    let types = document
        .placeholders
        .blocks()
        .iter()
        .chain(document.inputs.blocks())
        .chain(document.outputs.blocks())
        .map(String::as_str);

    let mut sdl = String::new();
    for block in roots.into_iter().chain(types) {
        if !sdl.is_empty() {
            sdl.push_str("\n\n");
        }
        sdl.push_str(block);
    }
    sdl.push('\n');
    sdl
}

/// `scalar Name`, the stand-in for a type that could not be resolved.
#[must_use]
pub fn placeholder_scalar(name: &str) -> String {
    format!("scalar {name}")
}

pub(crate) fn write_description(sdl: &mut String, description: Option<&String>, indent: usize) {
    if let Some(desc) = description.filter(|d| !d.trim().is_empty()) {
        let indent_str = "  ".repeat(indent);
        if desc.contains('\n') {
            let desc = escape_block_string(desc);
            writeln!(sdl, "{indent_str}\"\"\"\n{desc}\n{indent_str}\"\"\"").unwrap();
        } else {
            writeln!(sdl, "{indent_str}\"{}\"", escape_string(desc)).unwrap();
        }
    }
}

/// Block strings only need an embedded `"""` escaped.
fn escape_block_string(s: &str) -> String {
    s.replace("\"\"\"", "\\\"\"\"")
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
