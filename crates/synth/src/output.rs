//! Document-store output definitions to SDL `type` blocks.

use crate::sdl::write_description;
use crate::traversal::{queue_reference, FailurePolicy, Traversal};
use crate::types::scalar_for;
use crate::{
    OutputFieldSpec, OutputTypeDefinition, PendingReference, Result, SdlFragment, TypeCache,
    TypeKind, TypeMark, TypeNames,
};
use futures_util::future::BoxFuture;
use std::fmt::Write;

impl<'a> Traversal<'a> {
    /// Compiles `definition` into `type Name { ... }` followed by the blocks
    /// of every output type it references, depth-first.
    ///
    /// Returns an empty fragment if `name` is already cached. A referenced
    /// type that cannot be resolved is logged and left out.
    pub fn compile_output<'t>(
        &'t mut self,
        name: &'t str,
        definition: &'t OutputTypeDefinition,
    ) -> BoxFuture<'t, Result<SdlFragment>> {
        Box::pin(async move {
            if !self.cache.mark(name, TypeMark::Compiled) {
                tracing::trace!(name, "Output type already handled");
                return Ok(SdlFragment::new());
            }

            let mut references = Vec::new();
            let block = write_output_block(
                name,
                definition,
                &self.cache,
                self.options.emit_descriptions(),
                &mut references,
            );
            tracing::debug!(
                name,
                fields = definition.schema.properties.len(),
                references = references.len(),
                "Compiled output type"
            );

            let mut fragment = SdlFragment::new();
            fragment.push(block);
            for reference in references {
                let nested = self
                    .resolve_reference(reference, FailurePolicy::Drop)
                    .await?;
                fragment.append(nested);
            }
            Ok(fragment)
        })
    }
}

fn write_output_block(
    name: &str,
    definition: &OutputTypeDefinition,
    cache: &TypeCache,
    descriptions: bool,
    references: &mut Vec<PendingReference>,
) -> String {
    let schema = &definition.schema;
    let mut sdl = String::new();
    if descriptions {
        write_description(&mut sdl, schema.description.as_ref(), 0);
    }
    writeln!(sdl, "type {name} {{").unwrap();

    for (field, spec) in &schema.properties {
        let field_type = output_field_type(spec, cache, references);
        let required = if schema.required.contains(field) {
            "!"
        } else {
            ""
        };
        if descriptions {
            write_description(&mut sdl, spec.description.as_ref(), 1);
        }
        writeln!(sdl, "  {field}: {field_type}{required}").unwrap();
    }

    sdl.push('}');
    sdl
}

fn output_field_type(
    spec: &OutputFieldSpec,
    cache: &TypeCache,
    references: &mut Vec<PendingReference>,
) -> String {
    if let Some(reference) = spec.reference.as_deref() {
        return queue_reference(reference, TypeKind::Output, cache, references)
            .unwrap_or_else(|| "String".to_string());
    }

    match spec.bson_type.as_ref().and_then(TypeNames::primary) {
        Some("array") => match &spec.items {
            Some(items) => match items.reference.as_deref() {
                Some(reference) => {
                    let element = queue_reference(reference, TypeKind::Output, cache, references)
                        .unwrap_or_else(|| "String".to_string());
                    format!("[{element}]")
                }
                None => format!(
                    "[{}]",
                    scalar_for(items.bson_type.as_ref().and_then(TypeNames::primary))
                ),
            },
            None => "[String]".to_string(),
        },
        primitive => scalar_for(primitive).to_string(),
    }
}
