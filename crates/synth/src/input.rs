//! JSON-Schema input definitions to SDL `input` blocks.

use crate::sdl::write_description;
use crate::traversal::{queue_reference, FailurePolicy, Traversal};
use crate::types::scalar_for;
use crate::{
    InputFieldSpec, InputTypeDefinition, PendingReference, Result, SdlFragment, TypeCache,
    TypeKind, TypeMark, TypeNames,
};
use futures_util::future::BoxFuture;
use std::fmt::Write;

impl<'a> Traversal<'a> {
    /// Compiles `definition` into `input Name { ... }` followed by the blocks
    /// of every input type it references, depth-first.
    ///
    /// Returns an empty fragment if `name` is already cached. A referenced
    /// type that cannot be resolved becomes `scalar Ref`.
    pub fn compile_input<'t>(
        &'t mut self,
        name: &'t str,
        definition: &'t InputTypeDefinition,
    ) -> BoxFuture<'t, Result<SdlFragment>> {
        Box::pin(async move {
            if !self.cache.mark(name, TypeMark::Compiled) {
                tracing::trace!(name, "Input type already handled");
                return Ok(SdlFragment::new());
            }

            let mut references = Vec::new();
            let block = write_input_block(
                name,
                definition,
                &self.cache,
                self.options.emit_descriptions(),
                &mut references,
            );
            tracing::debug!(
                name,
                fields = definition.properties.len(),
                references = references.len(),
                "Compiled input type"
            );

            let mut fragment = SdlFragment::new();
            fragment.push(block);
            for reference in references {
                let nested = self
                    .resolve_reference(reference, FailurePolicy::PlaceholderScalar)
                    .await?;
                fragment.append(nested);
            }
            Ok(fragment)
        })
    }
}

fn write_input_block(
    name: &str,
    definition: &InputTypeDefinition,
    cache: &TypeCache,
    descriptions: bool,
    references: &mut Vec<PendingReference>,
) -> String {
    let mut sdl = String::new();
    if descriptions {
        write_description(&mut sdl, definition.description.as_ref(), 0);
    }
    writeln!(sdl, "input {name} {{").unwrap();

    for (field, spec) in &definition.properties {
        let field_type = input_field_type(spec, cache, references);
        let required = if definition.required.contains(field) {
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

fn input_field_type(
    spec: &InputFieldSpec,
    cache: &TypeCache,
    references: &mut Vec<PendingReference>,
) -> String {
    if let Some(reference) = spec.reference.as_deref() {
        return queue_reference(reference, TypeKind::Input, cache, references)
            .unwrap_or_else(|| "String".to_string());
    }

    match spec.ty.as_ref().and_then(TypeNames::primary) {
        Some("array") => match &spec.items {
            Some(items) => match items.reference.as_deref() {
                Some(reference) => {
                    let element = queue_reference(reference, TypeKind::Input, cache, references)
                        .unwrap_or_else(|| "String".to_string());
                    format!("[{element}]")
                }
                None => format!("[{}]", scalar_for(items.ty.as_ref().and_then(TypeNames::primary))),
            },
            None => "[String]".to_string(),
        },
        primitive => scalar_for(primitive).to_string(),
    }
}
