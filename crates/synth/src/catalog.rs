//! Reading the operation catalog into the `Query` and `Mutation` root blocks.

use crate::sdl::write_description;
use crate::types::is_builtin_scalar;
use crate::{
    OperationCatalog, OperationDescriptor, PendingReference, Result, SynthError, SynthOptions,
    TypeKind,
};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// The root blocks of a catalog plus every type name they reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRoots {
    pub query: String,
    pub mutation: String,
    /// References in discovery order, each name at most once.
    pub pending: Vec<PendingReference>,
}

#[derive(Debug, Clone, Copy)]
enum RootOperation {
    Query,
    Mutation,
}

impl RootOperation {
    const fn type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

/// Pending references, deduplicated by name. The first discovery of a name
/// decides its kind.
#[derive(Debug, Default)]
struct PendingQueue {
    refs: Vec<PendingReference>,
    seen: HashSet<String>,
}

impl PendingQueue {
    fn push(&mut self, kind: TypeKind, name: &str) {
        if name.is_empty() || is_builtin_scalar(name) {
            return;
        }
        if self.seen.insert(name.to_owned()) {
            self.refs.push(PendingReference::new(kind, name));
        }
    }
}

/// Emits the `Query` and `Mutation` blocks for `catalog`.
///
/// Fields are written across all groups in catalog order. Every argument type
/// is queued as an `input` reference and every return type as an `output`
/// reference, except built-in scalars and names that are themselves groups
/// of the catalog.
///
/// # Errors
///
/// Returns [`SynthError::MalformedCatalog`] if an operation has no return type.
#[tracing::instrument(skip_all, fields(groups = catalog.len()))]
pub fn read_catalog(catalog: &OperationCatalog, options: &SynthOptions) -> Result<CatalogRoots> {
    let mut pending = PendingQueue::default();
    let query = write_root(catalog, RootOperation::Query, options, &mut pending)?;
    let mutation = write_root(catalog, RootOperation::Mutation, options, &mut pending)?;

    tracing::debug!(pending = pending.refs.len(), "Catalog read");
    Ok(CatalogRoots {
        query,
        mutation,
        pending: pending.refs,
    })
}

fn write_root(
    catalog: &OperationCatalog,
    root: RootOperation,
    options: &SynthOptions,
    pending: &mut PendingQueue,
) -> Result<String> {
    let mut sdl = format!("type {} {{\n", root.type_name());

    for (group_name, group) in catalog {
        let operations = match root {
            RootOperation::Query => &group.query,
            RootOperation::Mutation => &group.mutation,
        };

        for (operation_name, operation) in operations {
            if operation.return_type_name.is_empty() {
                return Err(SynthError::MalformedCatalog(format!(
                    "{} operation '{operation_name}' in group '{group_name}' has no return type",
                    root.type_name()
                )));
            }

            let reserved = match root {
                RootOperation::Query => options.is_reserved_query(operation_name),
                RootOperation::Mutation => options.is_reserved_mutation(operation_name),
            };
            let field_name = if reserved {
                format!("{operation_name}{group_name}")
            } else {
                operation_name.clone()
            };

            if options.emit_descriptions() {
                write_description(&mut sdl, operation.description.as_ref(), 1);
            }
            writeln!(sdl, "  {}", field_signature(&field_name, operation)).unwrap();

            for input in &operation.input_type_names {
                if !catalog.contains_key(input) {
                    pending.push(TypeKind::Input, input);
                }
            }
            if !catalog.contains_key(&operation.return_type_name) {
                pending.push(TypeKind::Output, &operation.return_type_name);
            }
        }
    }

    sdl.push('}');
    Ok(sdl)
}

/// `name(Arg: Arg, ...): Shape`, or `name: Shape` without inputs.
///
/// Argument names repeat their type name; a repeated type gets an increasing
/// numeric suffix so argument names stay unique within the field.
#[must_use]
pub fn field_signature(name: &str, operation: &OperationDescriptor) -> String {
    let shape = operation.return_shape();
    if operation.input_type_names.is_empty() {
        return format!("{name}: {shape}");
    }

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    let args = operation
        .input_type_names
        .iter()
        .map(|type_name| {
            let seen = occurrences.entry(type_name.as_str()).or_insert(0);
            let arg = if *seen == 0 {
                type_name.clone()
            } else {
                format!("{type_name}{seen}")
            };
            *seen += 1;
            format!("{arg}: {type_name}")
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{name}({args}): {shape}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: serde_json::Value) -> OperationCatalog {
        serde_json::from_value(value).unwrap()
    }

    fn op(inputs: &[&str], ret: &str, is_array: bool) -> OperationDescriptor {
        OperationDescriptor {
            input_type_names: inputs.iter().map(ToString::to_string).collect(),
            return_type_name: ret.to_string(),
            is_array,
            description: None,
        }
    }

    #[test]
    fn test_signature_without_inputs() {
        assert_eq!(field_signature("getUsers", &op(&[], "User", true)), "getUsers: [User]");
        assert_eq!(field_signature("me", &op(&[], "User", false)), "me: User");
    }

    #[test]
    fn test_signature_argument_decollision() {
        assert_eq!(
            field_signature("find", &op(&["FilterInput", "FilterInput"], "User", false)),
            "find(FilterInput: FilterInput, FilterInput1: FilterInput): User"
        );
        assert_eq!(
            field_signature("find", &op(&["A", "B", "A", "A"], "User", true)),
            "find(A: A, B: B, A1: A, A2: A): [User]"
        );
    }

    #[test]
    fn test_read_catalog_roots() {
        let catalog = catalog(json!({
            "users": {
                "query": {
                    "getUser": { "inputTypeNames": ["IdInput"], "returnTypeName": "User", "isArray": false }
                },
                "mutation": {}
            }
        }));

        let roots = read_catalog(&catalog, &SynthOptions::new()).unwrap();
        assert_eq!(roots.query, "type Query {\n  getUser(IdInput: IdInput): User\n}");
        assert_eq!(roots.mutation, "type Mutation {\n}");
        assert_eq!(
            roots.pending,
            vec![
                PendingReference::new(TypeKind::Input, "IdInput"),
                PendingReference::new(TypeKind::Output, "User"),
            ]
        );
    }

    #[test]
    fn test_reserved_mutation_gets_group_suffix() {
        let catalog = catalog(json!({
            "users": { "mutation": { "create": { "input": ["UserInput"], "type": "GeneralResponse" } } },
            "orgs": { "mutation": { "create": { "input": ["OrgInput"], "type": "GeneralResponse" } } }
        }));

        let roots = read_catalog(&catalog, &SynthOptions::new()).unwrap();
        assert_eq!(
            roots.mutation,
            "type Mutation {\n  \
             createusers(UserInput: UserInput): GeneralResponse\n  \
             createorgs(OrgInput: OrgInput): GeneralResponse\n}"
        );
    }

    #[test]
    fn test_reserved_query_names() {
        let catalog = catalog(json!({
            "orgs": { "query": { "find": { "type": "Organisation", "isArray": true } } }
        }));
        let options = SynthOptions::new().with_reserved_queries(["find"]);

        let roots = read_catalog(&catalog, &options).unwrap();
        assert_eq!(roots.query, "type Query {\n  findorgs: [Organisation]\n}");
    }

    #[test]
    fn test_pending_skips_group_names_and_duplicates() {
        let catalog = catalog(json!({
            "User": {
                "query": {
                    "me": { "type": "User" },
                    "list": { "input": ["PageInput", "PageInput"], "type": "Page" }
                },
                "mutation": {
                    "update": { "input": ["User", "PageInput", "String"], "type": "Page" }
                }
            }
        }));

        let roots = read_catalog(&catalog, &SynthOptions::new()).unwrap();
        assert_eq!(
            roots.pending,
            vec![
                PendingReference::new(TypeKind::Input, "PageInput"),
                PendingReference::new(TypeKind::Output, "Page"),
            ]
        );
    }

    #[test]
    fn test_query_fields_span_groups_in_order() {
        let catalog = catalog(json!({
            "b": { "query": { "two": { "type": "T" } } },
            "a": { "query": { "one": { "type": "T" } }, "mutation": { "three": { "type": "T" } } }
        }));

        let roots = read_catalog(&catalog, &SynthOptions::new()).unwrap();
        assert_eq!(roots.query, "type Query {\n  two: T\n  one: T\n}");
        assert_eq!(roots.mutation, "type Mutation {\n  three: T\n}");
    }

    #[test]
    fn test_descriptions_when_enabled() {
        let catalog = catalog(json!({
            "users": { "query": { "me": { "type": "User", "description": "Current user" } } }
        }));
        let options = SynthOptions::new().with_descriptions(true);

        let roots = read_catalog(&catalog, &options).unwrap();
        assert_eq!(roots.query, "type Query {\n  \"Current user\"\n  me: User\n}");
    }

    #[test]
    fn test_missing_return_type_is_malformed() {
        let catalog = catalog(json!({
            "users": { "query": { "broken": { "input": ["IdInput"] } } }
        }));

        let err = read_catalog(&catalog, &SynthOptions::new()).unwrap_err();
        assert!(matches!(err, SynthError::MalformedCatalog(_)));
        assert!(err.to_string().contains("broken"));
    }
}
