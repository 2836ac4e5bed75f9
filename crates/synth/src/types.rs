//! Type definitions for operation catalogs and resolved type definitions.
//!
//! These mirror the JSON documents served by the remote service and can be
//! deserialized with serde. Maps are [`IndexMap`]s because declaration order
//! decides SDL field order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Group name to the queries and mutations that group exposes.
pub type OperationCatalog = IndexMap<String, OperationGroup>;

/// Operation name to its descriptor, in declaration order.
pub type OperationMap = IndexMap<String, OperationDescriptor>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationGroup {
    #[serde(default)]
    pub query: OperationMap,
    #[serde(default)]
    pub mutation: OperationMap,
}

/// One resolver field of the catalog.
///
/// The service itself sends the short keys `input` and `type`; both spellings
/// deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    #[serde(default, alias = "input")]
    pub input_type_names: Vec<String>,
    #[serde(default, alias = "type")]
    pub return_type_name: String,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OperationDescriptor {
    /// The SDL result type, list-wrapped when the operation returns many.
    #[must_use]
    pub fn return_shape(&self) -> String {
        if self.is_array {
            format!("[{}]", self.return_type_name)
        } else {
            self.return_type_name.clone()
        }
    }
}

/// A `type` or `bsonType` value: either one name or a union such as
/// `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeNames {
    Single(String),
    Union(Vec<String>),
}

impl TypeNames {
    /// The name that decides the SDL mapping: the single name, or the first
    /// non-`null` member of a union.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name.as_str()),
            Self::Union(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null"),
        }
    }
}

/// JSON-Schema input definition as served for kind `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTypeDefinition {
    pub properties: IndexMap<String, InputFieldSpec>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFieldSpec {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeNames>,
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<InputItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputItems {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeNames>,
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Document-store output definition as served for kind `o`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTypeDefinition {
    pub schema: OutputSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub properties: IndexMap<String, OutputFieldSpec>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFieldSpec {
    #[serde(default, rename = "bsonType", skip_serializing_if = "Option::is_none")]
    pub bson_type: Option<TypeNames>,
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<OutputItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItems {
    #[serde(default, rename = "bsonType", skip_serializing_if = "Option::is_none")]
    pub bson_type: Option<TypeNames>,
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Built-in GraphQL scalar types. They are never queued for resolution.
pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

#[must_use]
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Extracts the type name from a `$ref` such as `#/definitions/MetaInput`.
///
/// Returns `None` when the last path segment is empty.
#[must_use]
pub fn ref_name(reference: &str) -> Option<&str> {
    reference.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Maps a JSON-Schema or BSON primitive onto a built-in GraphQL scalar.
///
/// Unknown names (including `object` and `objectId`) map to `String`.
#[must_use]
pub fn scalar_for(primitive: Option<&str>) -> &'static str {
    match primitive.map(str::to_ascii_lowercase).as_deref() {
        Some("number" | "double" | "decimal") => "Float",
        Some("integer" | "int" | "long") => "Int",
        Some("boolean" | "bool") => "Boolean",
        _ => "String",
    }
}
