//! Integration tests for catalog-synth.
//!
//! These drive whole synthesis passes through a scripted resolver and check
//! the assembled SDL, the order of resolver calls, and the progress messages.

use catalog_synth::{
    catalog_to_sdl, synthesize, NoopReporter, OperationCatalog, ResolveError, SynthOptions,
    TypeKind,
};
use catalog_test_utils::fixtures::{property_catalog, property_resolver};
use catalog_test_utils::{format_calls, format_messages, RecordingReporter, ScriptedResolver};
use serde_json::{json, Value};
use std::time::Duration;

fn catalog(value: Value) -> OperationCatalog {
    serde_json::from_value(value).unwrap()
}

fn get_user_catalog() -> OperationCatalog {
    catalog(json!({
        "users": {
            "query": {
                "getUser": { "inputTypeNames": ["IdInput"], "returnTypeName": "User", "isArray": false }
            },
            "mutation": {}
        }
    }))
}

fn id_input() -> Value {
    json!({ "properties": { "id": { "type": "string" } }, "required": ["id"] })
}

fn user_output() -> Value {
    json!({ "schema": { "properties": { "name": { "bsonType": "string" } }, "required": ["name"] } })
}

fn assert_parses(sdl: &str) {
    let tree = apollo_parser::Parser::new(sdl).parse();
    let errors: Vec<_> = tree.errors().collect();
    assert!(errors.is_empty(), "SDL failed to parse: {errors:?}\n{sdl}");
}

#[tokio::test]
async fn test_single_query_document() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", id_input())
        .with_output("User", user_output());

    let sdl = catalog_to_sdl(&get_user_catalog(), &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert_eq!(
        sdl,
        "type Query {\n  getUser(IdInput: IdInput): User\n}\n\n\
         type Mutation {\n}\n\n\
         schema {\n  query: Query\n  mutation: Mutation\n}\n\n\
         input IdInput {\n  id: String!\n}\n\n\
         type User {\n  name: String!\n}\n"
    );
    assert_eq!(
        format_calls(&resolver.calls()),
        "[1] input IdInput\n[2] output User"
    );
}

#[tokio::test]
async fn test_array_query_without_inputs() {
    let catalog = catalog(json!({
        "users": { "query": { "getUsers": { "inputTypeNames": [], "returnTypeName": "User", "isArray": true } } }
    }));
    let resolver = ScriptedResolver::new().with_output("User", user_output());

    let sdl = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(sdl.starts_with("type Query {\n  getUsers: [User]\n}"));
    assert!(sdl.contains("type User {\n  name: String!\n}"));
    assert_eq!(resolver.names(), vec!["User"]);
}

#[tokio::test]
async fn test_nested_input_follows_its_parent() {
    let resolver = ScriptedResolver::new()
        .with_input(
            "IdInput",
            json!({
                "properties": {
                    "id": { "type": "string" },
                    "meta": { "$ref": "#/MetaInput" }
                },
                "required": ["id"]
            }),
        )
        .with_input("MetaInput", json!({ "properties": { "k": { "type": "string" } } }))
        .with_output("User", user_output());

    let sdl = catalog_to_sdl(&get_user_catalog(), &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(sdl.contains(
        "input IdInput {\n  id: String!\n  meta: MetaInput\n}\n\n\
         input MetaInput {\n  k: String\n}\n\n\
         type User {"
    ));
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] input IdInput
    [2] input MetaInput
    [3] output User
    ");
}

#[tokio::test]
async fn test_unresolvable_nested_input_becomes_scalar() {
    let resolver = ScriptedResolver::new()
        .with_input(
            "IdInput",
            json!({ "properties": { "widget": { "$ref": "#/Widget" } } }),
        )
        .with_output("User", user_output())
        .failing("Widget");
    let reporter = RecordingReporter::new();

    let sdl = catalog_to_sdl(&get_user_catalog(), &resolver, &reporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(sdl.contains("input IdInput {\n  widget: Widget\n}\n\nscalar Widget"));
    assert!(!sdl.contains("input Widget {"));
    assert!(reporter.contains("Failed to fetch Widget"));
    assert_parses(&sdl);
}

fn shared_input_resolver() -> ScriptedResolver {
    ScriptedResolver::new()
        .with_input("AInput", json!({ "properties": { "s": { "$ref": "#/SharedInput" } } }))
        .with_input(
            "BInput",
            json!({ "properties": { "s": { "type": "array", "items": { "$ref": "#/SharedInput" } } } }),
        )
        .with_input("SharedInput", json!({ "properties": { "line": { "type": "string" } } }))
        .with_output("Place", json!({ "schema": { "properties": { "id": { "bsonType": "objectId" } } } }))
}

fn search_catalog(inputs: &[&str]) -> OperationCatalog {
    catalog(json!({
        "places": {
            "query": { "search": { "input": inputs, "type": "Place" } },
            "mutation": { "move": { "input": ["BInput"], "type": "Place" } }
        }
    }))
}

#[tokio::test]
async fn test_shared_nested_type_resolved_once() {
    let resolver = shared_input_resolver();

    let sdl = catalog_to_sdl(
        &search_catalog(&["AInput", "BInput"]),
        &resolver,
        &NoopReporter,
        &SynthOptions::new(),
    )
    .await
    .unwrap();

    assert_eq!(sdl.matches("input SharedInput {").count(), 1);
    assert!(sdl.contains("input BInput {\n  s: [SharedInput]\n}"));
    assert_eq!(resolver.total_count("SharedInput"), 1);
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] input AInput
    [2] input SharedInput
    [3] input BInput
    [4] output Place
    ");
    assert_parses(&sdl);
}

#[tokio::test]
async fn test_shared_nested_type_resolved_once_in_reverse_order() {
    let resolver = shared_input_resolver();

    let sdl = catalog_to_sdl(
        &search_catalog(&["BInput", "AInput"]),
        &resolver,
        &NoopReporter,
        &SynthOptions::new(),
    )
    .await
    .unwrap();

    assert_eq!(sdl.matches("input SharedInput {").count(), 1);
    assert!(sdl.contains(
        "input BInput {\n  s: [SharedInput]\n}\n\n\
         input SharedInput {\n  line: String\n}\n\n\
         input AInput {\n  s: SharedInput\n}"
    ));
    assert_eq!(resolver.total_count("SharedInput"), 1);
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] input BInput
    [2] input SharedInput
    [3] input AInput
    [4] output Place
    ");
    assert_parses(&sdl);
}

fn tag_resolver() -> ScriptedResolver {
    ScriptedResolver::new()
        .with_input("TagQueryInput", json!({ "properties": { "tag": { "$ref": "#/Tag" } } }))
        .with_output("Post", json!({ "schema": { "properties": { "tag": { "$ref": "#/Tag" } } } }))
        .with_input("Tag", json!({ "properties": { "label": { "type": "string" } } }))
        .with_output("Tag", json!({ "schema": { "properties": { "label": { "bsonType": "string" } } } }))
}

fn tag_definitions(sdl: &str) -> usize {
    sdl.lines()
        .filter(|line| *line == "input Tag {" || *line == "type Tag {" || *line == "scalar Tag")
        .count()
}

#[tokio::test]
async fn test_name_shared_by_input_and_output_resolved_once() {
    let input_first = catalog(json!({
        "posts": {
            "query": {
                "byTag": { "input": ["TagQueryInput"], "type": "Boolean" },
                "latest": { "type": "Post" }
            }
        }
    }));
    let resolver = tag_resolver();

    let sdl = catalog_to_sdl(&input_first, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert_eq!(tag_definitions(&sdl), 1);
    assert!(sdl.contains("input Tag {\n  label: String\n}"));
    assert!(sdl.contains("type Post {\n  tag: Tag\n}"));
    assert_eq!(resolver.total_count("Tag"), 1);
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] input TagQueryInput
    [2] input Tag
    [3] output Post
    ");
}

#[tokio::test]
async fn test_name_shared_by_output_and_input_resolved_once() {
    let output_first = catalog(json!({
        "posts": {
            "query": {
                "latest": { "type": "Post" },
                "byTag": { "input": ["TagQueryInput"], "type": "Boolean" }
            }
        }
    }));
    let resolver = tag_resolver();

    let sdl = catalog_to_sdl(&output_first, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert_eq!(tag_definitions(&sdl), 1);
    assert!(sdl.contains("type Tag {\n  label: String\n}"));
    assert!(sdl.contains("input TagQueryInput {\n  tag: Tag\n}"));
    assert_eq!(resolver.total_count("Tag"), 1);
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] output Post
    [2] output Tag
    [3] input TagQueryInput
    ");
}

#[tokio::test]
async fn test_mutually_referencing_inputs_terminate() {
    let catalog = catalog(json!({
        "trees": { "mutation": { "plant": { "input": ["NodeInput"], "type": "Boolean" } } }
    }));
    let resolver = ScriptedResolver::new()
        .with_input(
            "NodeInput",
            json!({ "properties": { "parent": { "$ref": "#/NodeInput" }, "leaf": { "$ref": "#/LeafInput" } } }),
        )
        .with_input(
            "LeafInput",
            json!({ "properties": { "node": { "$ref": "#/NodeInput" } } }),
        );

    let sdl = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(sdl.contains("input NodeInput {\n  parent: NodeInput\n  leaf: LeafInput\n}"));
    assert!(sdl.contains("input LeafInput {\n  node: NodeInput\n}"));
    assert_eq!(resolver.names(), vec!["NodeInput", "LeafInput"]);
}

#[tokio::test]
async fn test_failed_nested_output_is_dropped() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", id_input())
        .with_output(
            "User",
            json!({ "schema": { "properties": { "address": { "$ref": "#/Address" } } } }),
        )
        .failing("Address");

    let synthesis = synthesize(&get_user_catalog(), &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(synthesis.sdl.contains("type User {\n  address: Address\n}"));
    assert!(!synthesis.sdl.contains("scalar Address"));
    assert!(!synthesis.sdl.contains("type Address {"));
    assert_eq!(synthesis.dropped, vec!["Address"]);
}

#[tokio::test]
async fn test_dropped_output_named_by_root_becomes_placeholder() {
    let catalog = catalog(json!({
        "users": {
            "query": {
                "me": { "type": "User" },
                "home": { "type": "Address" }
            }
        }
    }));
    let resolver = ScriptedResolver::new().with_output(
        "User",
        json!({ "schema": { "properties": { "addr": { "$ref": "#/Address" } } } }),
    );

    let synthesis = synthesize(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(synthesis.sdl.contains("  home: Address\n"));
    assert!(synthesis.sdl.contains("type User {\n  addr: Address\n}"));
    assert_eq!(synthesis.sdl.matches("scalar Address").count(), 1);
    assert_eq!(synthesis.placeholders, vec!["Address"]);
    assert!(synthesis.dropped.is_empty());
    assert_eq!(resolver.total_count("Address"), 2);
    assert_parses(&synthesis.sdl);
}

#[tokio::test]
async fn test_dropped_output_named_by_input_becomes_placeholder() {
    let catalog = catalog(json!({
        "users": {
            "query": {
                "me": { "type": "User" },
                "save": { "input": ["SaveInput"], "type": "Boolean" }
            }
        }
    }));
    let resolver = ScriptedResolver::new()
        .with_output(
            "User",
            json!({ "schema": { "properties": { "addr": { "$ref": "#/Address" } } } }),
        )
        .with_input("SaveInput", json!({ "properties": { "addr": { "$ref": "#/Address" } } }));

    let synthesis = synthesize(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(synthesis
        .sdl
        .contains("input SaveInput {\n  addr: Address\n}\n\nscalar Address"));
    assert!(synthesis.dropped.is_empty());
    insta::assert_snapshot!(format_calls(&resolver.calls()), @r"
    [1] output User
    [2] output Address
    [3] input SaveInput
    [4] input Address
    ");
}

#[tokio::test]
async fn test_failed_root_output_becomes_placeholder() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", id_input())
        .failing_with("User", ResolveError::Http(500, "boom".to_string()));

    let synthesis = synthesize(&get_user_catalog(), &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert!(synthesis.sdl.contains(
        "mutation: Mutation\n}\n\nscalar User\n\ninput IdInput {"
    ));
    assert_eq!(synthesis.placeholders, vec!["User"]);
    assert_eq!(synthesis.compiled, vec!["IdInput"]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failure() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", id_input())
        .with_output("User", user_output())
        .delayed("User", Duration::from_secs(60));
    let options = SynthOptions::new().with_resolve_timeout(Some(Duration::from_secs(1)));
    let reporter = RecordingReporter::new();

    let sdl = catalog_to_sdl(&get_user_catalog(), &resolver, &reporter, &options)
        .await
        .unwrap();

    assert!(sdl.contains("scalar User"));
    assert!(!sdl.contains("type User {"));
    assert!(reporter.contains("Failed to fetch User"));
}

#[tokio::test]
async fn test_resolver_calls_are_sequential() {
    let resolver = property_resolver()
        .delayed("LoginInput", Duration::from_millis(5))
        .delayed("User", Duration::from_millis(5));
    let catalog: OperationCatalog = serde_json::from_value(property_catalog()).unwrap();

    catalog_to_sdl(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    assert_eq!(resolver.max_in_flight(), 1);
}

#[tokio::test]
async fn test_progress_messages() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", id_input())
        .failing("User");
    let reporter = RecordingReporter::new();

    catalog_to_sdl(&get_user_catalog(), &resolver, &reporter, &SynthOptions::new())
        .await
        .unwrap();

    insta::assert_snapshot!(format_messages(&reporter.messages()), @r"
    [1] Generating SDL
    [2] Fetching type IdInput
    [3] Fetching type User
    [4] Failed to fetch User
    [5] SDL generated
    ");
}

#[tokio::test]
async fn test_passes_are_deterministic() {
    let catalog: OperationCatalog = serde_json::from_value(property_catalog()).unwrap();
    let options = SynthOptions::new();

    let resolver = property_resolver();

    let first = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &options)
        .await
        .unwrap();
    let checkpoint = resolver.checkpoint();
    let second = catalog_to_sdl(&catalog, &resolver, &NoopReporter, &options)
        .await
        .unwrap();

    assert_eq!(first, second);
    // Each pass starts with an empty cache.
    assert_eq!(resolver.count_since("User", checkpoint), 1);
    assert_eq!(resolver.count_since("AddressInput", checkpoint), 1);
    assert_eq!(resolver.total_count("User"), 2);
}

#[tokio::test]
async fn test_each_type_defined_once() {
    let catalog: OperationCatalog = serde_json::from_value(property_catalog()).unwrap();
    let resolver = property_resolver();

    let synthesis = synthesize(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    for name in synthesis.compiled.iter().chain(&synthesis.placeholders) {
        let definitions = synthesis
            .sdl
            .lines()
            .filter(|line| {
                *line == format!("input {name} {{")
                    || *line == format!("type {name} {{")
                    || *line == format!("scalar {name}")
            })
            .count();
        assert_eq!(definitions, 1, "{name} defined {definitions} times");
        assert_eq!(resolver.total_count(name), 1, "{name} resolved more than once");
    }
    assert_eq!(synthesis.fetches, resolver.calls().len());
}

#[tokio::test]
async fn test_property_service_document() {
    let catalog: OperationCatalog = serde_json::from_value(property_catalog()).unwrap();
    let resolver = property_resolver();

    let synthesis = synthesize(&catalog, &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap();

    insta::assert_snapshot!(synthesis.sdl.trim_end(), @r"
    type Query {
      loginWithPassword(LoginInput: LoginInput): AuthToken
      getUsers(FilterQueryInput: FilterQueryInput, PageInput: PageInput): [User]
      myProfile: User
      find(FilterQueryInput: FilterQueryInput, PageInput: PageInput): [Organisation]
    }

    type Mutation {
      createusers(UserInput: UserInput): GeneralResponse
      createorgs(OrganisationInput: OrganisationInput): GeneralResponse
      updateById(String: String, OrganisationInput: OrganisationInput): GeneralResponse
    }

    schema {
      query: Query
      mutation: Mutation
    }

    scalar FilterQueryInput

    input LoginInput {
      email: String!
      password: String!
    }

    input PageInput {
      page: Int
      limit: Int
    }

    input UserInput {
      name: String!
      address: AddressInput
    }

    input AddressInput {
      city: String!
      zip: String
    }

    input OrganisationInput {
      title: String!
      offices: [AddressInput]
    }

    type AuthToken {
      token: String!
    }

    type User {
      _id: String!
      name: String!
      age: Int
      organisations: [Organisation]
    }

    type Organisation {
      title: String!
      verified: Boolean
    }

    type GeneralResponse {
      success: Boolean!
      message: String
    }
    ");

    assert_eq!(synthesis.placeholders, vec!["FilterQueryInput"]);
    assert_eq!(synthesis.fetches, 10);
    assert_eq!(resolver.total_count("Organisation"), 1);
    assert_eq!(resolver.total_count("AddressInput"), 1);
    assert_parses(&synthesis.sdl);
}

#[tokio::test]
async fn test_descriptions_in_document() {
    let catalog: OperationCatalog = serde_json::from_value(property_catalog()).unwrap();
    let options = SynthOptions::new().with_descriptions(true);

    let sdl = catalog_to_sdl(&catalog, &property_resolver(), &NoopReporter, &options)
        .await
        .unwrap();

    assert!(sdl.contains(
        "  \"Exchange credentials for a token\"\n  loginWithPassword(LoginInput: LoginInput): AuthToken"
    ));
    assert!(!sdl.contains("\"\""));
    assert_parses(&sdl);
}

#[tokio::test]
async fn test_malformed_definition_aborts_pass() {
    let resolver = ScriptedResolver::new()
        .with_input("IdInput", json!({ "properties": "not a map" }))
        .with_output("User", user_output());

    let err = catalog_to_sdl(&get_user_catalog(), &resolver, &NoopReporter, &SynthOptions::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("IdInput"));
    assert_eq!(resolver.calls(), vec![(TypeKind::Input, "IdInput".to_string())]);
}
