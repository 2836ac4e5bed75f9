//! Shared catalog and type fixtures.
//!
//! Use these for tests that need a realistic service, not a particular shape.
//! When the catalog structure is what the test is about, prefer an inline
//! fixture so the test documents itself.

use crate::ScriptedResolver;
use serde_json::{json, Value};

/// A small property-management service: users, organisations and a
/// mutation named `create` in two groups.
pub fn property_catalog() -> Value {
    json!({
        "users": {
            "query": {
                "loginWithPassword": { "input": ["LoginInput"], "type": "AuthToken", "isArray": false, "description": "Exchange credentials for a token" },
                "getUsers": { "input": ["FilterQueryInput", "PageInput"], "type": "User", "isArray": true, "description": "" },
                "myProfile": { "input": [], "type": "User", "isArray": false, "description": "" }
            },
            "mutation": {
                "create": { "input": ["UserInput"], "type": "GeneralResponse", "isArray": false, "description": "" }
            }
        },
        "orgs": {
            "query": {
                "find": { "input": ["FilterQueryInput", "PageInput"], "type": "Organisation", "isArray": true, "description": "" }
            },
            "mutation": {
                "create": { "input": ["OrganisationInput"], "type": "GeneralResponse", "isArray": false, "description": "" },
                "updateById": { "input": ["String", "OrganisationInput"], "type": "GeneralResponse", "isArray": false, "description": "" }
            }
        }
    })
}

/// Definitions for every type [`property_catalog`] references, except
/// `FilterQueryInput`, which fails to resolve.
pub fn property_resolver() -> ScriptedResolver {
    ScriptedResolver::new()
        .with_input(
            "LoginInput",
            json!({
                "properties": {
                    "email": { "type": "string" },
                    "password": { "type": "string" }
                },
                "required": ["email", "password"]
            }),
        )
        .with_input(
            "PageInput",
            json!({
                "properties": {
                    "page": { "type": "integer" },
                    "limit": { "type": "integer" }
                }
            }),
        )
        .with_input(
            "UserInput",
            json!({
                "properties": {
                    "name": { "type": "string" },
                    "address": { "$ref": "#/AddressInput" }
                },
                "required": ["name"]
            }),
        )
        .with_input(
            "OrganisationInput",
            json!({
                "properties": {
                    "title": { "type": "string" },
                    "offices": { "type": "array", "items": { "$ref": "#/AddressInput" } }
                },
                "required": ["title"]
            }),
        )
        .with_input(
            "AddressInput",
            json!({
                "properties": {
                    "city": { "type": "string" },
                    "zip": { "type": "string" }
                },
                "required": ["city"]
            }),
        )
        .with_output(
            "AuthToken",
            json!({ "schema": { "properties": { "token": { "bsonType": "string" } }, "required": ["token"] } }),
        )
        .with_output(
            "User",
            json!({
                "schema": {
                    "properties": {
                        "_id": { "bsonType": "objectId" },
                        "name": { "bsonType": "string" },
                        "age": { "bsonType": "integer" },
                        "organisations": { "bsonType": "array", "items": { "$ref": "#/Organisation" } }
                    },
                    "required": ["_id", "name"]
                }
            }),
        )
        .with_output(
            "Organisation",
            json!({
                "schema": {
                    "properties": {
                        "title": { "bsonType": "string" },
                        "verified": { "bsonType": "boolean" }
                    },
                    "required": ["title"]
                }
            }),
        )
        .with_output(
            "GeneralResponse",
            json!({
                "schema": {
                    "properties": {
                        "success": { "bsonType": "boolean" },
                        "message": { "bsonType": "string" }
                    },
                    "required": ["success"]
                }
            }),
        )
        .failing("FilterQueryInput")
}
