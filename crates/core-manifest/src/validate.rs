//! Validation for catalog and promotion documents
//!
//! Structure is checked against a JSON Schema; the rules a schema cannot
//! express (unique Warehouses, unique Requirement origins, non-blank repository
//! URLs after normalization) are checked afterwards.

use crate::error::{Error, Result};
use crate::repo_url::normalize_repo_url;
use crate::warehouse::Warehouse;
use crate::{Catalog, PromotionDocument};
use jsonschema::{ValidationError, Validator};
use serde_json::{json, Value};
use std::collections::HashSet;

/// Validate a catalog against its JSON Schema and semantic rules
pub fn validate_catalog(catalog: &Catalog) -> Result<()> {
    validate_against(&get_catalog_schema(), &serde_json::to_value(catalog)?, "Catalog")?;

    let mut seen = HashSet::new();
    for warehouse in &catalog.warehouses {
        validate_warehouse(warehouse)?;
        let namespace = if warehouse.namespace.is_empty() {
            catalog.default_namespace.as_deref().unwrap_or_default()
        } else {
            warehouse.namespace.as_str()
        };
        if !seen.insert((namespace, warehouse.name.as_str())) {
            return Err(Error::validation(format!(
                "Warehouse {:?} declared more than once in namespace {:?}",
                warehouse.name, namespace
            )));
        }
    }
    Ok(())
}

/// Validate a single Warehouse
pub fn validate_warehouse(warehouse: &Warehouse) -> Result<()> {
    if warehouse.name.trim().is_empty() {
        return Err(Error::missing_field("name"));
    }
    for (i, sub) in warehouse.subscriptions.iter().enumerate() {
        if normalize_repo_url(sub.repo_url()).is_empty() {
            return Err(Error::validation(format!(
                "Warehouse {:?} subscription {} has an empty repoURL",
                warehouse.name, i
            )));
        }
    }
    Ok(())
}

/// Validate a promotion document against its JSON Schema and semantic rules
pub fn validate_promotion(doc: &PromotionDocument) -> Result<()> {
    validate_against(&get_promotion_schema(), &serde_json::to_value(doc)?, "Promotion document")?;

    let mut origins = HashSet::new();
    for requirement in &doc.requirements {
        if !origins.insert(&requirement.origin) {
            return Err(Error::validation(format!(
                "Freight from origin {} requested more than once",
                requirement.origin
            )));
        }
    }
    Ok(())
}

fn validate_against(schema: &Value, value: &Value, what: &str) -> Result<()> {
    let compiled = Validator::new(schema)
        .map_err(|e| Error::validation(format!("Failed to compile schema: {}", e)))?;

    if let Err(errors) = compiled.validate(value) {
        let error_messages: Vec<String> = errors
            .map(|e| format_validation_error(&e))
            .collect();

        return Err(Error::validation(format!(
            "{} validation failed:\n  - {}",
            what,
            error_messages.join("\n  - ")
        )));
    }
    Ok(())
}

/// Format a validation error into a readable string
fn format_validation_error(error: &ValidationError) -> String {
    format!("{}: {}", error.instance_path, error)
}

fn definitions() -> Value {
    json!({
        "origin": {
            "type": "object",
            "required": ["kind", "name"],
            "properties": {
                "kind": { "type": "string", "enum": ["Warehouse"] },
                "name": { "type": "string", "minLength": 1 }
            }
        },
        "repoURL": { "type": "string", "minLength": 1 },
        "subscription": {
            "type": "object",
            "minProperties": 1,
            "maxProperties": 1,
            "properties": {
                "git": {
                    "type": "object",
                    "required": ["repoURL"],
                    "properties": { "repoURL": { "$ref": "#/$defs/repoURL" } }
                },
                "image": {
                    "type": "object",
                    "required": ["repoURL"],
                    "properties": { "repoURL": { "$ref": "#/$defs/repoURL" } }
                },
                "chart": {
                    "type": "object",
                    "required": ["repoURL"],
                    "properties": {
                        "repoURL": { "$ref": "#/$defs/repoURL" },
                        "name": { "type": "string" }
                    }
                }
            },
            "additionalProperties": false
        },
        "warehouse": {
            "type": "object",
            "required": ["name"],
            "properties": {
                "namespace": { "type": "string" },
                "name": { "type": "string", "minLength": 1 },
                "subscriptions": {
                    "type": "array",
                    "items": { "$ref": "#/$defs/subscription" }
                }
            }
        },
        "requirement": {
            "type": "object",
            "required": ["origin"],
            "properties": {
                "origin": { "$ref": "#/$defs/origin" }
            }
        },
        "freight": {
            "type": "object",
            "required": ["origin"],
            "properties": {
                "name": { "type": "string" },
                "origin": { "$ref": "#/$defs/origin" },
                "commits": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["repoURL", "id"],
                        "properties": {
                            "repoURL": { "$ref": "#/$defs/repoURL" },
                            "id": { "type": "string", "minLength": 1 }
                        }
                    }
                },
                "images": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["repoURL", "tag"],
                        "properties": {
                            "repoURL": { "$ref": "#/$defs/repoURL" },
                            "tag": { "type": "string" }
                        }
                    }
                },
                "charts": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["repoURL", "version"],
                        "properties": {
                            "repoURL": { "$ref": "#/$defs/repoURL" },
                            "name": { "type": "string" },
                            "version": { "type": "string", "minLength": 1 }
                        }
                    }
                }
            }
        }
    })
}

/// Get the catalog JSON Schema
fn get_catalog_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["schema", "warehouses"],
        "properties": {
            "schema": { "type": "string", "const": "freightyard.catalog.v1" },
            "default_namespace": { "type": ["string", "null"] },
            "warehouses": {
                "type": "array",
                "items": { "$ref": "#/$defs/warehouse" }
            }
        },
        "$defs": definitions()
    })
}

/// Get the promotion document JSON Schema
fn get_promotion_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["schema", "requirements", "freight"],
        "properties": {
            "schema": { "type": "string", "const": "freightyard.promotion.v1" },
            "project": { "type": ["string", "null"] },
            "stage": { "type": ["string", "null"] },
            "requirements": {
                "type": "array",
                "items": { "$ref": "#/$defs/requirement" }
            },
            "freight": {
                "type": "array",
                "items": { "$ref": "#/$defs/freight" }
            }
        },
        "$defs": definitions()
    })
}
