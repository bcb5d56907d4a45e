//! Entity ⇄ generic-map marshaling.
//!
//! `entity_to_map` recursively unwraps an entity graph into plain
//! maps/lists/scalars suitable for JSON-style serialization;
//! `apply_map_to_entity` applies a decoded map back onto an entity with
//! partial-update semantics. Scalar coercion is delegated to the core's
//! conversion registry through `Entity::set`, so the same rules apply at
//! this boundary as everywhere else.

use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use protea_core::{AttributeDef, Entity, Kind, ModelError, Schema, Value};

use crate::resolver::SchemaResolver;

/// Recursively unwrap an entity into an ordered generic map.
///
/// Keys follow the schema's declaration order, with `id` first when present.
/// Decimals, dates, and times render as strings (the registry converts them
/// back on application); nested entities become nested maps and lists become
/// arrays.
pub fn entity_to_map(entity: &Entity) -> Map<String, JsonValue> {
    let mut map = Map::new();
    if let Some(id) = entity.id() {
        map.insert("id".to_string(), JsonValue::String(id.to_string()));
    }
    for attr in entity.schema().attributes() {
        let Ok(value) = entity.get(&attr.name) else {
            continue;
        };
        map.insert(attr.name.clone(), value_to_json(value));
    }
    map
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => JsonValue::from(*i),
        // Fixed-point and temporal values travel as strings.
        Value::Decimal(d) => JsonValue::String(d.to_string()),
        Value::Date(_) | Value::Time(_) => JsonValue::String(value.to_string()),
        Value::List(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
        Value::Entity(nested) => JsonValue::Object(entity_to_map(nested)),
    }
}

/// Apply a generic map onto an entity, partial-update style.
///
/// - a key absent from the map leaves the attribute untouched;
/// - a key present with JSON `null` clears the attribute (`Null`, or the
///   empty list for list attributes);
/// - scalar values are routed through the conversion registry via
///   `Entity::set`;
/// - nested-entity keys require a map value, applied recursively against the
///   resolved related schema (an existing nested entity is updated in place,
///   otherwise a fresh one is built from the resolver);
/// - list keys require an array value and rebuild the list element-wise;
/// - keys the schema does not declare fail with `UnknownAttribute`.
///
/// Application is fail-fast and not atomic: attributes applied before a
/// failing key stay applied. Callers that need all-or-nothing semantics
/// apply to a scratch clone and swap on success.
pub fn apply_map_to_entity(
    entity: &mut Entity,
    map: &Map<String, JsonValue>,
    resolver: &dyn SchemaResolver,
) -> Result<(), ModelError> {
    for (key, json) in map {
        if key == "id" {
            apply_id(entity, json)?;
            continue;
        }
        let attr = entity
            .schema()
            .attribute(key)
            .cloned()
            .ok_or_else(|| ModelError::UnknownAttribute {
                schema: entity.schema().name().to_string(),
                name: key.clone(),
            })?;
        apply_attribute(entity, &attr, json, resolver)?;
    }
    Ok(())
}

fn apply_id(entity: &mut Entity, json: &JsonValue) -> Result<(), ModelError> {
    match json {
        JsonValue::Null => {
            entity.set_id(None);
            Ok(())
        }
        JsonValue::String(s) => {
            entity.set_id(Some(s.clone()));
            Ok(())
        }
        other => Err(ModelError::TypeMismatch {
            attribute: "id".to_string(),
            expected: "string".to_string(),
            got: json_type_name(other).to_string(),
        }),
    }
}

fn apply_attribute(
    entity: &mut Entity,
    attr: &AttributeDef,
    json: &JsonValue,
    resolver: &dyn SchemaResolver,
) -> Result<(), ModelError> {
    match attr.kind {
        Kind::NestedEntity => match json {
            JsonValue::Null => entity.set(&attr.name, Value::Null),
            JsonValue::Object(fields) => {
                // Update the existing nested entity in place, or build a
                // fresh one against the resolved related schema.
                let mut nested = match entity.get(&attr.name)? {
                    Value::Entity(existing) => existing.clone(),
                    _ => Entity::new(related_schema(entity, attr, resolver)?),
                };
                apply_map_to_entity(&mut nested, fields, resolver)?;
                entity.set(&attr.name, Value::Entity(nested))
            }
            other => Err(mismatch(attr, "map", other)),
        },
        Kind::List => match json {
            JsonValue::Null => entity.set(&attr.name, Value::Null),
            JsonValue::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    list.push(element_from_json(entity, attr, item, resolver)?);
                }
                entity.set(&attr.name, Value::List(list))
            }
            other => Err(mismatch(attr, "array", other)),
        },
        _ => {
            let value = scalar_from_json(attr, json)?;
            entity.set(&attr.name, value)
        }
    }
}

fn element_from_json(
    entity: &Entity,
    attr: &AttributeDef,
    json: &JsonValue,
    resolver: &dyn SchemaResolver,
) -> Result<Value, ModelError> {
    if attr.element_kind == Some(Kind::NestedEntity) {
        return match json {
            JsonValue::Object(fields) => {
                let mut nested = Entity::new(related_schema(entity, attr, resolver)?);
                apply_map_to_entity(&mut nested, fields, resolver)?;
                Ok(Value::Entity(nested))
            }
            other => Err(mismatch(attr, "map", other)),
        };
    }
    scalar_from_json(attr, json)
}

/// Infer a core value from a plain JSON scalar. Kind reconciliation against
/// the declared attribute happens later, in `Entity::set`.
fn scalar_from_json(attr: &AttributeDef, json: &JsonValue) -> Result<Value, ModelError> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Integer(i));
            }
            // Floating-point JSON numbers parse through their decimal
            // rendering, keeping f64 out of the value path.
            n.to_string()
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| mismatch(attr, "number", json))
        }
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        other => Err(mismatch(attr, "scalar", other)),
    }
}

fn related_schema(
    entity: &Entity,
    attr: &AttributeDef,
    resolver: &dyn SchemaResolver,
) -> Result<Arc<Schema>, ModelError> {
    let name = entity
        .schema()
        .related_schema(&attr.name)
        .ok_or_else(|| ModelError::MissingRelatedSchema {
            name: attr.name.clone(),
        })?;
    match resolver.resolve(name) {
        Some(schema) => Ok(schema),
        None => {
            tracing::debug!(schema = name, "related schema not resolvable");
            Err(ModelError::MissingRelatedSchema {
                name: name.to_string(),
            })
        }
    }
}

fn mismatch(attr: &AttributeDef, expected: &str, json: &JsonValue) -> ModelError {
    ModelError::TypeMismatch {
        attribute: attr.name.clone(),
        expected: expected.to_string(),
        got: json_type_name(json).to_string(),
    }
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
