//! Runtime instances of schemas.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::convert::ConversionRegistry;
use crate::error::ModelError;
use crate::kind::Kind;
use crate::path::{parse_path, PathSegment};
use crate::schema::{AttributeDef, Schema};
use crate::validate::{ConstraintViolation, ValidationContext};
use crate::value::Value;

/// A runtime instance of a [`Schema`]: one value per declared attribute.
///
/// Entities are structural values: equality and hashing compare the id, the
/// schema, and every attribute value recursively, which is O(size of the
/// graph). Instances are request-scoped and single-owner -- an `Entity` is
/// not safe for concurrent mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    schema: Arc<Schema>,
    id: Option<String>,
    values: BTreeMap<String, Value>,
}

impl Entity {
    /// Create an instance with every declared attribute defaulted: list
    /// attributes to an empty list, everything else to `Null`.
    pub fn new(schema: Arc<Schema>) -> Entity {
        let mut values = BTreeMap::new();
        for attr in schema.attributes() {
            let default = if attr.kind == Kind::List {
                Value::List(Vec::new())
            } else {
                Value::Null
            };
            values.insert(attr.name.clone(), default);
        }
        Entity {
            schema,
            id: None,
            values,
        }
    }

    /// Create an instance carrying an identifier assigned by the caller's
    /// persistence layer.
    pub fn with_id(schema: Arc<Schema>, id: impl Into<String>) -> Entity {
        let mut entity = Entity::new(schema);
        entity.id = Some(id.into());
        entity
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Read one attribute value.
    pub fn get(&self, name: &str) -> Result<&Value, ModelError> {
        self.values
            .get(name)
            .ok_or_else(|| self.unknown_attribute(name))
    }

    /// Write one attribute.
    ///
    /// When the incoming kind differs from the declared kind the value is
    /// first routed through the [`ConversionRegistry`]; list values are
    /// converted element-wise against the declared element kind, and a
    /// nested entity must conform to the declared relation. Fails with
    /// `TypeMismatch` when no conversion reconciles the kinds.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        let attr = self
            .schema
            .attribute(name)
            .ok_or_else(|| self.unknown_attribute(name))?
            .clone();
        let coerced = self
            .coerce_declared(&attr, value)
            .map_err(|e| e.for_attribute(name))?;
        self.values.insert(attr.name, coerced);
        Ok(())
    }

    /// Append one element to a list attribute, converting it to the declared
    /// element kind first. Fails with `NotAList` on any other attribute kind.
    pub fn add(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        let attr = self
            .schema
            .attribute(name)
            .ok_or_else(|| self.unknown_attribute(name))?
            .clone();
        if attr.kind != Kind::List {
            return Err(ModelError::NotAList {
                attribute: name.to_string(),
            });
        }
        let element = self
            .coerce_element(&attr, value)
            .map_err(|e| e.for_attribute(name))?;
        match self.values.get_mut(name) {
            Some(Value::List(items)) => items.push(element),
            // The construction invariant keeps a list here; restore it if a
            // caller cleared the entry through a raw Null.
            _ => {
                self.values
                    .insert(name.to_string(), Value::List(vec![element]));
            }
        }
        Ok(())
    }

    /// Resolve a dot/bracket path against this entity graph.
    ///
    /// Each name segment descends into a nested entity, each index segment
    /// into a list. Fails with `InvalidPath` when a segment does not resolve
    /// and with `TypeMismatch` when the resolved value's kind conflicts with
    /// `expected` (`Null` matches any expected kind).
    pub fn get_property(&self, path: &str, expected: Kind) -> Result<&Value, ModelError> {
        let segments = parse_path(path)?;
        let invalid = |reason: String| ModelError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        let mut current: Option<&Value> = None;
        for segment in &segments {
            match segment {
                PathSegment::Name(name) => {
                    let entity = match current {
                        None => self,
                        Some(Value::Entity(nested)) => nested,
                        Some(other) => {
                            return Err(invalid(format!(
                                "cannot descend into {} at '{}'",
                                other.type_name(),
                                name
                            )))
                        }
                    };
                    let value = entity
                        .values
                        .get(name.as_str())
                        .ok_or_else(|| invalid(format!("unknown attribute '{}'", name)))?;
                    current = Some(value);
                }
                PathSegment::Index(index) => match current {
                    Some(Value::List(items)) => {
                        let item = items.get(*index).ok_or_else(|| {
                            invalid(format!(
                                "index {} out of range (length {})",
                                index,
                                items.len()
                            ))
                        })?;
                        current = Some(item);
                    }
                    Some(other) => {
                        return Err(invalid(format!("cannot index into {}", other.type_name())))
                    }
                    None => return Err(invalid("path cannot start with an index".to_string())),
                },
            }
        }

        let value = current.ok_or_else(|| invalid("empty path".to_string()))?;
        match value.kind() {
            Some(kind) if kind != expected => Err(ModelError::TypeMismatch {
                attribute: path.to_string(),
                expected: expected.name().to_string(),
                got: value.type_name().to_string(),
            }),
            _ => Ok(value),
        }
    }

    /// Validate every constrained attribute and recurse through nested
    /// entities, returning the flat list of path-qualified violations.
    ///
    /// All attributes and all nested branches are always evaluated --
    /// validation never short-circuits on the first failure. A `Null`
    /// nested-entity reference is skipped silently (an optional relation is
    /// not a violation). Never fails: violations are data, not errors.
    pub fn validate(&self) -> Vec<ConstraintViolation> {
        let mut context = ValidationContext::new();
        self.validate_into(&mut context);
        context.into_violations()
    }

    fn validate_into(&self, context: &mut ValidationContext) {
        for attr in self.schema.attributes() {
            let Some(value) = self.values.get(&attr.name) else {
                continue;
            };

            let constraints = self.schema.constraints_for(&attr.name);
            if !constraints.is_empty() {
                context.push(attr.name.as_str());
                for constraint in constraints {
                    constraint.is_valid(value, context);
                }
                context.pop();
            }

            match (attr.kind, attr.element_kind) {
                (Kind::NestedEntity, _) => {
                    if let Value::Entity(nested) = value {
                        context.push(attr.name.as_str());
                        nested.validate_into(context);
                        context.pop();
                    }
                }
                (Kind::List, Some(Kind::NestedEntity)) => {
                    if let Value::List(items) = value {
                        for (index, item) in items.iter().enumerate() {
                            if let Value::Entity(nested) = item {
                                context.push(format!("{}[{}]", attr.name, index));
                                nested.validate_into(context);
                                context.pop();
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn unknown_attribute(&self, name: &str) -> ModelError {
        ModelError::UnknownAttribute {
            schema: self.schema.name().to_string(),
            name: name.to_string(),
        }
    }

    /// Coerce an incoming value to an attribute's declared kind.
    fn coerce_declared(&self, attr: &AttributeDef, value: Value) -> Result<Value, ModelError> {
        match attr.kind {
            Kind::List => match value {
                Value::List(items) => {
                    let items = items
                        .into_iter()
                        .map(|item| self.coerce_element(attr, item))
                        .collect::<Result<Vec<Value>, ModelError>>()?;
                    Ok(Value::List(items))
                }
                // Clearing a list attribute resets it to empty.
                Value::Null => Ok(Value::List(Vec::new())),
                other => Err(ModelError::TypeMismatch {
                    attribute: String::new(),
                    expected: Kind::List.name().to_string(),
                    got: other.type_name().to_string(),
                }),
            },
            Kind::NestedEntity => self.coerce_nested(&attr.name, value),
            declared => Self::coerce_scalar(declared, value),
        }
    }

    /// Coerce an incoming value to a list attribute's declared element kind.
    fn coerce_element(&self, attr: &AttributeDef, value: Value) -> Result<Value, ModelError> {
        match attr.element_kind {
            Some(Kind::NestedEntity) => self.coerce_nested(&attr.name, value),
            Some(element) => Self::coerce_scalar(element, value),
            // A list declared without an element kind accepts elements as-is.
            None => Ok(value),
        }
    }

    fn coerce_scalar(declared: Kind, value: Value) -> Result<Value, ModelError> {
        match value.kind() {
            None => Ok(Value::Null),
            Some(kind) if kind == declared => Ok(value),
            Some(kind) => ConversionRegistry::global()
                .convert(value, declared)
                .map_err(|e| match e {
                    // At the attribute level a missing conversion is a type
                    // mismatch between the supplied and the declared kind.
                    ModelError::UnsupportedConversion { .. } => ModelError::TypeMismatch {
                        attribute: String::new(),
                        expected: declared.name().to_string(),
                        got: kind.name().to_string(),
                    },
                    other => other,
                }),
        }
    }

    /// A nested entity must conform to the attribute's declared relation.
    fn coerce_nested(&self, attribute: &str, value: Value) -> Result<Value, ModelError> {
        match value {
            Value::Entity(nested) => match self.schema.related_schema(attribute) {
                Some(related) if nested.schema.name() == related => Ok(Value::Entity(nested)),
                Some(related) => Err(ModelError::TypeMismatch {
                    attribute: String::new(),
                    expected: format!("entity '{}'", related),
                    got: format!("entity '{}'", nested.schema.name()),
                }),
                None => Ok(Value::Entity(nested)),
            },
            Value::Null => Ok(Value::Null),
            other => Err(ModelError::TypeMismatch {
                attribute: String::new(),
                expected: Kind::NestedEntity.name().to_string(),
                got: other.type_name().to_string(),
            }),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
