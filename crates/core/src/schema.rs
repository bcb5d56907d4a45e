//! Named structural types: attribute declarations, relations, constraints.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::constraint::Constraint;
use crate::kind::Kind;

/// A named, typed slot declared by a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeDef {
    pub name: String,
    pub kind: Kind,
    /// Present iff `kind` is [`Kind::List`].
    pub element_kind: Option<Kind>,
}

/// A named structural type: ordered attribute definitions, the related
/// schema of every nested-entity attribute, and per-attribute validation
/// constraints.
///
/// Schemas are built once through [`SchemaBuilder`] and immutable
/// afterwards. Every [`Entity`](crate::entity::Entity) holds a shared
/// read-only reference to its schema, so a schema can back any number of
/// concurrent entity constructions without synchronization.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    attributes: Vec<AttributeDef>,
    related: BTreeMap<String, String>,
    constraints: BTreeMap<String, Vec<Constraint>>,
}

impl Schema {
    /// Start declaring a schema with the given name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            attributes: Vec::new(),
            related: BTreeMap::new(),
            constraints: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes, in declaration order.
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    /// Look up one attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The related schema name of a nested-entity attribute (or of a
    /// list-of-nested-entity attribute).
    pub fn related_schema(&self, attribute: &str) -> Option<&str> {
        self.related.get(attribute).map(String::as_str)
    }

    /// The constraints declared for an attribute, in declaration order.
    /// Empty for unconstrained attributes.
    pub fn constraints_for(&self, attribute: &str) -> &[Constraint] {
        self.constraints
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Equality is structural over the attribute list (ordered), the relation
/// map, and the constraint map; the schema name does not participate.
impl PartialEq for Schema {
    fn eq(&self, other: &Schema) -> bool {
        self.attributes == other.attributes
            && self.related == other.related
            && self.constraints == other.constraints
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.attributes.hash(state);
        self.related.hash(state);
        self.constraints.hash(state);
    }
}

/// Finalize-once builder for [`Schema`].
///
/// Re-declaring an attribute name replaces the earlier declaration in place
/// (last write wins, position preserved). A duplicate declaration is a
/// caller bug, not a runtime-recoverable condition, so the builder stays
/// infallible.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    attributes: Vec<AttributeDef>,
    related: BTreeMap<String, String>,
    constraints: BTreeMap<String, Vec<Constraint>>,
}

impl SchemaBuilder {
    /// Declare a scalar attribute of the given kind.
    ///
    /// List and nested-entity attributes have dedicated declarations that
    /// carry their element kind and relation:
    /// [`list_property`](Self::list_property), [`relation`](Self::relation),
    /// [`relation_list`](Self::relation_list).
    pub fn property(mut self, name: impl Into<String>, kind: Kind) -> SchemaBuilder {
        let name = name.into();
        self.related.remove(&name);
        self.declare(AttributeDef {
            name,
            kind,
            element_kind: None,
        });
        self
    }

    /// Declare a nested-entity attribute related to the named schema.
    pub fn relation(
        mut self,
        name: impl Into<String>,
        related_schema: impl Into<String>,
    ) -> SchemaBuilder {
        let name = name.into();
        self.related.insert(name.clone(), related_schema.into());
        self.declare(AttributeDef {
            name,
            kind: Kind::NestedEntity,
            element_kind: None,
        });
        self
    }

    /// Declare a list attribute with the given element kind.
    pub fn list_property(mut self, name: impl Into<String>, element_kind: Kind) -> SchemaBuilder {
        let name = name.into();
        self.related.remove(&name);
        self.declare(AttributeDef {
            name,
            kind: Kind::List,
            element_kind: Some(element_kind),
        });
        self
    }

    /// Declare a list-of-nested-entity attribute related to the named schema.
    pub fn relation_list(
        mut self,
        name: impl Into<String>,
        related_schema: impl Into<String>,
    ) -> SchemaBuilder {
        let name = name.into();
        self.related.insert(name.clone(), related_schema.into());
        self.declare(AttributeDef {
            name,
            kind: Kind::List,
            element_kind: Some(Kind::NestedEntity),
        });
        self
    }

    /// Append a constraint to the attribute's rule list, creating the list
    /// if absent.
    pub fn constraint(mut self, name: impl Into<String>, constraint: Constraint) -> SchemaBuilder {
        self.constraints.entry(name.into()).or_default().push(constraint);
        self
    }

    /// Finalize the schema. The result is immutable and shareable.
    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema {
            name: self.name,
            attributes: self.attributes,
            related: self.related,
            constraints: self.constraints,
        })
    }

    fn declare(&mut self, def: AttributeDef) {
        match self.attributes.iter_mut().find(|a| a.name == def.name) {
            Some(existing) => *existing = def,
            None => self.attributes.push(def),
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
