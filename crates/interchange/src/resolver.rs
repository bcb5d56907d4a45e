//! Schema resolution at the marshaling boundary.

use std::collections::HashMap;
use std::sync::Arc;

use protea_core::Schema;

/// Resolves related-schema names to concrete schemas.
///
/// A nested-entity attribute records only the *name* of its related schema;
/// whoever applies a generic map must resolve that name to a concrete
/// [`Schema`] before a sub-entity can be built. Implementations typically
/// front whatever store the caller keeps schemas in.
pub trait SchemaResolver {
    /// Look up a schema by name.
    fn resolve(&self, name: &str) -> Option<Arc<Schema>>;
}

/// A resolver over a fixed, in-memory set of schemas.
///
/// Wraps a map from schema name to schema and answers lookups from it.
/// Useful for tests and for callers that load every schema up front.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaResolver {
    schemas: HashMap<String, Arc<Schema>>,
}

impl StaticSchemaResolver {
    /// Create a resolver over the given schemas, keyed by name.
    pub fn new(schemas: HashMap<String, Arc<Schema>>) -> StaticSchemaResolver {
        StaticSchemaResolver { schemas }
    }

    /// Create a resolver with no schemas.
    pub fn empty() -> StaticSchemaResolver {
        StaticSchemaResolver {
            schemas: HashMap::new(),
        }
    }

    /// Register one schema under its own name.
    pub fn register(&mut self, schema: Arc<Schema>) {
        self.schemas.insert(schema.name().to_string(), schema);
    }
}

impl SchemaResolver for StaticSchemaResolver {
    fn resolve(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
