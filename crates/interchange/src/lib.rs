//! protea-interchange: generic-map marshaling for protea entities.
//!
//! Sits at the boundary between the schema/entity core and the layers that
//! speak JSON: converts an [`Entity`](protea_core::Entity) to an ordered
//! generic map suitable for serialization, and applies a decoded map back
//! onto an entity with partial-update semantics. Nested-entity attributes
//! are resolved through the [`SchemaResolver`] boundary -- the core never
//! resolves schema names itself.

pub mod map;
pub mod resolver;
pub mod violations;

pub use map::{apply_map_to_entity, entity_to_map};
pub use resolver::{SchemaResolver, StaticSchemaResolver};
pub use violations::{violations_to_json, ViolationRecord};
