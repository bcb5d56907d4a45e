//! protea-core: runtime schema, entity, and validation engine.
//!
//! Administrators define record types at run time -- attribute names,
//! primitive/collection/nested-reference kinds, and per-attribute validation
//! rules -- and the engine creates, mutates, traverses, and validates
//! instances of those types without a compile-time struct per type.
//!
//! The moving parts, leaf-first:
//! - [`Kind`] / [`Value`] -- the closed tag set and the runtime value variant
//!   mirroring it. All fixed-point numerics use `rust_decimal::Decimal`.
//! - [`ConversionRegistry`] -- the process-wide table coercing loosely-typed
//!   input (e.g. decoded JSON) to schema-declared kinds. Built once, then
//!   shared read-only.
//! - [`Constraint`] -- the closed set of validation rules, each a pure
//!   predicate plus a templated failure message.
//! - [`Schema`] / [`SchemaBuilder`] -- a named structural type, built once
//!   and shared read-only by every entity constructed against it.
//! - [`Entity`] -- a runtime instance of a schema, with path-addressed
//!   access and recursive validation.
//! - [`ValidationContext`] / [`ConstraintViolation`] -- the traversal
//!   accumulator and the path-qualified failure records it collects.
//!
//! All operations are synchronous, in-memory, and run to completion or fail
//! atomically; `validate()` itself never fails -- violations are data.

pub mod constraint;
pub mod convert;
pub mod entity;
pub mod error;
pub mod kind;
pub mod path;
pub mod schema;
pub mod validate;
pub mod value;

pub use constraint::Constraint;
pub use convert::ConversionRegistry;
pub use entity::Entity;
pub use error::ModelError;
pub use kind::Kind;
pub use path::{join_path, parse_path, PathSegment};
pub use schema::{AttributeDef, Schema, SchemaBuilder};
pub use validate::{ConstraintViolation, ValidationContext};
pub use value::Value;
