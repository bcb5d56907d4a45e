//! Kind tags for schema attributes and runtime values.

use std::fmt;

/// The type tag of a schema attribute or runtime value.
///
/// `Kind` is a closed set: every attribute a schema can declare and every
/// non-null value an entity can hold carries exactly one of these tags.
/// Collection and reference details (`List` element kind, `NestedEntity`
/// relation) live on the declaring [`AttributeDef`](crate::schema::AttributeDef),
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Text,
    Boolean,
    Integer,
    Decimal,
    Date,
    Time,
    List,
    NestedEntity,
}

impl Kind {
    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Text => "Text",
            Kind::Boolean => "Boolean",
            Kind::Integer => "Integer",
            Kind::Decimal => "Decimal",
            Kind::Date => "Date",
            Kind::Time => "Time",
            Kind::List => "List",
            Kind::NestedEntity => "NestedEntity",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
