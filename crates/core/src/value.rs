//! Runtime values held by entity attributes.

use rust_decimal::Decimal;
use std::fmt;
use time::macros::format_description;

use crate::entity::Entity;
use crate::kind::Kind;

/// A runtime value held by one entity attribute.
///
/// The variant set mirrors [`Kind`] plus `Null`. All fixed-point numerics
/// use `rust_decimal::Decimal` -- never `f64`. Equality and hashing are
/// structural and recurse through lists and nested entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Date(time::Date),
    Time(time::Time),
    List(Vec<Value>),
    Entity(Entity),
    Null,
}

impl Value {
    /// The kind tag of this value; `Null` has none.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::Text(_) => Some(Kind::Text),
            Value::Boolean(_) => Some(Kind::Boolean),
            Value::Integer(_) => Some(Kind::Integer),
            Value::Decimal(_) => Some(Kind::Decimal),
            Value::Date(_) => Some(Kind::Date),
            Value::Time(_) => Some(Kind::Time),
            Value::List(_) => Some(Kind::List),
            Value::Entity(_) => Some(Kind::NestedEntity),
            Value::Null => None,
        }
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.name(),
            None => "Null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text payload, if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Borrow the elements, if this is a `List` value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the nested entity, if this is an `Entity` value.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }
}

/// Renders the scalar payload; used for the value placeholder in violation
/// messages. Dates and times render in their ISO forms, `Null` as `null`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => {
                let fmt_desc = format_description!("[year]-[month]-[day]");
                let rendered = d.format(&fmt_desc).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            Value::Time(t) => {
                let fmt_desc = format_description!("[hour]:[minute]:[second]");
                let rendered = t.format(&fmt_desc).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Entity(e) => write!(f, "entity '{}'", e.schema().name()),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Integer(i)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Value {
        Value::Decimal(d)
    }
}

impl From<time::Date> for Value {
    fn from(d: time::Date) -> Value {
        Value::Date(d)
    }
}

impl From<time::Time> for Value {
    fn from(t: time::Time) -> Value {
        Value::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::List(items)
    }
}

impl From<Entity> for Value {
    fn from(e: Entity) -> Value {
        Value::Entity(e)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
