//! Value conversion between runtime kinds.
//!
//! A dispatch table keyed by (source kind, target kind) pairs. The table is
//! built once, before first use, and never mutated afterwards; [`global`]
//! hands out a shared read-only reference, so no locking is needed after
//! initialization.
//!
//! [`global`]: ConversionRegistry::global

use rust_decimal::Decimal;
use std::sync::OnceLock;
use time::macros::format_description;

use crate::error::ModelError;
use crate::kind::Kind;
use crate::value::Value;

type ConvertFn = fn(&Value) -> Result<Value, ModelError>;

/// One registered conversion from a source kind to a target kind.
struct Converter {
    source: Kind,
    target: Kind,
    apply: ConvertFn,
}

impl Converter {
    /// Whether this entry handles the given pair. Compatibility is plain
    /// kind equality: the closed [`Kind`] enum has no subtype relation to
    /// widen over.
    fn matches(&self, source: Kind, target: Kind) -> bool {
        self.source == source && self.target == target
    }
}

/// The process-wide table of value conversions.
pub struct ConversionRegistry {
    converters: Vec<Converter>,
}

impl ConversionRegistry {
    /// The shared registry instance, built on first use.
    pub fn global() -> &'static ConversionRegistry {
        static REGISTRY: OnceLock<ConversionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ConversionRegistry::new)
    }

    fn new() -> ConversionRegistry {
        ConversionRegistry {
            converters: vec![
                Converter {
                    source: Kind::Integer,
                    target: Kind::Decimal,
                    apply: integer_to_decimal,
                },
                Converter {
                    source: Kind::Text,
                    target: Kind::Decimal,
                    apply: text_to_decimal,
                },
                Converter {
                    source: Kind::Text,
                    target: Kind::Integer,
                    apply: text_to_integer,
                },
                Converter {
                    source: Kind::Text,
                    target: Kind::Boolean,
                    apply: text_to_boolean,
                },
                Converter {
                    source: Kind::Text,
                    target: Kind::Date,
                    apply: text_to_date,
                },
                Converter {
                    source: Kind::Text,
                    target: Kind::Time,
                    apply: text_to_time,
                },
            ],
        }
    }

    /// Convert `value` to the target kind.
    ///
    /// A value already of the target kind (and `Null`) passes through
    /// unchanged. Empty or whitespace-only text converts to `Null` for every
    /// registered target rather than raising a parse error. A pair with no
    /// registered converter fails with `UnsupportedConversion`.
    pub fn convert(&self, value: Value, target: Kind) -> Result<Value, ModelError> {
        let source = match value.kind() {
            None => return Ok(Value::Null),
            Some(kind) if kind == target => return Ok(value),
            Some(kind) => kind,
        };

        let converter = self
            .converters
            .iter()
            .find(|c| c.matches(source, target))
            .ok_or_else(|| {
                tracing::debug!(from = source.name(), to = target.name(), "no converter registered");
                ModelError::UnsupportedConversion {
                    from: source.name().to_string(),
                    to: target.name().to_string(),
                }
            })?;

        if let Value::Text(s) = &value {
            if s.trim().is_empty() {
                return Ok(Value::Null);
            }
        }
        (converter.apply)(&value)
    }
}

// ──────────────────────────────────────────────
// Converter functions
// ──────────────────────────────────────────────

/// A converter was handed a value of the wrong source kind. Only reachable
/// through a misregistered table entry.
fn source_mismatch(value: &Value, target: Kind) -> ModelError {
    ModelError::UnsupportedConversion {
        from: value.type_name().to_string(),
        to: target.name().to_string(),
    }
}

fn parse_failure(expected: Kind, text: &str) -> ModelError {
    ModelError::TypeMismatch {
        attribute: String::new(),
        expected: expected.name().to_string(),
        got: format!("text '{}'", text),
    }
}

fn integer_to_decimal(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Integer(i) => Ok(Value::Decimal(Decimal::from(*i))),
        other => Err(source_mismatch(other, Kind::Decimal)),
    }
}

fn text_to_decimal(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| parse_failure(Kind::Decimal, trimmed))
        }
        other => Err(source_mismatch(other, Kind::Decimal)),
    }
}

fn text_to_integer(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| parse_failure(Kind::Integer, trimmed))
        }
        other => Err(source_mismatch(other, Kind::Integer)),
    }
}

/// Case-insensitive `true`/`yes` and `false`/`no`. Anything else maps to
/// `Null` with a diagnostic rather than failing, matching lenient-input
/// semantics at the boundary.
fn text_to_boolean(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("yes") {
                Ok(Value::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("no") {
                Ok(Value::Boolean(false))
            } else {
                tracing::warn!(text = trimmed, "unrecognized boolean text, treating as null");
                Ok(Value::Null)
            }
        }
        other => Err(source_mismatch(other, Kind::Boolean)),
    }
}

fn text_to_date(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            let fmt_desc = format_description!("[year]-[month]-[day]");
            time::Date::parse(trimmed, &fmt_desc)
                .map(Value::Date)
                .map_err(|_| parse_failure(Kind::Date, trimmed))
        }
        other => Err(source_mismatch(other, Kind::Date)),
    }
}

fn text_to_time(value: &Value) -> Result<Value, ModelError> {
    match value {
        Value::Text(s) => {
            let trimmed = s.trim();
            let fmt_desc = format_description!("[hour]:[minute]:[second]");
            // HH:MM is accepted as shorthand for HH:MM:00.
            let normalized = if trimmed.matches(':').count() == 1 {
                format!("{}:00", trimmed)
            } else {
                trimmed.to_string()
            };
            time::Time::parse(&normalized, &fmt_desc)
                .map(Value::Time)
                .map_err(|_| parse_failure(Kind::Time, trimmed))
        }
        other => Err(source_mismatch(other, Kind::Time)),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
