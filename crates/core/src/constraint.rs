//! Attribute validation rules.

use crate::kind::Kind;
use crate::validate::{ConstraintViolation, ValidationContext};
use crate::value::Value;

/// A validation rule attached to a schema attribute.
///
/// Constraints are immutable, compared by value, and evaluated as pure
/// predicates; failures are reported through a [`ValidationContext`] as
/// [`ConstraintViolation`] records, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// The value must not be `Null`.
    NotNull,
    /// The value must be text with non-whitespace content.
    NotBlank,
    /// Text length bounds. `Null` counts as length 0; a non-text, non-null
    /// value fails the check.
    Length { min: Option<u32>, max: Option<u32> },
    /// The decimal value must not equal zero. `Null` passes; pair with
    /// [`Constraint::NotNull`] for required amounts.
    NotZero,
    /// The decimal value must have at most two fractional digits. `Null`
    /// passes.
    Monetary,
}

impl Constraint {
    /// The kind this rule is meaningful for; `None` applies to any kind.
    pub fn applies_to(&self) -> Option<Kind> {
        match self {
            Constraint::NotNull => None,
            Constraint::NotBlank | Constraint::Length { .. } => Some(Kind::Text),
            Constraint::NotZero | Constraint::Monetary => Some(Kind::Decimal),
        }
    }

    /// The failure message template. Placeholders: `{0}` path, `{1}` value,
    /// `{2}` onwards the arguments from [`Constraint::args`].
    pub fn message_template(&self) -> &'static str {
        match self {
            Constraint::NotNull => "{0} must not be null",
            Constraint::NotBlank => "{0} must not be blank",
            Constraint::Length { min, max } => match (min, max) {
                (Some(min), Some(max)) if min == max => {
                    "{0} must be exactly {2} characters in length"
                }
                (Some(_), Some(_)) => "{0} must be between {2} and {3} characters in length",
                (Some(_), None) => "{0} must be at least {2} characters in length",
                (None, Some(_)) => "{0} must be at most {2} characters in length",
                (None, None) => "{0} may be any length",
            },
            Constraint::NotZero => "{0} must not be zero",
            Constraint::Monetary => "{0} must be a monetary amount with at most 2 decimal places",
        }
    }

    /// The ordered template arguments, substituted from placeholder `{2}`
    /// onwards.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Constraint::Length { min, max } => {
                let mut args = Vec::new();
                if let Some(min) = min {
                    args.push(Value::Integer(i64::from(*min)));
                }
                if let Some(max) = max {
                    args.push(Value::Integer(i64::from(*max)));
                }
                args
            }
            _ => Vec::new(),
        }
    }

    /// The pure predicate: `true` when `value` satisfies this rule.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Constraint::NotNull => !value.is_null(),
            Constraint::NotBlank => {
                matches!(value, Value::Text(s) if !s.trim().is_empty())
            }
            Constraint::Length { min, max } => {
                let length = match value {
                    Value::Text(s) => s.chars().count() as u64,
                    Value::Null => 0,
                    _ => return false,
                };
                let min_ok = min.map_or(true, |min| length >= u64::from(min));
                let max_ok = max.map_or(true, |max| length <= u64::from(max));
                min_ok && max_ok
            }
            Constraint::NotZero => match value {
                Value::Decimal(d) => !d.is_zero(),
                Value::Null => true,
                _ => false,
            },
            Constraint::Monetary => match value {
                Value::Decimal(d) => d.normalize().scale() <= 2,
                Value::Null => true,
                _ => false,
            },
        }
    }

    /// Evaluate the predicate against `value`; on failure append a violation
    /// carrying the context's current path and return `false`. The context
    /// is untouched on success.
    pub fn is_valid(&self, value: &Value, context: &mut ValidationContext) -> bool {
        if self.check(value) {
            return true;
        }
        let path = context.current_path();
        context.record(ConstraintViolation::new(
            path,
            self.message_template(),
            value.clone(),
            self.args(),
        ));
        false
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
