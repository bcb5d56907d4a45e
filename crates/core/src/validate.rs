//! Violation records and the traversal context used by `validate()`.

use crate::value::Value;

/// A record of one failed constraint, located within an entity graph.
///
/// `path` is dot/bracket notation built during traversal (`address.state`,
/// `emails[0].email`). The message template carries positional placeholders:
/// `{0}` is the path, `{1}` the offending value, `{2}` onwards the
/// constraint-specific arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub path: String,
    pub message_template: String,
    pub value: Value,
    pub args: Vec<Value>,
}

impl ConstraintViolation {
    pub fn new(
        path: impl Into<String>,
        message_template: impl Into<String>,
        value: Value,
        args: Vec<Value>,
    ) -> ConstraintViolation {
        ConstraintViolation {
            path: path.into(),
            message_template: message_template.into(),
            value,
            args,
        }
    }

    /// Render the message with placeholders substituted.
    ///
    /// Placeholders that do not resolve (out-of-range index, unterminated
    /// brace) are left in the output verbatim.
    pub fn message(&self) -> String {
        let mut out = String::with_capacity(self.message_template.len() + self.path.len());
        let mut chars = self.message_template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '{' {
                out.push(c);
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let closed = chars.peek() == Some(&'}');
            if closed && !digits.is_empty() {
                chars.next();
                match digits.parse::<usize>().ok().and_then(|i| self.placeholder(i)) {
                    Some(substituted) => out.push_str(&substituted),
                    None => {
                        out.push('{');
                        out.push_str(&digits);
                        out.push('}');
                    }
                }
            } else {
                out.push('{');
                out.push_str(&digits);
            }
        }
        out
    }

    fn placeholder(&self, index: usize) -> Option<String> {
        match index {
            0 => Some(self.path.clone()),
            1 => Some(self.value.to_string()),
            n => self.args.get(n - 2).map(Value::to_string),
        }
    }
}

/// Accumulates violations while tracking the current traversal path.
///
/// [`push`](Self::push) and [`pop`](Self::pop) must be paired around every
/// descent into a nested attribute or list element; list elements are pushed
/// pre-rendered (`emails[1]`).
#[derive(Debug, Default)]
pub struct ValidationContext {
    path: Vec<String>,
    violations: Vec<ConstraintViolation>,
}

impl ValidationContext {
    pub fn new() -> ValidationContext {
        ValidationContext::default()
    }

    /// Push one path segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    /// Pop the most recent path segment.
    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// The dot-joined path to the value currently under validation.
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Append a violation at the current location.
    pub fn record(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<ConstraintViolation> {
        self.violations
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_tracks_nested_path() {
        let mut context = ValidationContext::new();
        context.push("address");
        context.push("state");
        assert_eq!(context.current_path(), "address.state");
        context.pop();
        context.push("emails[1]");
        context.push("email");
        assert_eq!(context.current_path(), "address.emails[1].email");
    }

    #[test]
    fn message_substitutes_path_value_and_args() {
        let violation = ConstraintViolation::new(
            "password",
            "{0} must be between {2} and {3} characters in length",
            Value::Text("foo".to_string()),
            vec![Value::Integer(8), Value::Integer(20)],
        );
        assert_eq!(
            violation.message(),
            "password must be between 8 and 20 characters in length"
        );
    }

    #[test]
    fn message_substitutes_value_placeholder() {
        let violation = ConstraintViolation::new(
            "amount",
            "{0} has invalid value {1}",
            Value::Integer(7),
            vec![],
        );
        assert_eq!(violation.message(), "amount has invalid value 7");
    }

    #[test]
    fn unresolved_placeholders_are_kept_verbatim() {
        let violation = ConstraintViolation::new("p", "{0} and {9} and {x}", Value::Null, vec![]);
        assert_eq!(violation.message(), "p and {9} and {x}");
    }
}
