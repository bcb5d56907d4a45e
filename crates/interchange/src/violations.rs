//! Wire-facing rendering of validation results.
//!
//! Validation produces path-qualified [`ConstraintViolation`] records; the
//! layers above hand them back to clients as part of an error response. The
//! types here are the serializable view of that hand-off -- rendered
//! messages only, no templates or raw values.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use protea_core::ConstraintViolation;

/// One violation as it travels to a client: the path locating the failing
/// value and the fully rendered message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViolationRecord {
    pub path: String,
    pub message: String,
}

impl From<&ConstraintViolation> for ViolationRecord {
    fn from(violation: &ConstraintViolation) -> ViolationRecord {
        ViolationRecord {
            path: violation.path.clone(),
            message: violation.message(),
        }
    }
}

/// Render a violation list to its JSON output shape:
/// `{ "violations": [ { "path": ..., "message": ... } ] }`.
pub fn violations_to_json(violations: &[ConstraintViolation]) -> JsonValue {
    let records: Vec<ViolationRecord> = violations.iter().map(ViolationRecord::from).collect();
    serde_json::json!({ "violations": records })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
