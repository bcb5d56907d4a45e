//! Dot/bracket path expressions over entity graphs.
//!
//! A path addresses a value inside an entity: bare attribute names separated
//! by dots, with zero-based list indices in brackets (`address.state`,
//! `emails[0].email`). Parsing happens once, into a typed segment sequence
//! consumed identically by read access and by the validation path tracker.

use std::fmt::Write;

use crate::error::ModelError;

/// One segment of a parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A bare attribute name.
    Name(String),
    /// A zero-based list index.
    Index(usize),
}

/// Parse a dot/bracket path into segments.
///
/// `a.b[0].c` parses to `[Name(a), Name(b), Index(0), Name(c)]`. Empty
/// segments, non-numeric or unterminated indices, and trailing dots are
/// rejected with `InvalidPath`.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, ModelError> {
    let invalid = |reason: String| ModelError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    let bytes = path.as_bytes();
    if bytes.is_empty() {
        return Err(invalid("empty path".to_string()));
    }

    let mut segments = Vec::new();
    let mut pos = 0;
    loop {
        // A segment starts with an attribute name.
        let start = pos;
        while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' && bytes[pos] != b']' {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b']' {
            return Err(invalid(format!("unexpected ']' at offset {}", pos)));
        }
        if pos == start {
            return Err(invalid(format!("empty segment at offset {}", start)));
        }
        segments.push(PathSegment::Name(path[start..pos].to_string()));

        // Followed by zero or more bracketed indices.
        while pos < bytes.len() && bytes[pos] == b'[' {
            pos += 1;
            let digits_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == digits_start {
                return Err(invalid(format!("expected index at offset {}", digits_start)));
            }
            if pos >= bytes.len() || bytes[pos] != b']' {
                return Err(invalid(format!("unterminated index at offset {}", digits_start)));
            }
            let index = path[digits_start..pos]
                .parse::<usize>()
                .map_err(|e| invalid(format!("invalid index: {}", e)))?;
            segments.push(PathSegment::Index(index));
            pos += 1;
        }

        if pos == bytes.len() {
            break;
        }
        if bytes[pos] != b'.' {
            return Err(invalid(format!(
                "unexpected '{}' at offset {}",
                path[pos..].chars().next().unwrap_or('?'),
                pos
            )));
        }
        pos += 1;
        if pos == bytes.len() {
            return Err(invalid("trailing '.'".to_string()));
        }
    }

    Ok(segments)
}

/// Render segments back to canonical dot/bracket notation.
pub fn join_path(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Name(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(index) => {
                // String's fmt::Write never fails.
                let _ = write!(out, "[{}]", index);
            }
        }
    }
    out
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name() {
        assert_eq!(
            parse_path("state").unwrap(),
            vec![PathSegment::Name("state".to_string())]
        );
    }

    #[test]
    fn parses_nested_and_indexed() {
        assert_eq!(
            parse_path("emails[0].email").unwrap(),
            vec![
                PathSegment::Name("emails".to_string()),
                PathSegment::Index(0),
                PathSegment::Name("email".to_string()),
            ]
        );
    }

    #[test]
    fn parses_consecutive_indices() {
        assert_eq!(
            parse_path("grid[2][3]").unwrap(),
            vec![
                PathSegment::Name("grid".to_string()),
                PathSegment::Index(2),
                PathSegment::Index(3),
            ]
        );
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", ".", "a.", ".a", "a..b", "a[", "a[]", "a[x]", "a[1", "a]", "a[1]b"] {
            assert!(
                matches!(parse_path(bad), Err(ModelError::InvalidPath { .. })),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn join_is_inverse_of_parse() {
        for path in ["state", "address.state", "emails[0].email", "grid[2][3]"] {
            let segments = parse_path(path).unwrap();
            assert_eq!(join_path(&segments), path);
        }
    }
}
