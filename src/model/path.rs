//! Path strings — dot-delimited field traversals rooted at a class.
//!
//! `Employee.department.name` is three segments: the root class
//! `Employee`, then the fields `department` and `name`. Everything but the
//! last segment is the *prefix*, which names the parent path.

use smallvec::SmallVec;

use crate::{Error, Result};

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Segments of a path. Most paths are shallow, so they stay inline.
pub type Segments<'a> = SmallVec<[&'a str; 8]>;

/// Split a path into its segments, rejecting empty paths and empty segments.
pub fn segments(path: &str) -> Result<Segments<'_>> {
    if path.is_empty() {
        return Err(Error::MalformedPath {
            path: path.to_string(),
            reason: "path is empty".into(),
        });
    }
    let segments: Segments<'_> = path.split(SEPARATOR).collect();
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        return Err(Error::MalformedPath {
            path: path.to_string(),
            reason: format!("empty segment at position {pos}"),
        });
    }
    Ok(segments)
}

/// Check a path for well-formedness without keeping the segments.
pub fn validate(path: &str) -> Result<()> {
    segments(path).map(|_| ())
}

/// The path with its last segment removed, or `None` for a root path.
pub fn prefix(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|i| &path[..i])
}

/// The last segment of a path (the field name, or the root class itself).
pub fn last_segment(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Append a field to a parent path.
pub fn join(parent: &str, field_name: &str) -> String {
    let mut path = String::with_capacity(parent.len() + 1 + field_name.len());
    path.push_str(parent);
    path.push(SEPARATOR);
    path.push_str(field_name);
    path
}

/// Number of segments in a well-formed path.
pub fn depth(path: &str) -> usize {
    path.matches(SEPARATOR).count() + 1
}
