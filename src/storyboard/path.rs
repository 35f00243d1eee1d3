//! Copy-on-write edits addressed by a path of keys and indices.
//!
//! `set_at` never touches its input: it clones the tree, walks every segment
//! but the last, and assigns at the final one. Every intermediate segment
//! must already exist in the tree; a path that leaves the current shape is
//! rejected with `AppError::InvalidInput` rather than patched over.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::{AppError, AppResult};

/// One step into a JSON tree. Numbers address array slots, strings address
/// object keys; JSON itself cannot tell `"0"` from `0`, so callers choose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(idx) => write!(f, "[{idx}]"),
            Self::Key(key) => write!(f, ".{key}"),
        }
    }
}

pub type FieldPath = Vec<PathSegment>;

pub fn describe_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    let rendered: String = path.iter().map(ToString::to_string).collect();
    rendered.trim_start_matches('.').to_string()
}

pub fn get_at<'a>(tree: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, segment| child(node, segment))
}

pub fn set_at(tree: &Value, path: &[PathSegment], value: Value) -> AppResult<Value> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(value);
    };

    let mut root = tree.clone();
    let mut cursor = &mut root;
    for (depth, segment) in parents.iter().enumerate() {
        cursor = child_mut(cursor, segment).ok_or_else(|| unreachable_segment(path, depth))?;
    }

    match (cursor, last) {
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), value);
        }
        (Value::Array(items), PathSegment::Index(idx)) if *idx < items.len() => {
            items[*idx] = value;
        }
        _ => return Err(unreachable_segment(path, parents.len())),
    }
    Ok(root)
}

fn child<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(idx)) => items.get(*idx),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Array(items), PathSegment::Index(idx)) => items.get_mut(*idx),
        _ => None,
    }
}

fn unreachable_segment(path: &[PathSegment], depth: usize) -> AppError {
    AppError::InvalidInput(format!(
        "path {} does not exist at segment {}",
        describe_path(path),
        describe_path(&path[..=depth])
    ))
}
