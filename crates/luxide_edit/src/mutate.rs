//! Path-addressed mutation of the form document
//!
//! ## Key Concepts
//!
//! - **read** fails with `NotFound` at the first missing segment and with
//!   `InvalidPath` when it would step through a scalar.
//! - **ensure_skeleton** creates every missing container along a path. An
//!   indexed segment becomes an array padded with empty objects up to the
//!   index, at most [`MAX_PADDING`] elements past its end. Arrays of arrays
//!   and arrays of scalars are never created.
//! - **write_or_delete** with no value at `<table>.<name>.type` removes the
//!   whole table entry. Callers must drop any paths they held into it.

use crate::error::{PathError, PathResult};
use crate::path::{FormPath, Segment};
use luxide_schema::{EntityKind, Map, Value};

/// What a write did to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A value was stored at the path
    Written,
    /// The leaf was cleared, or was already absent
    Unset,
    /// A whole table entry was removed
    Deleted { kind: EntityKind, name: String },
}

fn step<'a>(current: &'a Value, segment: &Segment, path: &FormPath) -> PathResult<&'a Value> {
    let object = current.as_object().ok_or_else(|| {
        PathError::invalid(
            path.to_string(),
            format!("cannot read '{}' from {}", segment.key, current.type_name()),
        )
    })?;
    let child = object
        .get(&segment.key)
        .ok_or_else(|| PathError::not_found(path.to_string()))?;

    match segment.index {
        None => Ok(child),
        Some(index) => {
            let array = child.as_array().ok_or_else(|| {
                PathError::invalid(
                    path.to_string(),
                    format!("cannot index into {} at '{}'", child.type_name(), segment.key),
                )
            })?;
            array
                .get(index)
                .ok_or_else(|| PathError::not_found(path.to_string()))
        }
    }
}

fn step_mut<'a>(
    current: &'a mut Value,
    segment: &Segment,
    path: &FormPath,
) -> PathResult<&'a mut Value> {
    let type_name = current.type_name();
    let object = current.as_object_mut().ok_or_else(|| {
        PathError::invalid(
            path.to_string(),
            format!("cannot read '{}' from {}", segment.key, type_name),
        )
    })?;
    let child = object
        .get_mut(&segment.key)
        .ok_or_else(|| PathError::not_found(path.to_string()))?;

    match segment.index {
        None => Ok(child),
        Some(index) => {
            let type_name = child.type_name();
            let array = child.as_array_mut().ok_or_else(|| {
                PathError::invalid(
                    path.to_string(),
                    format!("cannot index into {} at '{}'", type_name, segment.key),
                )
            })?;
            array
                .get_mut(index)
                .ok_or_else(|| PathError::not_found(path.to_string()))
        }
    }
}

/// Read the value at `path`
pub fn read<'a>(root: &'a Value, path: &FormPath) -> PathResult<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |current, segment| step(current, segment, path))
}

/// Most empty objects a single write may pad an array with
pub const MAX_PADDING: usize = 1024;

/// Make sure `array` has an element at `index`, padding with empty objects
fn pad(array: &mut Vec<Value>, index: usize, path: &FormPath) -> PathResult<()> {
    if index < array.len() {
        return Ok(());
    }
    let padding = index - array.len();
    if padding > MAX_PADDING {
        return Err(PathError::invalid(
            path.to_string(),
            format!(
                "index {} is more than {} past the end of an array of {}",
                index,
                MAX_PADDING,
                array.len()
            ),
        ));
    }
    array.resize(array.len() + padding + 1, Value::object());
    Ok(())
}

/// Get or create the container for `segment` inside `object`.
///
/// Returns the array element for indexed segments, the keyed child otherwise.
fn materialize<'a>(
    object: &'a mut Map,
    segment: &Segment,
    path: &FormPath,
) -> PathResult<&'a mut Value> {
    let child = object.entry(segment.key.clone()).or_insert(Value::Null);

    match segment.index {
        Some(index) => {
            if child.is_null() {
                *child = Value::Array(Vec::new());
            }
            let type_name = child.type_name();
            let array = child.as_array_mut().ok_or_else(|| {
                PathError::invalid(
                    path.to_string(),
                    format!("cannot index into {} at '{}'", type_name, segment.key),
                )
            })?;
            pad(array, index, path)?;
            Ok(&mut array[index])
        }
        None => {
            if child.is_null() {
                *child = Value::object();
            }
            Ok(child)
        }
    }
}

/// Create any missing container along `path`.
pub fn ensure_skeleton(root: &mut Value, path: &FormPath) -> PathResult<()> {
    if root.is_null() {
        *root = Value::object();
    }

    let count = path.len();
    let mut current = root;
    for (position, segment) in path.segments().iter().enumerate() {
        let is_last = position + 1 == count;
        let type_name = current.type_name();
        let object = current.as_object_mut().ok_or_else(|| {
            PathError::invalid(
                path.to_string(),
                format!("cannot create '{}' inside {}", segment.key, type_name),
            )
        })?;
        if is_last && segment.index.is_none() {
            break;
        }

        let child = materialize(object, segment, path)?;
        if is_last {
            break;
        }
        if child.is_null() {
            *child = Value::object();
        }
        current = child;
    }
    Ok(())
}

/// Store `value` at `path`. The parent must already exist.
pub fn set_leaf(root: &mut Value, path: &FormPath, value: Value) -> PathResult<()> {
    let (last, parents) = path
        .split_last()
        .ok_or_else(|| PathError::invalid(path.to_string(), "empty path"))?;

    let mut parent = root;
    for segment in parents {
        parent = step_mut(parent, segment, path)?;
    }

    let type_name = parent.type_name();
    let object = parent.as_object_mut().ok_or_else(|| {
        PathError::invalid(
            path.to_string(),
            format!("cannot set '{}' on {}", last.key, type_name),
        )
    })?;

    match last.index {
        None => {
            object.insert(last.key.clone(), value);
        }
        Some(index) => {
            let slot = object
                .get_mut(&last.key)
                .and_then(Value::as_array_mut)
                .and_then(|array| array.get_mut(index))
                .ok_or_else(|| PathError::not_found(path.to_string()))?;
            *slot = value;
        }
    }
    Ok(())
}

/// Store `value` at `path`, creating missing containers first
pub fn write(root: &mut Value, path: &FormPath, value: Value) -> PathResult<()> {
    ensure_skeleton(root, path)?;
    set_leaf(root, path, value)
}

/// The tagged table entry a `<table>.<name>.type` path points at
fn entry_type_target(path: &FormPath) -> Option<(EntityKind, &str)> {
    let [table, name, field] = path.segments() else {
        return None;
    };
    if table.index.is_some() || name.index.is_some() || field.index.is_some() {
        return None;
    }
    if field.key != "type" {
        return None;
    }
    EntityKind::from_table_name(&table.key)
        .filter(|kind| kind.is_tagged())
        .map(|kind| (kind, name.key.as_str()))
}

/// Clear the leaf at `path`. Array elements become null; keys are removed.
fn unset(root: &mut Value, path: &FormPath) -> PathResult<WriteOutcome> {
    let Some((last, parents)) = path.split_last() else {
        return Err(PathError::invalid(path.to_string(), "empty path"));
    };

    let mut parent = root;
    for segment in parents {
        parent = match step_mut(parent, segment, path) {
            Ok(next) => next,
            Err(PathError::NotFound { .. }) => return Ok(WriteOutcome::Unset),
            Err(err) => return Err(err),
        };
    }

    let Some(object) = parent.as_object_mut() else {
        return Err(PathError::invalid(
            path.to_string(),
            format!("cannot unset '{}'", last.key),
        ));
    };

    match last.index {
        None => {
            object.shift_remove(&last.key);
        }
        Some(index) => {
            if let Some(slot) = object
                .get_mut(&last.key)
                .and_then(Value::as_array_mut)
                .and_then(|array| array.get_mut(index))
            {
                *slot = Value::Null;
            }
        }
    }
    Ok(WriteOutcome::Unset)
}

/// Write `value` at `path`, or clear it when `value` is `None`.
///
/// Clearing the `type` of an entry in the geometric, material or texture
/// table deletes the entry.
pub fn write_or_delete(
    root: &mut Value,
    path: &FormPath,
    value: Option<Value>,
) -> PathResult<WriteOutcome> {
    match value {
        Some(value) => {
            write(root, path, value)?;
            Ok(WriteOutcome::Written)
        }
        None => match entry_type_target(path) {
            Some((kind, name)) => {
                let removed = root
                    .get_mut(kind.table_name())
                    .and_then(Value::as_object_mut)
                    .and_then(|table| table.shift_remove(name));
                match removed {
                    Some(_) => {
                        log::debug!("Deleted {} '{}'", kind, name);
                        Ok(WriteOutcome::Deleted {
                            kind,
                            name: name.to_string(),
                        })
                    }
                    None => Ok(WriteOutcome::Unset),
                }
            }
            None => unset(root, path),
        },
    }
}
