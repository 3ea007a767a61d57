//! Form paths
//!
//! A form path addresses one location in the form document: dot-separated
//! keys, each optionally followed by one bracketed array index, e.g.
//! `geometrics.Room.geometrics[2]`.

use crate::error::{PathError, PathResult};
use std::fmt;
use std::str::FromStr;

/// One step of a form path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: String,
    pub index: Option<usize>,
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    pub fn indexed(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index: Some(index),
        }
    }

    fn parse(path: &str, text: &str) -> PathResult<Self> {
        let Some(open) = text.find('[') else {
            if text.is_empty() {
                return Err(PathError::invalid(path, "empty segment"));
            }
            if text.contains(']') {
                return Err(PathError::invalid(path, format!("unopened bracket in '{}'", text)));
            }
            return Ok(Self::key(text));
        };

        let key = &text[..open];
        if key.is_empty() {
            return Err(PathError::invalid(path, format!("missing key before '{}'", text)));
        }

        let rest = &text[open + 1..];
        let close = rest
            .find(']')
            .ok_or_else(|| PathError::invalid(path, format!("unterminated index in '{}'", text)))?;
        if close + 1 != rest.len() {
            return Err(PathError::invalid(
                path,
                format!("unexpected text after index in '{}'", text),
            ));
        }

        let index = rest[..close]
            .parse::<usize>()
            .map_err(|_| PathError::invalid(path, format!("bad index '{}'", &rest[..close])))?;

        Ok(Self::indexed(key, index))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.key, index),
            None => write!(f, "{}", self.key),
        }
    }
}

/// A parsed form path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPath {
    segments: Vec<Segment>,
}

impl FormPath {
    /// Parse path text
    pub fn parse(text: &str) -> PathResult<Self> {
        if text.is_empty() {
            return Err(PathError::invalid(text, "empty path"));
        }
        let segments = text
            .split('.')
            .map(|part| Segment::parse(text, part))
            .collect::<PathResult<Vec<_>>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the parent segments and the final segment
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }

    /// Path extended by one key
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::key(key));
        Self { segments }
    }

    /// Path truncated to its first `len` segments, rendered as text
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())]
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Whether every segment is a plain key equal to the given keys
    pub fn is_keys(&self, keys: &[&str]) -> bool {
        self.segments.len() == keys.len()
            && self
                .segments
                .iter()
                .zip(keys)
                .all(|(segment, key)| segment.index.is_none() && segment.key == *key)
    }
}

impl FromStr for FormPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix(self.segments.len()))
    }
}

/// Join a dotted prefix and a key
pub fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
