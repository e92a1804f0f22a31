//! Field paths into structured documents
//!
//! A path is a dotted list of keys with optional positional indexes, e.g.
//! `properties.configuration.ingress.additionalPortMappings[1].exposedPort`.
//! Keys containing `.` (such as identity resource ids) can be written in
//! double quotes: `identity.userAssignedIdentities."/subscriptions/.../id"`.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::errors::{ManifestError, ManifestResult, ValidationError, ValidationResult};

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// Parsed address of a value inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a path, see the module docs for the syntax
    pub fn parse(input: &str) -> ManifestResult<Self> {
        let segments = parse_segments(input).map_err(|reason| ManifestError::InvalidPath {
            path: input.to_string(),
            reason,
        })?;
        Ok(Self {
            raw: input.to_string(),
            segments,
        })
    }

    /// Path segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Render the first `len` segments, used to name the parent of a failed write
    pub fn prefix(&self, len: usize) -> String {
        if len == 0 {
            return "<root>".to_string();
        }
        render(&self.segments[..len.min(self.segments.len())])
    }

    /// Resolve the path against a value
    ///
    /// Returns `None` when a key is missing, an index is out of range, or an
    /// intermediate value has the wrong shape.
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                Segment::Key(key) => current.as_object()?.get(key),
                Segment::Index(index) => current.as_array()?.get(*index),
            })
    }
}

impl FromStr for FieldPath {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split a `PATH=VALUE` assignment
///
/// The value is read as JSON when it parses as JSON (`false`, `12345`,
/// `"50"`, `{}`) and taken as a plain string otherwise, so resource ids and
/// image names need no quoting.
pub fn parse_assignment(input: &str) -> ValidationResult<(FieldPath, Value)> {
    let (raw_path, raw_value) =
        input
            .split_once('=')
            .ok_or_else(|| ValidationError::InvalidAssignment {
                input: input.to_string(),
                reason: "expected PATH=VALUE".to_string(),
            })?;

    let path = FieldPath::parse(raw_path.trim()).map_err(|e| ValidationError::InvalidAssignment {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    let value = serde_json::from_str(raw_value)
        .unwrap_or_else(|_| Value::String(raw_value.to_string()));

    Ok((path, value))
}

fn parse_segments(input: &str) -> Result<Vec<Segment>, String> {
    if input.is_empty() {
        return Err("path is empty".to_string());
    }

    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut need_key = true;

    while let Some(&c) = chars.peek() {
        match c {
            '[' => {
                if need_key && !segments.is_empty() {
                    return Err("expected a key after '.'".to_string());
                }
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        Some(other) => return Err(format!("unexpected '{}' in index", other)),
                        None => return Err("unterminated index".to_string()),
                    }
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| "index must be a non-negative integer".to_string())?;
                segments.push(Segment::Index(index));
                need_key = false;
            }
            '.' => {
                if need_key {
                    return Err("empty key".to_string());
                }
                chars.next();
                need_key = true;
            }
            '"' => {
                if !need_key {
                    return Err("expected '.' before quoted key".to_string());
                }
                chars.next();
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some(ch) => key.push(ch),
                        None => return Err("unterminated quoted key".to_string()),
                    }
                }
                segments.push(Segment::Key(key));
                need_key = false;
            }
            ']' => return Err("unexpected ']'".to_string()),
            _ => {
                if !need_key {
                    return Err(format!("expected '.' or '[' before '{}'", c));
                }
                let mut key = String::new();
                while let Some(&ch) = chars.peek() {
                    match ch {
                        '.' | '[' => break,
                        ']' | '"' => return Err(format!("unexpected '{}' in key", ch)),
                        _ => {
                            key.push(ch);
                            chars.next();
                        }
                    }
                }
                segments.push(Segment::Key(key));
                need_key = false;
            }
        }
    }

    if need_key {
        return Err("path ends with '.'".to_string());
    }

    Ok(segments)
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                if key.contains(['.', '[', ']']) {
                    out.push('"');
                    out.push_str(key);
                    out.push('"');
                } else {
                    out.push_str(key);
                }
            }
            Segment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}
