//! Manifest document parsing and serialization
//!
//! A [`ManifestDocument`] is the manifest as a structured tree. Key order of
//! the source text is kept, so a document written back out lists fields in
//! the order the author used.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use super::path::{FieldPath, Segment};
use crate::errors::{ManifestError, ManifestResult, ValidationError, ValidationResult};

/// Text format of a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }

    /// File extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ManifestFormat::Yaml => ".yml",
            ManifestFormat::Json => ".json",
        }
    }
}

/// A parsed manifest whose root is a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Value,
}

impl ManifestDocument {
    /// Parse manifest text in the given format
    ///
    /// YAML merge keys (`<<: *anchor`) are expanded before conversion.
    /// Scalars follow YAML 1.2, so `yes`/`no`/`on`/`off` stay strings.
    pub fn parse(text: &str, format: ManifestFormat) -> ManifestResult<Self> {
        let root: Value = match format {
            ManifestFormat::Yaml => {
                let mut yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
                yaml.apply_merge()?;
                serde_yaml::from_value(yaml)?
            }
            ManifestFormat::Json => serde_json::from_str(text)?,
        };
        Self::from_value(root)
    }

    /// Parse YAML manifest text
    pub fn parse_yaml(text: &str) -> ManifestResult<Self> {
        Self::parse(text, ManifestFormat::Yaml)
    }

    /// Parse JSON manifest text
    pub fn parse_json(text: &str) -> ManifestResult<Self> {
        Self::parse(text, ManifestFormat::Json)
    }

    /// Read and parse a manifest file, detecting the format from its extension
    pub async fn load(path: &Path) -> ManifestResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Io(e)
            }
        })?;

        let format = ManifestFormat::from_path(path);
        debug!("Parsing {:?} manifest from {}", format, path.display());
        Self::parse(&text, format)
    }

    /// Wrap an existing value, which must be a mapping
    pub fn from_value(root: Value) -> ManifestResult<Self> {
        if root.is_object() {
            Ok(Self { root })
        } else {
            Err(ManifestError::NotAMapping {
                found: kind_of(&root),
            })
        }
    }

    /// Value at `path`, if the path resolves
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.lookup(&self.root)
    }

    /// String value at `path`
    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Whether `path` resolves to a non-null value
    pub fn contains(&self, path: &FieldPath) -> bool {
        self.get(path).is_some_and(|v| !v.is_null())
    }

    /// Write `value` at `path`, creating missing intermediate mappings
    ///
    /// List entries are never created: an index must already exist.
    pub fn insert(&mut self, path: &FieldPath, value: Value) -> ValidationResult<()> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            self.root = value;
            return Ok(());
        };

        let mut current = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            current = match segment {
                Segment::Key(key) => {
                    let map = current
                        .as_object_mut()
                        .ok_or_else(|| not_a_mapping(path, depth))?;
                    let entry = map
                        .entry(key.clone())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if entry.is_null() {
                        *entry = Value::Object(Map::new());
                    }
                    entry
                }
                Segment::Index(index) => current
                    .as_array_mut()
                    .and_then(|items| items.get_mut(*index))
                    .ok_or_else(|| ValidationError::MissingListEntry {
                        path: path.to_string(),
                        parent: path.prefix(depth + 1),
                    })?,
            };
        }

        match last {
            Segment::Key(key) => {
                let map = current
                    .as_object_mut()
                    .ok_or_else(|| not_a_mapping(path, parents.len()))?;
                map.insert(key.clone(), value);
            }
            Segment::Index(index) => {
                let slot = current
                    .as_array_mut()
                    .and_then(|items| items.get_mut(*index))
                    .ok_or_else(|| ValidationError::MissingListEntry {
                        path: path.to_string(),
                        parent: path.prefix(segments.len()),
                    })?;
                *slot = value;
            }
        }

        Ok(())
    }

    /// The underlying tree
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Consume the document, returning the underlying tree
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Serialize as YAML
    pub fn to_yaml_string(&self) -> ManifestResult<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> ManifestResult<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Serialize in the given format
    pub fn render(&self, format: ManifestFormat) -> ManifestResult<String> {
        match format {
            ManifestFormat::Yaml => self.to_yaml_string(),
            ManifestFormat::Json => self.to_json_string(),
        }
    }
}

fn not_a_mapping(path: &FieldPath, depth: usize) -> ValidationError {
    ValidationError::NotAMapping {
        path: path.to_string(),
        parent: path.prefix(depth),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
