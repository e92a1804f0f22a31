//! Manifest override resolution
//!
//! A manifest and a handful of command-line values can both name the same
//! field (the target environment, the location, anything passed with
//! `--set`). Resolution merges them into one document for submission:
//!
//! - a field missing from the manifest takes the override's value,
//! - a field present in the manifest keeps the manifest's value, and a
//!   [`ConflictWarning`] is recorded when the override disagrees,
//! - every other field passes through untouched, lists in their original
//!   order.
//!
//! Resolution is pure. The caller decides how to surface the warnings.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::app::manifest::{parse_assignment, FieldPath, ManifestDocument};
use crate::constants::{api, fields};
use crate::errors::{ValidationError, ValidationResult};

/// How an override is compared with the manifest value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Structural equality
    Exact,
    /// Resource ids, compared ASCII case-insensitively
    ResourceId,
}

/// One value supplied outside the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    /// Logical name used in warnings (`environmentId`, `location`, ...)
    pub field: String,
    pub path: FieldPath,
    pub value: Value,
    pub comparison: Comparison,
}

impl Override {
    /// Whether the manifest value agrees with this override
    fn agrees_with(&self, manifest_value: &Value) -> bool {
        match (self.comparison, manifest_value, &self.value) {
            (Comparison::ResourceId, Value::String(manifest), Value::String(ours)) => {
                manifest.eq_ignore_ascii_case(ours)
            }
            _ => manifest_value == &self.value,
        }
    }
}

/// Values supplied alongside a manifest at submission time
///
/// At most one override exists per path; adding a second one for the same
/// path replaces the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    entries: Vec<Override>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target environment, as a full resource id
    pub fn with_environment_id(mut self, environment_id: impl Into<String>) -> Self {
        self.push(Override {
            field: "environmentId".to_string(),
            path: known_path(fields::ENVIRONMENT_ID),
            value: Value::String(environment_id.into()),
            comparison: Comparison::ResourceId,
        });
        self
    }

    /// Resource location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.push(Override {
            field: "location".to_string(),
            path: known_path(fields::LOCATION),
            value: Value::String(location.into()),
            comparison: Comparison::Exact,
        });
        self
    }

    /// Arbitrary field, named by its path
    pub fn with_field(mut self, path: FieldPath, value: Value) -> Self {
        self.push(Override {
            field: path.to_string(),
            path,
            value,
            comparison: Comparison::Exact,
        });
        self
    }

    /// Add `PATH=VALUE` assignments as field overrides
    pub fn with_assignments<I, S>(mut self, assignments: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            let (path, value) = parse_assignment(assignment.as_ref())?;
            self = self.with_field(path, value);
        }
        Ok(self)
    }

    /// Add an override, replacing any earlier one for the same path
    pub fn push(&mut self, entry: Override) {
        match self.entries.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A field where the manifest and an override disagree
///
/// The manifest value is the one kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictWarning {
    pub field: String,
    pub path: String,
    pub manifest_value: Value,
    pub override_value: Value,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The value of '{}' in the manifest ({}) differs from the override ({}); \
             the manifest value is used.",
            self.field,
            display_value(&self.manifest_value),
            display_value(&self.override_value)
        )
    }
}

/// Outcome of resolving a manifest against overrides
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedManifest {
    /// Document to submit
    pub document: ManifestDocument,
    /// One entry per disagreeing field
    pub warnings: Vec<ConflictWarning>,
    /// Paths filled in from overrides
    pub injected: Vec<String>,
}

/// Merge `overrides` into `manifest`, manifest values taking precedence
///
/// # Errors
///
/// Returns `ValidationError` when an override cannot be written into the
/// document, or when the resolved document lacks `location` or `type`.
pub fn resolve(
    manifest: ManifestDocument,
    overrides: &OverrideSet,
) -> ValidationResult<ResolvedManifest> {
    let mut document = manifest;
    let mut warnings = Vec::new();
    let mut injected = Vec::new();

    for entry in overrides.iter() {
        let existing = document.get(&entry.path).filter(|v| !v.is_null()).cloned();

        match existing {
            None => {
                debug!(
                    "Manifest has no '{}', using override value {}",
                    entry.path,
                    display_value(&entry.value)
                );
                document.insert(&entry.path, entry.value.clone())?;
                injected.push(entry.path.to_string());
            }
            Some(manifest_value) if entry.agrees_with(&manifest_value) => {
                debug!("Manifest and override agree on '{}'", entry.path);
            }
            Some(manifest_value) => {
                let warning = ConflictWarning {
                    field: entry.field.clone(),
                    path: entry.path.to_string(),
                    manifest_value,
                    override_value: entry.value.clone(),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    validate(&document)?;

    Ok(ResolvedManifest {
        document,
        warnings,
        injected,
    })
}

/// Check the fields every submitted manifest needs
pub fn validate(document: &ManifestDocument) -> ValidationResult<()> {
    for field in [fields::LOCATION, fields::TYPE] {
        let present = document
            .get(&known_path(field))
            .is_some_and(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            });
        if !present {
            return Err(ValidationError::MissingField {
                field: field.to_string(),
            });
        }
    }

    let resource_type = document.get(&known_path(fields::TYPE));
    match resource_type.and_then(Value::as_str) {
        Some(t) if t.eq_ignore_ascii_case(api::CONTAINER_APP_TYPE) => Ok(()),
        _ => Err(ValidationError::UnsupportedType {
            found: resource_type.map(display_value).unwrap_or_default(),
            expected: api::CONTAINER_APP_TYPE.to_string(),
        }),
    }
}

fn known_path(path: &'static str) -> FieldPath {
    FieldPath::parse(path).expect("built-in field paths should be valid")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
