//! Field checks against a resource representation
//!
//! An [`Expectation`] pairs a field path with the value it should hold.
//! Scalars compare by exact equality and list entries by position, so
//! `additionalPortMappings[1].exposedPort` checks the second mapping only.

use std::str::FromStr;

use serde_json::Value;

use crate::app::manifest::{parse_assignment, FieldPath};
use crate::errors::{AssertionError, FieldMismatch, ManifestResult, ValidationError};

/// Expected value at a path
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub path: FieldPath,
    pub expected: Value,
}

impl Expectation {
    pub fn new(path: &str, expected: impl Into<Value>) -> ManifestResult<Self> {
        Ok(Self {
            path: FieldPath::parse(path)?,
            expected: expected.into(),
        })
    }

    /// Check this expectation, returning the mismatch if any
    ///
    /// A path that does not resolve has the actual value `null`.
    pub fn check(&self, actual: &Value) -> Option<FieldMismatch> {
        let found = self.path.lookup(actual).cloned().unwrap_or(Value::Null);
        if found == self.expected {
            None
        } else {
            Some(FieldMismatch {
                path: self.path.to_string(),
                expected: self.expected.clone(),
                actual: found,
            })
        }
    }
}

impl FromStr for Expectation {
    type Err = ValidationError;

    /// Parse `PATH=VALUE`, see [`parse_assignment`] for value typing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, expected) = parse_assignment(s)?;
        Ok(Self { path, expected })
    }
}

/// Check every expectation, stopping at the first mismatch
pub fn verify(actual: &Value, expectations: &[Expectation]) -> Result<(), AssertionError> {
    match expectations.iter().find_map(|e| e.check(actual)) {
        Some(mismatch) => Err(AssertionError::Mismatch(mismatch)),
        None => Ok(()),
    }
}

/// Check every expectation, reporting all mismatches together
pub fn verify_all(actual: &Value, expectations: &[Expectation]) -> Result<(), AssertionError> {
    let mismatches: Vec<FieldMismatch> = expectations
        .iter()
        .filter_map(|e| e.check(actual))
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::Multiple(mismatches))
    }
}
