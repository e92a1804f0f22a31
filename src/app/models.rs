//! Data models shared by the resolver, the client and the CLI
//!
//! [`ResourceTarget`] names the container app a request addresses and
//! renders its resource id. [`ProvisioningState`] reads the lifecycle status
//! out of a resource representation.

use std::fmt;

use serde_json::Value;

use crate::app::manifest::FieldPath;
use crate::constants::{api, fields, provisioning};
use crate::errors::{ValidationError, ValidationResult};

/// Maximum length of a container app name
const MAX_APP_NAME_LENGTH: usize = 32;

/// Maximum length of a resource group name
const MAX_GROUP_NAME_LENGTH: usize = 90;

/// The container app a create or show request addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTarget {
    subscription_id: String,
    resource_group: String,
    name: String,
}

impl ResourceTarget {
    /// Build a target, validating the group and app name
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> ValidationResult<Self> {
        let target = Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            name: name.into(),
        };

        if target.subscription_id.trim().is_empty() {
            return Err(ValidationError::InvalidName {
                kind: "subscription",
                value: target.subscription_id,
                reason: "subscription id cannot be empty".to_string(),
            });
        }
        validate_group_name(&target.resource_group)?;
        validate_app_name(&target.name)?;

        Ok(target)
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full resource id of the container app
    pub fn resource_id(&self) -> String {
        format!(
            "{}/{}/{}",
            self.provider_prefix(),
            api::CONTAINER_APPS_SEGMENT,
            self.name
        )
    }

    /// Resource id of a managed environment given by name or by id
    ///
    /// Values that already look like resource ids are returned unchanged;
    /// bare names are taken to live in this target's subscription and group.
    pub fn environment_id(&self, name_or_id: &str) -> String {
        if is_resource_id(name_or_id) {
            name_or_id.to_string()
        } else {
            format!(
                "{}/{}/{}",
                self.provider_prefix(),
                api::MANAGED_ENVIRONMENTS_SEGMENT,
                name_or_id
            )
        }
    }

    fn provider_prefix(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}",
            self.subscription_id,
            self.resource_group,
            api::PROVIDER_NAMESPACE
        )
    }
}

impl fmt::Display for ResourceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (resource group {})", self.name, self.resource_group)
    }
}

/// Whether a string is a resource id rather than a bare name
pub fn is_resource_id(value: &str) -> bool {
    value
        .get(..15)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("/subscriptions/"))
}

fn validate_app_name(name: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidName {
        kind: "container app name",
        value: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() < 2 || name.len() > MAX_APP_NAME_LENGTH {
        return Err(invalid("must be between 2 and 32 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            "may contain only lowercase letters, digits and hyphens",
        ));
    }
    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid("must start with a letter"));
    }
    if name.ends_with('-') || name.contains("--") {
        return Err(invalid(
            "cannot end with a hyphen or contain consecutive hyphens",
        ));
    }
    Ok(())
}

fn validate_group_name(group: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidName {
        kind: "resource group",
        value: group.to_string(),
        reason: reason.to_string(),
    };

    if group.is_empty() || group.len() > MAX_GROUP_NAME_LENGTH {
        return Err(invalid("must be between 1 and 90 characters"));
    }
    if !group
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
    {
        return Err(invalid(
            "may contain only letters, digits, '-', '_', '.', '(' and ')'",
        ));
    }
    if group.ends_with('.') {
        return Err(invalid("cannot end with a period"));
    }
    Ok(())
}

/// Lifecycle status reported in `properties.provisioningState`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningState {
    Succeeded,
    Failed,
    Canceled,
    InProgress,
    /// Any other transitional state the service reports
    Other(String),
}

impl ProvisioningState {
    /// Parse a state string, case-insensitively
    pub fn parse(state: &str) -> Self {
        if state.eq_ignore_ascii_case(provisioning::SUCCEEDED) {
            ProvisioningState::Succeeded
        } else if state.eq_ignore_ascii_case(provisioning::FAILED) {
            ProvisioningState::Failed
        } else if state.eq_ignore_ascii_case(provisioning::CANCELED) {
            ProvisioningState::Canceled
        } else if state.eq_ignore_ascii_case(provisioning::IN_PROGRESS) {
            ProvisioningState::InProgress
        } else {
            ProvisioningState::Other(state.to_string())
        }
    }

    /// Read the state from a resource representation
    pub fn of(resource: &Value) -> Option<Self> {
        let path = FieldPath::parse(fields::PROVISIONING_STATE).ok()?;
        path.lookup(resource)
            .and_then(Value::as_str)
            .map(Self::parse)
    }

    /// Whether the service will not change this state on its own
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProvisioningState::Succeeded | ProvisioningState::Failed | ProvisioningState::Canceled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProvisioningState::Succeeded => provisioning::SUCCEEDED,
            ProvisioningState::Failed => provisioning::FAILED,
            ProvisioningState::Canceled => provisioning::CANCELED,
            ProvisioningState::InProgress => provisioning::IN_PROGRESS,
            ProvisioningState::Other(state) => state,
        }
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
