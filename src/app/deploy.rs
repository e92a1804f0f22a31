//! Create flow: resolve, submit, wait
//!
//! Ties the resolver to a [`ResourceApi`]. The manifest is resolved against
//! the overrides first, so a manifest that fails validation never reaches
//! the service.

use serde_json::Value;
use tracing::info;

use crate::app::client::{wait_for_provisioning, PollPolicy, ResourceApi};
use crate::app::manifest::ManifestDocument;
use crate::app::models::{ProvisioningState, ResourceTarget};
use crate::app::resolver::{resolve, ConflictWarning, OverrideSet};
use crate::errors::Result;

/// Result of a create call
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    /// Resource representation as last returned by the service
    pub resource: Value,
    pub warnings: Vec<ConflictWarning>,
    pub injected: Vec<String>,
}

impl Deployment {
    pub fn provisioning_state(&self) -> Option<ProvisioningState> {
        ProvisioningState::of(&self.resource)
    }
}

/// Resolve `manifest` against `overrides` and create the container app
///
/// With `wait` set, polls until provisioning reaches a terminal state;
/// `on_poll` sees every state read. Without it, the create response is
/// returned as-is.
pub async fn create_from_manifest<A: ResourceApi>(
    api: &A,
    target: &ResourceTarget,
    manifest: ManifestDocument,
    overrides: &OverrideSet,
    wait: Option<&PollPolicy>,
    on_poll: impl FnMut(Option<&ProvisioningState>),
) -> Result<Deployment> {
    let resolved = resolve(manifest, overrides)?;
    if !resolved.injected.is_empty() {
        info!("Filled from overrides: {}", resolved.injected.join(", "));
    }

    let created = api.create_or_update(target, &resolved.document).await?;

    let resource = match wait {
        Some(policy) => wait_for_provisioning(api, target, policy, created, on_poll).await?,
        None => created,
    };

    Ok(Deployment {
        resource,
        warnings: resolved.warnings,
        injected: resolved.injected,
    })
}
