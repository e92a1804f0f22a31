//! Core application logic for the container app CLI
//!
//! This module contains the manifest model, the override resolver, the
//! management API client and the verification helper.
//!
//! # Examples
//!
//! ```rust,no_run
//! use containerapp::app::{
//!     create_from_manifest, AccessToken, ClientConfig, ContainerAppsClient, ManifestDocument,
//!     OverrideSet, PollPolicy, ResourceTarget,
//! };
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = AccessToken::from_env_or(None)?;
//! let client = ContainerAppsClient::new(&ClientConfig::default(), &token)?;
//! let target = ResourceTarget::new("my-subscription", "my-rg", "yaml1app")?;
//!
//! let manifest = ManifestDocument::load(Path::new("app.yml")).await?;
//! let overrides = OverrideSet::new().with_environment_id(target.environment_id("env2"));
//!
//! let deployment = create_from_manifest(
//!     &client,
//!     &target,
//!     manifest,
//!     &overrides,
//!     Some(&PollPolicy::default()),
//!     |_| {},
//! )
//! .await?;
//!
//! for warning in &deployment.warnings {
//!     eprintln!("WARNING: {}", warning);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod deploy;
pub mod manifest;
pub mod models;
pub mod resolver;
pub mod verify;

// Re-export main public API
pub use client::{
    wait_for_provisioning, AccessToken, ClientConfig, ContainerAppsClient, PollPolicy, ResourceApi,
};
pub use deploy::{create_from_manifest, Deployment};
pub use manifest::{FieldPath, ManifestDocument, ManifestFormat, ScopedManifestFile};
pub use models::{ProvisioningState, ResourceTarget};
pub use resolver::{resolve, validate, ConflictWarning, OverrideSet, ResolvedManifest};
pub use verify::{verify, verify_all, Expectation};
