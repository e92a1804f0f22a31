//! Prelude module for the container app library
//!
//! Re-exports the items needed for typical usage with a single
//! `use containerapp::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use containerapp::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let token = AccessToken::from_env_or(config.client.access_token.as_deref())?;
//!     let client = ContainerAppsClient::new(&config.to_client_config()?, &token)?;
//!
//!     let target = ResourceTarget::new("my-subscription", "my-rg", "yaml1app")?;
//!     let resource = client.show(&target).await?;
//!     verify(&resource, &["properties.provisioningState=Succeeded".parse()?])?;
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Manifest model and resolution
pub use crate::app::{
    resolve, ConflictWarning, FieldPath, ManifestDocument, ManifestFormat, OverrideSet,
    ResolvedManifest, ScopedManifestFile,
};

// Submitting and inspecting resources
pub use crate::app::{
    create_from_manifest, AccessToken, ClientConfig, ContainerAppsClient, Deployment, PollPolicy,
    ProvisioningState, ResourceApi, ResourceTarget,
};

// Verification
pub use crate::app::{verify, verify_all, Expectation};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{API_VERSION, CONTAINER_APP_TYPE, USER_AGENT};
