//! Application constants for the container app CLI
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Bearer token used to authenticate against the management API
    pub const ACCESS_TOKEN: &str = "CONTAINERAPP_ACCESS_TOKEN";

    /// Default subscription id
    pub const SUBSCRIPTION: &str = "CONTAINERAPP_SUBSCRIPTION";

    /// Management API endpoint override
    pub const ENDPOINT: &str = "CONTAINERAPP_ENDPOINT";

    /// Default location for resources created without one
    pub const LOCATION: &str = "CONTAINERAPP_LOCATION";

    /// Explicit configuration file path
    pub const CONFIG: &str = "CONTAINERAPP_CONFIG";
}

/// Management API constants
pub mod api {
    /// Default resource management endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

    /// API version sent with every container app request
    pub const API_VERSION: &str = "2024-03-01";

    /// Resource provider namespace
    pub const PROVIDER_NAMESPACE: &str = "Microsoft.App";

    /// Resource type of a container app, as written in manifests
    pub const CONTAINER_APP_TYPE: &str = "Microsoft.App/containerApps";

    /// Resource id segment for container apps
    pub const CONTAINER_APPS_SEGMENT: &str = "containerApps";

    /// Resource id segment for managed environments
    pub const MANAGED_ENVIRONMENTS_SEGMENT: &str = "managedEnvironments";
}

/// Manifest field paths that the resolver and validation know about
pub mod fields {
    /// Top-level location of the resource
    pub const LOCATION: &str = "location";

    /// Top-level resource type
    pub const TYPE: &str = "type";

    /// Managed environment the app runs in
    pub const ENVIRONMENT_ID: &str = "properties.environmentId";

    /// Provisioning state reported by the service
    pub const PROVISIONING_STATE: &str = "properties.provisioningState";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("containerapp-cli/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting configuration
pub mod limits {
    /// Default client-side rate limit (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;
}

/// Provisioning wait configuration
pub mod polling {
    use super::Duration;

    /// Delay between two provisioning state checks
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Upper bound on the whole provisioning wait
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
}

/// Provisioning state values reported by the service
pub mod provisioning {
    pub const SUCCEEDED: &str = "Succeeded";
    pub const FAILED: &str = "Failed";
    pub const CANCELED: &str = "Canceled";
    pub const IN_PROGRESS: &str = "InProgress";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "containerapp.toml";

    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "containerapp";

    /// File name inside the user config dir
    pub const FILE_NAME: &str = "config.toml";
}

// Convenience re-exports for commonly used constants
pub use api::{API_VERSION, CONTAINER_APP_TYPE, DEFAULT_ENDPOINT};
pub use http::USER_AGENT;
pub use limits::DEFAULT_RATE_LIMIT_RPS;
