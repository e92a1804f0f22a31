//! Management API client for container apps
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `auth`: bearer token resolution
//! - `http`: core HTTP operations with rate limiting and error mapping
//! - `poll`: waiting for a resource to finish provisioning
//!
//! Callers depend on the [`ResourceApi`] trait so the create and show flows
//! can run against an in-memory service in tests.

use std::future::Future;

use serde_json::Value;
use url::Url;

use crate::app::manifest::ManifestDocument;
use crate::app::models::ResourceTarget;
use crate::constants::api;
use crate::errors::{Result, ServiceError, ServiceResult};

pub mod auth;
pub mod config;
pub mod http;
pub mod poll;

pub use auth::AccessToken;
pub use config::ClientConfig;
pub use poll::{wait_for_provisioning, PollPolicy};

use http::HttpHandler;

/// Operations the create and show flows need from the service
pub trait ResourceApi {
    /// Create or update the container app with the given document as body
    fn create_or_update(
        &self,
        target: &ResourceTarget,
        document: &ManifestDocument,
    ) -> impl Future<Output = ServiceResult<Value>> + Send;

    /// Fetch the current representation of the container app
    fn show(&self, target: &ResourceTarget) -> impl Future<Output = ServiceResult<Value>> + Send;
}

/// HTTP client for the container apps management API
#[derive(Debug)]
pub struct ContainerAppsClient {
    http_handler: HttpHandler,
    endpoint: Url,
}

impl ContainerAppsClient {
    /// Creates a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot carry a path, the HTTP client
    /// cannot be built, or the rate limit is zero
    pub fn new(config: &ClientConfig, token: &AccessToken) -> Result<Self> {
        if config.endpoint.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl {
                url: config.endpoint.to_string(),
                error: "endpoint must be an http(s) base URL".to_string(),
            }
            .into());
        }

        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps, token.bearer_header()?)?;

        tracing::debug!("Created management API client for {}", config.endpoint);

        Ok(Self {
            http_handler,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}{resource_id}?api-version=...`
    pub fn resource_url(&self, target: &ResourceTarget) -> Url {
        let mut url = self.endpoint.clone();
        let path = format!(
            "{}{}",
            self.endpoint.path().trim_end_matches('/'),
            target.resource_id()
        );
        url.set_path(&path);
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("api-version", api::API_VERSION);
        url
    }
}

impl ResourceApi for ContainerAppsClient {
    async fn create_or_update(
        &self,
        target: &ResourceTarget,
        document: &ManifestDocument,
    ) -> ServiceResult<Value> {
        let url = self.resource_url(target);
        tracing::info!("Creating or updating {}", target);
        self.http_handler
            .put_json(&url, document.as_value(), &target.resource_id())
            .await
    }

    async fn show(&self, target: &ResourceTarget) -> ServiceResult<Value> {
        let url = self.resource_url(target);
        self.http_handler
            .get_json(&url, &target.resource_id())
            .await
    }
}
