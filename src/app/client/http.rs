//! Core HTTP operations with rate limiting
//!
//! Every request passes through a client-side rate limiter and carries the
//! bearer token. Responses are decoded as JSON; failures are mapped from the
//! management API's error envelope:
//!
//! ```json
//! { "error": { "code": "InvalidParameterValue", "message": "..." } }
//! ```
//!
//! Requests are not retried. A failed call is reported to the caller as-is.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::{ConfigError, ServiceError, ServiceResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
    authorization: HeaderValue,
}

impl HttpHandler {
    /// Creates a new HttpHandler
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for requests
    /// * `rate_limit_rps` - Requests per second rate limit
    /// * `authorization` - Value of the `Authorization` header
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the rate limit is zero
    pub fn new(
        client: Client,
        rate_limit_rps: u32,
        authorization: HeaderValue,
    ) -> Result<Self, ConfigError> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
            authorization,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> Result<DirectRateLimiter, ConfigError> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "client.rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// GET a resource as JSON
    ///
    /// A 404 is reported as [`ServiceError::NotFound`] for `resource_id`.
    pub async fn get_json(&self, url: &Url, resource_id: &str) -> ServiceResult<Value> {
        self.execute(self.client.get(url.as_str()), resource_id).await
    }

    /// PUT a JSON body and decode the JSON response
    pub async fn put_json(
        &self,
        url: &Url,
        body: &Value,
        resource_id: &str,
    ) -> ServiceResult<Value> {
        self.execute(self.client.put(url.as_str()).json(body), resource_id)
            .await
    }

    async fn execute(&self, request: RequestBuilder, resource_id: &str) -> ServiceResult<Value> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let response = request
            .header(AUTHORIZATION, self.authorization.clone())
            .send()
            .await?;

        let status = response.status();
        debug!("{} responded with HTTP {}", resource_id, status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound {
                resource_id: resource_id.to_string(),
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(error_from_envelope(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse {
            reason: format!("response body is not valid JSON: {}", e),
        })
    }
}

/// Map a failed response to a [`ServiceError::Service`]
///
/// Falls back to the status reason and raw body when the envelope is absent.
pub(crate) fn error_from_envelope(status: StatusCode, body: &str) -> ServiceError {
    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").cloned());

    let field = |name: &str| {
        error
            .as_ref()
            .and_then(|e| e.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let code = field("code").unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("UnknownError")
            .replace(' ', "")
    });
    let message = field("message").unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "no error details returned".to_string()
        } else {
            trimmed.to_string()
        }
    });

    ServiceError::Service {
        status: status.as_u16(),
        code,
        message,
    }
}
