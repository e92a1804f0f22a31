//! Bearer token handling
//!
//! The management API takes an OAuth bearer token. Acquiring one is left to
//! the user's usual tooling; this module only picks it up from the
//! environment or the config file and turns it into a header.

use std::env;
use std::fmt;

use reqwest::header::HeaderValue;

use crate::constants::env as env_constants;
use crate::errors::{AuthError, AuthResult};

/// An access token for the management API
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token, rejecting empty or non-printable values
    pub fn new(token: impl Into<String>) -> AuthResult<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if !token.chars().all(|c| c.is_ascii_graphic()) {
            return Err(AuthError::InvalidToken {
                reason: "token must be printable ASCII without whitespace".to_string(),
            });
        }
        Ok(Self(token))
    }

    /// Token from `CONTAINERAPP_ACCESS_TOKEN`, falling back to the configured one
    pub fn from_env_or(configured: Option<&str>) -> AuthResult<Self> {
        Self::from_sources(env::var(env_constants::ACCESS_TOKEN).ok(), configured)
    }

    /// Pick the first non-empty source
    pub fn from_sources(from_env: Option<String>, configured: Option<&str>) -> AuthResult<Self> {
        match from_env.filter(|t| !t.trim().is_empty()) {
            Some(token) => Self::new(token),
            None => configured.map_or(Err(AuthError::MissingToken), Self::new),
        }
    }

    /// `Authorization` header value, marked sensitive
    pub fn bearer_header(&self) -> AuthResult<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0)).map_err(|e| {
            AuthError::InvalidToken {
                reason: e.to_string(),
            }
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
