use reqwest::Method;

use crate::config;
use crate::error::ClientError;

use super::types::{IntrospectRequest, IntrospectResponse, UserResponse};
use super::ServiceClient;

/// Typed contract of the identity service.
#[derive(Debug, Clone)]
pub struct IdentityClient {
    inner: ServiceClient,
}

impl IdentityClient {
    pub fn from_config() -> Result<Self, ClientError> {
        Self::new(&config::config().endpoints.identity_url)
    }

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            inner: ServiceClient::new(base_url)?,
        })
    }

    /// Validate a token and resolve the user it belongs to.
    pub async fn introspect(&self, token: &str) -> Result<IntrospectResponse, ClientError> {
        let request = self
            .inner
            .request(Method::POST, "auth/introspect")?
            .json(&IntrospectRequest {
                token: token.to_string(),
            });
        self.inner.execute(request).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserResponse, ClientError> {
        let request = self
            .inner
            .request(Method::GET, &format!("users/{user_id}"))?;
        self.inner.execute(request).await
    }
}
