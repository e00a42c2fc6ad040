use reqwest::Method;

use crate::config;
use crate::error::ClientError;

use super::types::TaskAssignmentNotificationRequest;
use super::ServiceClient;

/// Typed contract of the notification service's internal send endpoints.
#[derive(Debug, Clone)]
pub struct NotificationClient {
    inner: ServiceClient,
}

impl NotificationClient {
    pub fn from_config() -> Result<Self, ClientError> {
        Self::new(&config::config().endpoints.notification_url)
    }

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            inner: ServiceClient::new(base_url)?,
        })
    }

    /// Dispatch through whatever channel the request names.
    pub async fn send(
        &self,
        request: &TaskAssignmentNotificationRequest,
    ) -> Result<String, ClientError> {
        let req = self
            .inner
            .request(Method::POST, "internal/notifications/send")?
            .json(request);
        self.inner.execute(req).await
    }

    pub async fn send_websocket(
        &self,
        request: &TaskAssignmentNotificationRequest,
    ) -> Result<String, ClientError> {
        let req = self
            .inner
            .request(Method::POST, "internal/notifications/websocket/send")?
            .json(request);
        self.inner.execute(req).await
    }

    pub async fn send_email(
        &self,
        request: &TaskAssignmentNotificationRequest,
    ) -> Result<String, ClientError> {
        let req = self
            .inner
            .request(Method::POST, "internal/notifications/email/send")?
            .json(request);
        self.inner.execute(req).await
    }
}
