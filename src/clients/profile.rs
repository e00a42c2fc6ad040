use reqwest::Method;

use crate::config;
use crate::error::ClientError;

use super::types::UserProfileResponse;
use super::ServiceClient;

/// Typed contract of the profile service's internal endpoints.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    inner: ServiceClient,
}

impl ProfileClient {
    pub fn from_config() -> Result<Self, ClientError> {
        Self::new(&config::config().endpoints.profile_url)
    }

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            inner: ServiceClient::new(base_url)?,
        })
    }

    pub async fn get_user_profile(
        &self,
        user_id: &str,
    ) -> Result<UserProfileResponse, ClientError> {
        let request = self
            .inner
            .request(Method::GET, &format!("internal/profiles/{user_id}"))?;
        self.inner.execute(request).await
    }

    /// Batch lookup; the profile service accepts repeated `userIds` params.
    pub async fn get_user_profiles(
        &self,
        user_ids: &[&str],
    ) -> Result<Vec<UserProfileResponse>, ClientError> {
        let params: Vec<(&str, &str)> = user_ids.iter().map(|id| ("userIds", *id)).collect();
        let request = self
            .inner
            .request(Method::GET, "internal/profiles/batch")?
            .query(&params);
        self.inner.execute(request).await
    }

    /// Users currently available for assignment.
    pub async fn get_available_users(&self) -> Result<Vec<UserProfileResponse>, ClientError> {
        let request = self.inner.request(Method::GET, "internal/profiles/available")?;
        self.inner.execute(request).await
    }

    /// Current workload in hours for one user.
    pub async fn get_user_current_workload(&self, user_id: &str) -> Result<i32, ClientError> {
        let request = self
            .inner
            .request(Method::GET, &format!("internal/profiles/{user_id}/workload"))?;
        self.inner.execute(request).await
    }
}
