use reqwest::Method;

use crate::config;
use crate::error::ClientError;

use super::types::AssignmentRecommendation;
use super::ServiceClient;

/// Typed contract of the AI service.
///
/// Recommendation calls degrade to an empty candidate list when the AI
/// service cannot be reached; assignment flows continue without scoring.
#[derive(Debug, Clone)]
pub struct AiClient {
    inner: ServiceClient,
}

impl AiClient {
    pub fn from_config() -> Result<Self, ClientError> {
        Self::new(&config::config().endpoints.ai_url)
    }

    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            inner: ServiceClient::new(base_url)?,
        })
    }

    pub async fn generate_task_recommendations(
        &self,
        task_id: &str,
    ) -> Result<Vec<AssignmentRecommendation>, ClientError> {
        let request = self
            .inner
            .request(Method::POST, &format!("ai/recommendations/task/{task_id}"))?;
        match self.inner.execute(request).await {
            Ok(recommendations) => Ok(recommendations),
            Err(ClientError::Transport(err)) => {
                tracing::warn!(
                    "AI service is unavailable, returning empty recommendations for task {task_id}: {err}"
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    pub async fn health_check(&self) -> Result<String, ClientError> {
        let request = self.inner.request(Method::GET, "ai/health")?;
        self.inner.execute(request).await
    }
}
