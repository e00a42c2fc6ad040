pub mod types;

mod ai;
mod identity;
mod notification;
mod profile;

pub use ai::AiClient;
pub use identity::IdentityClient;
pub use notification::NotificationClient;
pub use profile::ProfileClient;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config;
use crate::context::CredentialContext;
use crate::error::ClientError;

use self::types::ApiResponse;

const SUCCESS_CODE: i32 = 1000;

/// Shared outbound HTTP core for the typed internal clients.
///
/// Owns the connection pool, base URL joining, internal call headers, the
/// response envelope decode, and the credential attachment hook that runs
/// immediately before every send.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ServiceClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let cfg = config::config();
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(cfg.http.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.http.request_timeout_secs))
            .build()?;

        // Relative joins need the base path to end in a slash, otherwise
        // the last segment gets replaced
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self { http, base_url })
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(self.http.request(method, url))
    }

    /// Send an internal call and decode the platform envelope.
    ///
    /// The credential is re-read from the propagation context on every call,
    /// so a mid-flow re-authentication is reflected on the next send.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let builder = builder
            .header("X-Internal-Request", "true")
            .header("X-Service-Name", config::config().service.name.as_str());
        let response = attach_credential(builder).send().await?;
        decode_envelope(response).await
    }
}

/// Attach the current unit of work's credential, if any.
///
/// A failure to read the context degrades to an unauthenticated call; the
/// receiving service enforces authorization on its own side.
fn attach_credential(builder: RequestBuilder) -> RequestBuilder {
    match CredentialContext::get() {
        Ok(Some(credential)) if !credential.is_empty() => {
            builder.bearer_auth(credential.as_str())
        }
        Ok(_) => {
            tracing::debug!("no credential in scope, sending unauthenticated internal call");
            builder
        }
        Err(err) => {
            tracing::warn!("credential read failed, sending unauthenticated internal call: {err}");
            builder
        }
    }
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ApiResponse<serde_json::Value>>()
            .await
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string()
            });
        return Err(ClientError::from_status(status, message));
    }

    let envelope = response.json::<ApiResponse<T>>().await?;
    if envelope.code != SUCCESS_CODE {
        return Err(ClientError::Api {
            code: envelope.code,
            message: envelope.message.unwrap_or_default(),
        });
    }
    envelope
        .result
        .ok_or_else(|| ClientError::Envelope("missing result field".to_string()))
}
