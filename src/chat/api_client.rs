use super::redact::log_excerpt;
use super::types::*;
use crate::config::ApiConfig;
use crate::error::ChatError;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The backend seen from the conversation service. Implemented over HTTP by
/// [`TriageApiClient`]; tests can substitute their own.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
    async fn delete_session(&self, session_id: &str) -> Result<SessionAck, ChatError>;
}

pub struct TriageApiClient {
    client: Client,
    base_url: String,
}

impl TriageApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ChatError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ChatError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ChatError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn health(&self) -> Result<HealthStatus, ChatError> {
        let url = self.endpoint(&["api", "health"])?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    pub async fn service_info(&self) -> Result<ServiceInfo, ChatError> {
        let url = self.endpoint(&[])?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    pub async fn session_info(&self, session_id: &str) -> Result<SessionInfo, ChatError> {
        let url = self.endpoint(&["api", "session", session_id])?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl ChatBackend for TriageApiClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let url = self.endpoint(&["api", "chat"])?;
        tracing::debug!(
            session_id = request.session_id.as_deref().unwrap_or("-"),
            message = %log_excerpt(&request.message, 200),
            "POST /api/chat"
        );

        let response = self.client.post(url).json(request).send().await?;
        let reply: ChatResponse = decode(response).await?;

        tracing::debug!(
            session_id = reply.session_id.as_deref().unwrap_or("-"),
            is_final = reply.is_final,
            "chat reply received"
        );
        Ok(reply)
    }

    async fn delete_session(&self, session_id: &str) -> Result<SessionAck, ChatError> {
        let url = self.endpoint(&["api", "session", session_id])?;
        let response = self.client.delete(url).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ChatError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    } else {
        // The error body is optional and may not even be JSON.
        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        if let Some(details) = &body.details {
            tracing::warn!(status = status.as_u16(), details = %details, "backend error details");
        }
        Err(ChatError::server(status.as_u16(), body.error))
    }
}
