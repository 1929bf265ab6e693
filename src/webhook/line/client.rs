//! # LINE Messaging API Client
//!
//! Sends reply messages. A reply is scoped to one webhook event by its reply
//! token, which the sender consumes; a failed call is never retried because
//! the token expires quickly and cannot be reused.

use super::{
    errors::SendError,
    messages::{ApiErrorResponse, OutboundMessage, ReplyMessageRequest},
    schemas::ReplyToken,
};
use crate::{config::AppConfig, consts};
use anyhow::Context;
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Delivers the reply for one event.
///
/// Implementations must make at most one API call per invocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplySender {
    async fn reply(
        &self,
        reply_token: ReplyToken,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SendError>;
}

pub type ImplReplySender = Arc<dyn ReplySender + Send + Sync>;

/// Checks the reply API batch limits. Oversized batches are rejected, not truncated.
pub fn validate_batch(messages: &[OutboundMessage]) -> Result<(), SendError> {
    if messages.is_empty() || messages.len() > consts::MAX_REPLY_MESSAGES {
        return Err(SendError::InvalidBatch(messages.len()));
    }
    Ok(())
}

/// LINE Messaging API client for reply messages
pub struct LineClient {
    /// HTTP client, built with the configured request timeout
    client: reqwest::Client,
    /// Reply endpoint, e.g. `https://api.line.me/v2/bot/message/reply`
    endpoint: String,
    /// Channel access token
    access_token: String,
}

impl LineClient {
    /// Creates a new LINE client from the application configuration
    pub fn new(app_config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(app_config.line_reply_timeout_secs))
            .build()
            .context("failed to build LINE API http client")?;

        Ok(Self {
            client,
            endpoint: app_config.line_reply_endpoint(),
            access_token: app_config.line_channel_access_token.clone(),
        })
    }
}

#[async_trait]
impl ReplySender for LineClient {
    async fn reply(
        &self,
        reply_token: ReplyToken,
        messages: Vec<OutboundMessage>,
    ) -> Result<(), SendError> {
        validate_batch(&messages)?;

        let request = ReplyMessageRequest::new(reply_token, messages);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(SendError::Transport)?;

        let status = response.status();
        let request_id = response
            .headers()
            .get(consts::LINE_REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-")
            .to_string();

        if status.is_success() {
            debug!(
                "Reply sent with {} messages, request id {}",
                request.messages.len(),
                request_id
            );
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|error| error.summary())
            .unwrap_or(body);

        warn!(
            "LINE reply API returned {}, request id {}: {}",
            status, request_id, message
        );

        Err(SendError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    fn client() -> LineClient {
        // Nothing listens there; the batch checks below fail before any request.
        LineClient::new(&test_config(&[("LINE_API_BASE_URL", "http://127.0.0.1:9")])).unwrap()
    }

    #[test]
    fn test_validate_batch() {
        assert!(validate_batch(&[OutboundMessage::text("x")]).is_ok());
        assert!(validate_batch(&vec![OutboundMessage::text("x"); 5]).is_ok());
        assert!(matches!(
            validate_batch(&[]),
            Err(SendError::InvalidBatch(0))
        ));
        assert!(matches!(
            validate_batch(&vec![OutboundMessage::text("x"); 6]),
            Err(SendError::InvalidBatch(6))
        ));
    }

    #[test]
    fn test_client_endpoint() {
        assert_eq!(client().endpoint, "http://127.0.0.1:9/v2/bot/message/reply");
    }

    #[ntex::test]
    async fn test_reply_rejects_empty_batch() {
        let result = client().reply(ReplyToken::new("token"), vec![]).await;

        assert!(matches!(result, Err(SendError::InvalidBatch(0))));
    }

    #[ntex::test]
    async fn test_reply_rejects_oversized_batch() {
        let messages = vec![OutboundMessage::text("x"); consts::MAX_REPLY_MESSAGES + 1];

        let result = client().reply(ReplyToken::new("token"), messages).await;

        assert!(matches!(result, Err(SendError::InvalidBatch(6))));
    }

    #[ntex::test]
    async fn test_reply_transport_error_is_surfaced() {
        let result = client()
            .reply(ReplyToken::new("token"), vec![OutboundMessage::text("x")])
            .await;

        assert!(matches!(result, Err(SendError::Transport(_))));
    }
}
