use crate::{consts, metric};
use derive_more::{Display, Error};
use ntex::{http, web};
use tracing::{error, warn};

/// Trigger table misconfiguration, detected when the table is built at startup.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("trigger {_0:?} has no messages")]
    EmptyTrigger(#[error(not(source))] String),
    #[display(
        "trigger {trigger:?} has {count} messages, a reply carries at most {}",
        consts::MAX_REPLY_MESSAGES
    )]
    TooManyMessages { trigger: String, count: usize },
    /// Media URL that cannot be turned into an absolute `https://` URL
    #[display("invalid media url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[display("cannot read trigger table: {_0}")]
    Io(std::io::Error),
    #[display("invalid trigger table: {_0}")]
    Json(serde_json::Error),
}

/// Failure of a single reply API call.
#[derive(Debug, Display, Error)]
pub enum SendError {
    /// Message count outside `1..=MAX_REPLY_MESSAGES`; never truncated
    #[display(
        "reply batch of {_0} messages is outside 1..={}",
        consts::MAX_REPLY_MESSAGES
    )]
    InvalidBatch(#[error(not(source))] usize),
    #[display("reply API request failed: {_0}")]
    Transport(reqwest::Error),
    #[display("reply API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Why a webhook request was not answered with `200 OK`.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("invalid signature")]
    InvalidSignature,
    #[display("malformed webhook body: {_0}")]
    MalformedBody(#[error(not(source))] String),
    #[display("{failed} of {attempted} replies failed, first error: {source}")]
    Send {
        failed: usize,
        attempted: usize,
        source: SendError,
    },
}

impl WebhookError {
    fn public_message(&self) -> &'static str {
        match self {
            WebhookError::InvalidSignature => "Invalid signature",
            WebhookError::MalformedBody(_) => "Malformed request body",
            WebhookError::Send { .. } => "Internal server error",
        }
    }
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        match self {
            WebhookError::InvalidSignature => {
                warn!("Rejected webhook request: {}", self);
                metric::incr_rejected_request_statds("invalid_signature");
            }
            WebhookError::MalformedBody(_) => {
                warn!("Rejected webhook request: {}", self);
                metric::incr_rejected_request_statds("malformed_body");
            }
            WebhookError::Send { .. } => {
                error!("Webhook request failed: {}", self);
            }
        }

        web::HttpResponse::build(self.status_code())
            .set_header("content-type", "text/plain; charset=utf-8")
            .body(self.public_message())
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::InvalidSignature | WebhookError::MalformedBody(_) => {
                http::StatusCode::BAD_REQUEST
            }
            WebhookError::Send { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
