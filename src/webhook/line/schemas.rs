//! # LINE Webhook Schemas
//!
//! Data structures for the JSON body LINE posts to the webhook URL.
//! Only the fields this service reads are modeled; everything else is ignored.
//! Event and message kinds this service does not know decode to `Unknown`
//! so new platform kinds never fail a whole batch.

use super::errors::WebhookError;
use serde::{Deserialize, Serialize};

/// Root webhook payload from LINE
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// User ID of the bot that should receive the events
    #[serde(default)]
    pub destination: Option<String>,
    /// Events in delivery order, possibly empty
    pub events: Vec<Event>,
}

/// Single-use token that scopes one reply API call to one event.
///
/// It is deliberately not `Clone`: sending a reply consumes it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyToken(String);

impl ReplyToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Webhook event, tagged by its `type` field
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Message(MessageEvent),
    Follow(ReplyableEvent),
    Unfollow(EventMeta),
    Join(ReplyableEvent),
    Leave(EventMeta),
    Postback(PostbackEvent),
    #[serde(other)]
    Unknown,
}

/// Fields shared by every event kind
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMeta {
    /// Milliseconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
    /// Channel state; events in standby mode carry no reply token
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub webhook_event_id: Option<String>,
    #[serde(default)]
    pub delivery_context: Option<DeliveryContext>,
}

impl EventMeta {
    pub fn is_redelivery(&self) -> bool {
        self.delivery_context
            .as_ref()
            .is_some_and(|ctx| ctx.is_redelivery)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Active,
    Standby,
    #[serde(other)]
    Unknown,
}

/// Where an event came from
#[derive(Debug, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum Source {
    User {
        #[serde(default)]
        user_id: Option<String>,
    },
    Group {
        #[serde(default)]
        group_id: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
    Room {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    #[serde(default)]
    pub is_redelivery: bool,
}

/// Message event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(default)]
    pub reply_token: Option<ReplyToken>,
    pub message: MessageContent,
}

/// Event kinds that can be answered but carry no content this service reads
/// (follow, join)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyableEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(default)]
    pub reply_token: Option<ReplyToken>,
}

/// Postback event, sent when a user taps a postback action
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    #[serde(flatten)]
    pub meta: EventMeta,
    #[serde(default)]
    pub reply_token: Option<ReplyToken>,
    #[serde(default)]
    pub postback: Option<Postback>,
}

#[derive(Debug, Deserialize)]
pub struct Postback {
    #[serde(default)]
    pub data: Option<String>,
}

/// Message content, tagged by its `type` field
#[derive(Debug, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum MessageContent {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
        #[serde(default)]
        quote_token: Option<String>,
    },
    Image {
        #[serde(default)]
        id: Option<String>,
    },
    Video {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        duration: Option<u64>,
    },
    Audio {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        duration: Option<u64>,
    },
    File {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        file_name: Option<String>,
        #[serde(default)]
        file_size: Option<u64>,
    },
    Location {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        latitude: Option<f64>,
        #[serde(default)]
        longitude: Option<f64>,
    },
    Sticker {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        package_id: Option<String>,
        #[serde(default)]
        sticker_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// The only event shape this service answers: a text message with a reply token
#[derive(Debug)]
pub struct TextMessageEvent {
    pub reply_token: ReplyToken,
    pub text: String,
    pub is_redelivery: bool,
}

impl Event {
    /// Short name used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Message(event) => match event.message {
                MessageContent::Text { .. } => "message:text",
                MessageContent::Image { .. } => "message:image",
                MessageContent::Video { .. } => "message:video",
                MessageContent::Audio { .. } => "message:audio",
                MessageContent::File { .. } => "message:file",
                MessageContent::Location { .. } => "message:location",
                MessageContent::Sticker { .. } => "message:sticker",
                MessageContent::Unknown => "message:unknown",
            },
            Event::Follow(_) => "follow",
            Event::Unfollow(_) => "unfollow",
            Event::Join(_) => "join",
            Event::Leave(_) => "leave",
            Event::Postback(_) => "postback",
            Event::Unknown => "unknown",
        }
    }

    /// Projects a text message event that can still be replied to.
    ///
    /// Returns `None` for every other event, and for text messages without a
    /// reply token (standby mode).
    pub fn into_text_message(self) -> Option<TextMessageEvent> {
        let Event::Message(MessageEvent {
            meta,
            reply_token: Some(reply_token),
            message: MessageContent::Text { text, .. },
        }) = self
        else {
            return None;
        };

        Some(TextMessageEvent {
            reply_token,
            text,
            is_redelivery: meta.is_redelivery(),
        })
    }
}

/// Decodes a verified webhook body into its events, preserving their order.
///
/// A body that is not a valid webhook envelope fails as a whole.
pub fn decode(raw_body: &[u8]) -> Result<Vec<Event>, WebhookError> {
    let payload: WebhookPayload = serde_json::from_slice(raw_body)
        .map_err(|e| WebhookError::MalformedBody(e.to_string()))?;

    tracing::debug!(
        "Decoded {} webhook events for destination {:?}",
        payload.events.len(),
        payload.destination
    );

    Ok(payload.events)
}
