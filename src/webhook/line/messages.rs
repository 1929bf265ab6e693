//! # LINE Outgoing Message Schemas
//!
//! One sum type per concept: [`OutboundMessage`] for message kinds,
//! [`Template`] for template kinds and [`Action`] for template actions.
//! The serde derives are the wire encoder, producing the Messaging API JSON
//! (`type` tag, camelCase fields). The same format is accepted when a trigger
//! table is loaded from a file.

use super::schemas::ReplyToken;
use serde::{Deserialize, Serialize};

/// Message sent back to LINE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OutboundMessage {
    Text {
        text: String,
        /// LINE emojis replacing `$` placeholders in `text`
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        emojis: Vec<Emoji>,
    },
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
    Video {
        original_content_url: String,
        preview_image_url: String,
    },
    Audio {
        original_content_url: String,
        /// Length in milliseconds
        duration: u64,
    },
    Location {
        title: String,
        address: String,
        latitude: f64,
        longitude: f64,
    },
    Template {
        /// Shown in notifications and on clients that cannot render templates
        alt_text: String,
        template: Template,
    },
}

/// LINE emoji placed at a `$` character of a text message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emoji {
    /// Character index of the `$` placeholder
    pub index: usize,
    pub product_id: String,
    pub emoji_id: String,
}

/// Template message layouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Template {
    Confirm {
        text: String,
        actions: Vec<Action>,
    },
    Buttons {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thumbnail_image_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        text: String,
        actions: Vec<Action>,
    },
    Carousel {
        columns: Vec<CarouselColumn>,
    },
    ImageCarousel {
        columns: Vec<ImageCarouselColumn>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCarouselColumn {
    pub image_url: String,
    pub action: Action,
}

/// Action attached to a template button or column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Sends `text` as a message from the user
    Message { label: String, text: String },
    Uri { label: String, uri: String },
    Postback {
        label: String,
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    #[serde(rename = "datetimepicker")]
    DatetimePicker {
        label: String,
        data: String,
        mode: DatetimePickerMode,
    },
    Camera { label: String },
    CameraRoll { label: String },
    Location { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimePickerMode {
    Date,
    Time,
    Datetime,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text {
            text: text.into(),
            emojis: Vec::new(),
        }
    }

    pub fn sticker(package_id: impl Into<String>, sticker_id: impl Into<String>) -> Self {
        OutboundMessage::Sticker {
            package_id: package_id.into(),
            sticker_id: sticker_id.into(),
        }
    }

    pub fn template(alt_text: impl Into<String>, template: Template) -> Self {
        OutboundMessage::Template {
            alt_text: alt_text.into(),
            template,
        }
    }

    /// Media URLs the LINE CDN fetches: content, previews and template images.
    ///
    /// URI actions are links opened by the user and are not included.
    pub fn media_urls_mut(&mut self) -> Vec<&mut String> {
        match self {
            OutboundMessage::Image {
                original_content_url,
                preview_image_url,
            }
            | OutboundMessage::Video {
                original_content_url,
                preview_image_url,
            } => vec![original_content_url, preview_image_url],
            OutboundMessage::Audio {
                original_content_url,
                ..
            } => vec![original_content_url],
            OutboundMessage::Template { template, .. } => template.media_urls_mut(),
            OutboundMessage::Text { .. }
            | OutboundMessage::Sticker { .. }
            | OutboundMessage::Location { .. } => Vec::new(),
        }
    }
}

impl Template {
    fn media_urls_mut(&mut self) -> Vec<&mut String> {
        match self {
            Template::Confirm { .. } => Vec::new(),
            Template::Buttons {
                thumbnail_image_url,
                ..
            } => thumbnail_image_url.iter_mut().collect(),
            Template::Carousel { columns } => columns
                .iter_mut()
                .filter_map(|column| column.thumbnail_image_url.as_mut())
                .collect(),
            Template::ImageCarousel { columns } => columns
                .iter_mut()
                .map(|column| &mut column.image_url)
                .collect(),
        }
    }
}

impl Action {
    pub fn message(label: impl Into<String>, text: impl Into<String>) -> Self {
        Action::Message {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Action::Uri {
            label: label.into(),
            uri: uri.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Message { label, .. }
            | Action::Uri { label, .. }
            | Action::Postback { label, .. }
            | Action::DatetimePicker { label, .. }
            | Action::Camera { label }
            | Action::CameraRoll { label }
            | Action::Location { label } => label,
        }
    }
}

/// Body of `POST /v2/bot/message/reply`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageRequest {
    pub reply_token: ReplyToken,
    pub messages: Vec<OutboundMessage>,
    pub notification_disabled: bool,
}

impl ReplyMessageRequest {
    pub fn new(reply_token: ReplyToken, messages: Vec<OutboundMessage>) -> Self {
        Self {
            reply_token,
            messages,
            notification_disabled: false,
        }
    }
}

/// Error body returned by the Messaging API
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default)]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
}

impl ApiErrorResponse {
    /// One-line summary, e.g. `The request body has 1 error(s) [messages[0].text: May not be empty]`
    pub fn summary(&self) -> String {
        let details: Vec<String> = self
            .details
            .iter()
            .map(|detail| {
                format!(
                    "{}: {}",
                    detail.property.as_deref().unwrap_or("-"),
                    detail.message.as_deref().unwrap_or("-")
                )
            })
            .collect();

        if details.is_empty() {
            return self.message.clone();
        }

        format!("{} [{}]", self.message, details.join(", "))
    }
}
