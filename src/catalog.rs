//! # Reply Catalog
//!
//! Builds the trigger table the bot starts with. The built-in catalog answers
//! the demo phrases (text, emoji, sticker, media, location and every template
//! kind); a JSON file in the reply API wire format can replace it.
//!
//! Media is served from the static directory, and the LINE CDN only fetches
//! HTTPS URLs, so relative asset names are resolved here against the public
//! base URL with the scheme upgraded.

use crate::webhook::line::{
    errors::ConfigError,
    messages::{Action, CarouselColumn, Emoji, ImageCarouselColumn, OutboundMessage, Template},
    triggers::{TriggerEntry, TriggerTable},
};
use reqwest::Url;
use std::path::Path;

/// Resolves asset names to absolute HTTPS URLs
#[derive(Debug, Clone)]
pub struct AssetResolver {
    base_url: Url,
}

impl AssetResolver {
    /// Fails unless `base_url` is an absolute `http` or `https` URL with a host.
    /// The scheme is upgraded to `https` and the path always ends with `/`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = parse_https(base_url, Url::parse(base_url))?;

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { base_url: url })
    }

    /// `Logo.jpg` becomes `{base_url}Logo.jpg`. Absolute URLs keep their
    /// host and path; `http` is upgraded to `https`, other schemes are rejected.
    pub fn resolve(&self, asset: &str) -> Result<String, ConfigError> {
        let joined = self.base_url.join(asset.trim_start_matches('/'));

        Ok(parse_https(asset, joined)?.into())
    }

    /// Resolves every media URL of `message` in place
    pub fn resolve_message(&self, message: &mut OutboundMessage) -> Result<(), ConfigError> {
        for url in message.media_urls_mut() {
            *url = self.resolve(url)?;
        }

        Ok(())
    }
}

fn parse_https<E: std::fmt::Display>(
    raw: &str,
    parsed: Result<Url, E>,
) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = parsed.map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    url.set_scheme("https").map_err(|()| invalid("cannot use https".to_string()))?;

    Ok(url)
}

/// Loads a trigger table from a JSON file of `{"trigger", "messages"}` entries.
///
/// Relative media URLs in the file are resolved with `resolver`.
pub fn load_table(
    path: impl AsRef<Path>,
    resolver: &AssetResolver,
) -> Result<TriggerTable, ConfigError> {
    let raw = std::fs::read(path.as_ref()).map_err(ConfigError::Io)?;
    table_from_json(&raw, resolver)
}

pub fn table_from_json(raw: &[u8], resolver: &AssetResolver) -> Result<TriggerTable, ConfigError> {
    let mut entries: Vec<TriggerEntry> = serde_json::from_slice(raw).map_err(ConfigError::Json)?;

    for message in entries.iter_mut().flat_map(|entry| entry.messages.iter_mut()) {
        resolver.resolve_message(message)?;
    }

    TriggerTable::from_entries(entries)
}

/// The built-in catalog
pub fn default_table(resolver: &AssetResolver) -> Result<TriggerTable, ConfigError> {
    let logo_url = resolver.resolve("Logo.jpg")?;

    TriggerTable::new()
        .with("文字", vec![OutboundMessage::text("這是文字訊息")])?
        .with(
            "表情符號",
            vec![OutboundMessage::Text {
                text: "$ LINE 表情符號 $".into(),
                emojis: vec![
                    Emoji {
                        index: 0,
                        product_id: "5ac1bfd5040ab15980c9b435".into(),
                        emoji_id: "001".into(),
                    },
                    Emoji {
                        index: 12,
                        product_id: "5ac1bfd5040ab15980c9b435".into(),
                        emoji_id: "002".into(),
                    },
                ],
            }],
        )?
        .with("貼圖", vec![OutboundMessage::sticker("6362", "11087923")])?
        .with(
            "圖片",
            vec![OutboundMessage::Image {
                original_content_url: logo_url.clone(),
                preview_image_url: logo_url.clone(),
            }],
        )?
        .with(
            "影片",
            vec![OutboundMessage::Video {
                original_content_url: resolver.resolve("video.mp4")?,
                // the preview must be an image
                preview_image_url: logo_url.clone(),
            }],
        )?
        .with(
            "音訊",
            vec![OutboundMessage::Audio {
                original_content_url: resolver.resolve("music.mp3")?,
                duration: 10_000,
            }],
        )?
        .with(
            "位置",
            vec![OutboundMessage::Location {
                title: "Location".into(),
                address: "Taipei".into(),
                latitude: 24.9472391,
                longitude: 121.2289817,
            }],
        )?
        .with(
            "確認卡",
            vec![OutboundMessage::template(
                "Confirm alt text",
                Template::Confirm {
                    text: "確認卡有出現嗎?".into(),
                    actions: vec![Action::message("是", "讚喔"), Action::message("否", "否!")],
                },
            )],
        )?
        .with(
            "圖片資訊卡",
            vec![OutboundMessage::template(
                "This is a buttons template",
                Template::Buttons {
                    thumbnail_image_url: Some(logo_url.clone()),
                    title: Some("標題".into()),
                    text: "詳細說明".into(),
                    actions: vec![
                        Action::Camera {
                            label: "拍照".into(),
                        },
                        Action::CameraRoll {
                            label: "選擇相片".into(),
                        },
                        Action::Location {
                            label: "選擇位置".into(),
                        },
                    ],
                },
            )],
        )?
        .with(
            "左右滑動 圖片資訊卡",
            vec![OutboundMessage::template(
                "這是 Carousel Template",
                Template::Carousel {
                    columns: vec![
                        CarouselColumn {
                            thumbnail_image_url: Some(logo_url.clone()),
                            title: Some("第一項".into()),
                            text: "這是第一項的描述".into(),
                            actions: vec![Action::uri("按我前往 Google", "https://www.google.com")],
                        },
                        CarouselColumn {
                            thumbnail_image_url: Some(logo_url),
                            title: Some("第二項".into()),
                            text: "這是第二項的描述".into(),
                            actions: vec![Action::uri("按我前往 Yahoo", "https://www.yahoo.com")],
                        },
                    ],
                },
            )],
        )?
        .with(
            "一列式圖片資訊卡",
            vec![OutboundMessage::template(
                "圖片輪播範本",
                Template::ImageCarousel {
                    columns: vec![
                        ImageCarouselColumn {
                            image_url: resolver.resolve("facebook.png")?,
                            action: Action::uri(
                                "造訪FB",
                                "https://www.facebook.com/NTUEBIGDATAEDU",
                            ),
                        },
                        ImageCarouselColumn {
                            image_url: resolver.resolve("instagram.png")?,
                            action: Action::uri(
                                "造訪IG",
                                "https://instagram.com/ntue.bigdata?igshid=YmMyMTA2M2Y=",
                            ),
                        },
                        ImageCarouselColumn {
                            image_url: resolver.resolve("youtube.png")?,
                            action: Action::uri("造訪YT", "https://www.youtube.com/@bigdatantue"),
                        },
                    ],
                },
            )],
        )
}
