//! LINE webhook endpoint handler
//!
//! # Security
//!
//! Every request must carry an `X-Line-Signature` header matching the HMAC of
//! the raw body. Nothing in the body is parsed before that check passes.
//!
//! # Processing
//!
//! Replies are sent before the response is written, so the status code tells
//! LINE whether the whole batch was answered. Any non-2xx status makes LINE
//! redeliver the request.

use super::{errors::WebhookError, handler, schemas, security};
use crate::{consts, webhook::AppState};
use ntex::{util::Bytes, web};
use tracing::{debug, info};

/// Webhook receiver endpoint (POST)
///
/// # Returns
/// - 200 with body `OK` when every text event was answered
/// - 400 if the signature is missing or invalid, or the body is malformed
/// - 500 if a reply could not be sent
#[web::post("/callback")]
pub async fn callback(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let _span = logfire::span!("line_webhook").entered();

    let Some(signature) = req
        .headers()
        .get(consts::LINE_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        logfire::warn!("Missing or unreadable X-Line-Signature header");
        return Err(WebhookError::InvalidSignature.into());
    };

    if !security::verify_signature(&body, signature, &app_state.channel_secret) {
        return Err(WebhookError::InvalidSignature.into());
    }

    debug!("Request body: {}", String::from_utf8_lossy(&body));

    let events = schemas::decode(&body)?;
    let summary = handler::process_events(
        events,
        &app_state.trigger_table,
        app_state.reply_sender.as_ref(),
    )
    .await?;

    info!(
        "Webhook processed: {} replied, {} skipped",
        summary.replied, summary.skipped
    );

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body("OK"))
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog, consts,
        webhook::{
            self, AppState,
            line::{
                client::MockReplySender,
                errors::SendError,
                messages::{Action, OutboundMessage, Template},
                security::sign,
            },
        },
    };
    use ntex::{http, util::Bytes, web, web::test};
    use std::sync::Arc;

    const SECRET: &str = "test_channel_secret";

    fn app_state(sender: MockReplySender) -> AppState {
        let resolver = catalog::AssetResolver::new("https://bot.example.com/static/").unwrap();

        AppState {
            channel_secret: SECRET.to_string(),
            trigger_table: Arc::new(catalog::default_table(&resolver).unwrap()),
            reply_sender: Arc::new(sender),
        }
    }

    fn text_body(reply_token: &str, text: &str) -> String {
        serde_json::json!({
            "destination": "U0",
            "events": [{
                "type": "message",
                "mode": "active",
                "timestamp": 1462629479859_i64,
                "source": {"type": "user", "userId": "U4af4980629"},
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "deliveryContext": {"isRedelivery": false},
                "replyToken": reply_token,
                "message": {"id": "444573844083572737", "type": "text", "text": text}
            }]
        })
        .to_string()
    }

    async fn post_callback(
        sender: MockReplySender,
        body: String,
        signature: Option<String>,
    ) -> (http::StatusCode, Bytes) {
        let app = test::init_service(
            web::App::new()
                .state(app_state(sender))
                .configure(webhook::routes::line),
        )
        .await;

        let mut req = test::TestRequest::post().uri("/callback");
        if let Some(signature) = signature {
            req = req.header(consts::LINE_SIGNATURE_HEADER, signature.as_str());
        }

        let resp = test::call_service(&app, req.set_payload(body).to_request()).await;
        let status = resp.status();
        (status, test::read_body(resp).await)
    }

    #[ntex::test]
    async fn test_text_trigger_replies_configured_text() {
        let body = text_body("token-a", "文字");
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender
            .expect_reply()
            .withf(|token, messages| {
                token.as_str() == "token-a"
                    && messages == &vec![OutboundMessage::text("這是文字訊息")]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, resp_body) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(resp_body, Bytes::from_static(b"OK"));
    }

    #[ntex::test]
    async fn test_unknown_text_is_echoed() {
        let body = text_body("token-b", "不存在的指令");
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender
            .expect_reply()
            .withf(|token, messages| {
                token.as_str() == "token-b"
                    && messages == &vec![OutboundMessage::text("不存在的指令")]
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, _) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::OK);
    }

    #[ntex::test]
    async fn test_invalid_signature_is_rejected_without_reply() {
        let body = text_body("token-c", "文字");
        let signature = sign(body.as_bytes(), "another_secret");

        let mut sender = MockReplySender::new();
        sender.expect_reply().times(0);

        let (status, resp_body) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(resp_body, Bytes::from_static(b"Invalid signature"));
    }

    #[ntex::test]
    async fn test_missing_signature_is_rejected_without_reply() {
        let mut sender = MockReplySender::new();
        sender.expect_reply().times(0);

        let (status, _) = post_callback(sender, text_body("token-c", "文字"), None).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
    }

    #[ntex::test]
    async fn test_confirm_trigger_replies_confirm_template() {
        let body = text_body("token-d", "確認卡");
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender
            .expect_reply()
            .withf(|token, messages| {
                token.as_str() == "token-d"
                    && match messages.as_slice() {
                        [
                            OutboundMessage::Template {
                                template: Template::Confirm { actions, .. },
                                ..
                            },
                        ] => actions.iter().map(Action::label).collect::<Vec<_>>() == ["是", "否"],
                        _ => false,
                    }
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let (status, _) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::OK);
    }

    #[ntex::test]
    async fn test_malformed_body_with_valid_signature_is_rejected() {
        let body = r#"{"destination":"U0","events":[{"type":"message""#.to_string();
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender.expect_reply().times(0);

        let (status, _) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
    }

    #[ntex::test]
    async fn test_send_failure_is_server_error() {
        let body = text_body("token-expired", "文字");
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender.expect_reply().times(1).returning(|_, _| {
            Err(SendError::Api {
                status: 400,
                message: "Invalid reply token".into(),
            })
        });

        let (status, _) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[ntex::test]
    async fn test_verification_request_with_no_events() {
        let body = r#"{"destination":"U0","events":[]}"#.to_string();
        let signature = sign(body.as_bytes(), SECRET);

        let mut sender = MockReplySender::new();
        sender.expect_reply().times(0);

        let (status, resp_body) = post_callback(sender, body, Some(signature)).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(resp_body, Bytes::from_static(b"OK"));
    }
}
