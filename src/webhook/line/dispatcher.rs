//! Chooses the reply for a text message.
//!
//! Matching is exact string equality against the trigger table. Text that
//! matches nothing is echoed back as a single text message.

use super::{messages::OutboundMessage, schemas::TextMessageEvent, triggers::TriggerTable};

/// Returns the messages to reply with. Never empty.
pub fn dispatch(event: &TextMessageEvent, table: &TriggerTable) -> Vec<OutboundMessage> {
    match table.get(&event.text) {
        Some(messages) => messages.to_vec(),
        None => vec![OutboundMessage::text(event.text.clone())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::line::{
        messages::{Action, Template},
        schemas::ReplyToken,
    };

    fn text_event(reply_token: &str, text: &str) -> TextMessageEvent {
        TextMessageEvent {
            reply_token: ReplyToken::new(reply_token),
            text: text.to_string(),
            is_redelivery: false,
        }
    }

    fn table() -> TriggerTable {
        TriggerTable::new()
            .with("文字", vec![OutboundMessage::text("這是文字訊息")])
            .unwrap()
            .with(
                "確認卡",
                vec![OutboundMessage::template(
                    "Confirm alt text",
                    Template::Confirm {
                        text: "確認卡有出現嗎?".into(),
                        actions: vec![Action::message("是", "讚喔"), Action::message("否", "否!")],
                    },
                )],
            )
            .unwrap()
            .with(
                "two",
                vec![
                    OutboundMessage::text("one"),
                    OutboundMessage::sticker("6362", "11087923"),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_unmatched_text_is_echoed() {
        let table = table();

        for text in ["不存在的指令", "", "  文字  ", "文字\n", "TWO", "hello world"] {
            let messages = dispatch(&text_event("token", text), &table);
            assert_eq!(messages, [OutboundMessage::text(text)]);
        }
    }

    #[test]
    fn test_matched_text_returns_configured_sequence() {
        let table = table();

        assert_eq!(
            dispatch(&text_event("token", "文字"), &table),
            [OutboundMessage::text("這是文字訊息")]
        );
        assert_eq!(
            dispatch(&text_event("token", "two"), &table),
            table.get("two").unwrap()
        );
    }

    #[test]
    fn test_reply_token_does_not_affect_choice() {
        let table = table();

        let first = dispatch(&text_event("token-a", "確認卡"), &table);
        let mut redelivered = text_event("token-b", "確認卡");
        redelivered.is_redelivery = true;
        let second = dispatch(&redelivered, &table);

        assert_eq!(first, second);
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        let table = table();
        let event = text_event("token", "不存在的指令");

        assert_eq!(dispatch(&event, &table), dispatch(&event, &table));

        let event = text_event("token", "two");
        assert_eq!(dispatch(&event, &table), dispatch(&event, &table));
    }

    #[test]
    fn test_empty_table_always_echoes() {
        let messages = dispatch(&text_event("token", "文字"), &TriggerTable::new());

        assert_eq!(messages, [OutboundMessage::text("文字")]);
    }
}
