//! # LINE Webhook Handler
//!
//! Walks the decoded events of one webhook request and answers each text
//! message exactly once, with that event's own reply token.

use super::{
    client::ReplySender,
    dispatcher,
    errors::{SendError, WebhookError},
    schemas::Event,
    triggers::TriggerTable,
};
use crate::metric;
use tracing::{debug, error, info};

/// What happened to the events of one request
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// Events answered successfully
    pub replied: usize,
    /// Events this service does not answer
    pub skipped: usize,
}

/// Processes webhook events in order.
///
/// Events other than text messages with a reply token are skipped. A failed
/// reply does not stop the remaining events; once the batch is done the first
/// failure is returned so the request can be answered with an error status.
/// Replies already sent are not rolled back.
pub async fn process_events(
    events: Vec<Event>,
    table: &TriggerTable,
    sender: &(dyn ReplySender + Send + Sync),
) -> Result<ProcessSummary, WebhookError> {
    let mut summary = ProcessSummary::default();
    let mut failed = 0;
    let mut first_error: Option<SendError> = None;

    for event in events {
        let kind = event.kind();
        let Some(text_event) = event.into_text_message() else {
            debug!("Skipping webhook event of kind {}", kind);
            metric::incr_reply_outcome_statds("skipped");
            summary.skipped += 1;
            continue;
        };

        if text_event.is_redelivery {
            info!("Answering a redelivered webhook event");
        }

        let outcome = if table.contains(&text_event.text) {
            "matched"
        } else {
            "echo"
        };
        let messages = dispatcher::dispatch(&text_event, table);

        match sender.reply(text_event.reply_token, messages).await {
            Ok(()) => {
                metric::incr_reply_outcome_statds(outcome);
                summary.replied += 1;
            }
            Err(e) => {
                error!("Failed to send reply: {}", e);
                metric::incr_reply_outcome_statds("send_failed");
                failed += 1;
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(source) = first_error {
        return Err(WebhookError::Send {
            failed,
            attempted: summary.replied + failed,
            source,
        });
    }

    Ok(summary)
}
