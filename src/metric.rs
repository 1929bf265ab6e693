use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static REPLY_STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("line_reply_bot_statds")
        .with_description("LINE reply bot statistics")
        .with_unit("event")
        .build()
});

fn incr_statds(metric: String, value: String) {
    REPLY_STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// Outcome of one webhook event: "matched", "echo", "send_failed" or "skipped".
pub fn incr_reply_outcome_statds(outcome: &str) {
    incr_statds("reply_outcome".to_string(), outcome.into())
}

pub fn incr_rejected_request_statds(reason: &str) {
    incr_statds("rejected_request".to_string(), reason.into())
}
