pub const LINE_SIGNATURE_HEADER: &str = "X-Line-Signature";
pub const LINE_REQUEST_ID_HEADER: &str = "x-line-request-id";
pub const LINE_REPLY_PATH: &str = "/v2/bot/message/reply";

/// The reply API rejects requests carrying more messages than this.
pub const MAX_REPLY_MESSAGES: usize = 5;

pub const STATIC_ROUTE: &str = "/static";
