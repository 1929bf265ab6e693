//! Webhook handlers for messaging platforms
//!
//! ## Modules
//!
//! - [`line`] - LINE Messaging API webhook: verification, decoding, dispatch and reply
//! - [`routes`] - Route configuration

pub mod line;
pub mod routes;

use line::{client::ImplReplySender, triggers::TriggerTable};
use std::sync::Arc;

/// Immutable per-worker state, built once in `main`.
///
/// Every field is read-only while requests are served.
#[derive(Clone)]
pub struct AppState {
    /// 🔒 SENSITIVE: LINE channel secret
    pub channel_secret: String,
    pub trigger_table: Arc<TriggerTable>,
    pub reply_sender: ImplReplySender,
}
