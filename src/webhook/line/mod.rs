//! LINE webhook integration module
//!
//! ## Submodules
//!
//! - [`security`] - `X-Line-Signature` verification
//! - [`schemas`] - Incoming webhook payloads and the event decoder
//! - [`messages`] - Outgoing message payloads (text, media, templates)
//! - [`triggers`] - Trigger table: exact text to reply mapping
//! - [`dispatcher`] - Picks the reply for a text message
//! - [`client`] - Reply API client and the [`client::ReplySender`] seam
//! - [`handler`] - Per-request event processing
//! - [`routes`] - HTTP endpoint handler
//! - [`errors`] - Error taxonomy and its HTTP mapping

pub mod client;
pub mod dispatcher;
pub mod errors;
pub mod handler;
pub mod messages;
pub mod routes;
pub mod schemas;
pub mod security;
pub mod triggers;

pub use routes::callback;
