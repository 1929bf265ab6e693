//! Application configuration management with security considerations.
//!
//! All values come from environment variables. The configuration is loaded once
//! in `main` and handed explicitly to whatever needs it; there is no global copy.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - The `Debug` impl redacts every sensitive field

use crate::consts;
use envconfig::Envconfig;
use std::fmt;

/// Application configuration with security-aware field management.
///
/// # Security Requirements
/// - Use secret management systems in production to inject `SENSITIVE` values
/// - Never log or expose sensitive values
/// - Rotate the channel access token regularly
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// 🔒 SENSITIVE: LINE channel secret, used to verify webhook signatures
    pub line_channel_secret: String,

    /// 🔒 SENSITIVE: LINE channel access token for the Messaging API
    pub line_channel_access_token: String,

    /// LINE Messaging API base URL (NON-SENSITIVE)
    #[envconfig(default = "https://api.line.me")]
    pub line_api_base_url: String,

    /// Timeout for a single reply API call, in seconds (NON-SENSITIVE)
    #[envconfig(default = "10")]
    pub line_reply_timeout_secs: u64,

    /// Public base URL the LINE CDN uses to fetch payload media (NON-SENSITIVE)
    /// Example: "https://bot.example.com/static/"
    #[envconfig(default = "https://localhost:8080/static/")]
    pub public_base_url: String,

    /// Directory served under `/static` (NON-SENSITIVE)
    #[envconfig(default = "web/static/")]
    pub static_dir: String,

    /// Optional JSON file replacing the built-in trigger catalog (NON-SENSITIVE)
    pub trigger_table_path: Option<String>,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Logfire write token. Logs go to stdout when unset.
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Constructs the LINE Messaging API endpoint for reply messages
    pub fn line_reply_endpoint(&self) -> String {
        format!(
            "{base}{path}",
            base = self.line_api_base_url.trim_end_matches('/'),
            path = consts::LINE_REPLY_PATH
        )
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.web_server_host.clone(), self.web_server_port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "[REDACTED]";

        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("web_server_host", &self.web_server_host)
            .field("web_server_port", &self.web_server_port)
            .field("line_channel_secret", &REDACTED)
            .field("line_channel_access_token", &REDACTED)
            .field("line_api_base_url", &self.line_api_base_url)
            .field("line_reply_timeout_secs", &self.line_reply_timeout_secs)
            .field("public_base_url", &self.public_base_url)
            .field("static_dir", &self.static_dir)
            .field("trigger_table_path", &self.trigger_table_path)
            .field("private_key_path", &self.private_key_path)
            .field("certificate_path", &self.certificate_path)
            .field("logfire_token", &self.logfire_token.as_ref().map(|_| REDACTED))
            .finish()
    }
}
