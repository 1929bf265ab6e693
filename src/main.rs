//! # LINE Reply Bot
//!
//! Main entry point for the LINE Messaging API reply bot.
//! Loads configuration, builds the trigger catalog, configures logging and
//! SSL, and serves the webhook plus the static media it references.
#![recursion_limit = "256"]

pub mod catalog;
pub mod config;
pub mod consts;
pub mod logger;
pub mod metric;
pub mod webhook;

use envconfig::Envconfig;
use logfire::config::MetricsOptions;
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use std::sync::Arc;
use tracing::info;
use webhook::line::{client::LineClient, triggers::TriggerTable};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    let app_config = config::AppConfig::init_from_env()?;

    // Initialize logging and metrics
    let shutdown_handler = match &app_config.logfire_token {
        Some(token) => Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(token.as_str())
                .finish()?,
        ),
        None => {
            logger::setup_simple_logger()?;
            None
        }
    };

    info!("Starting with config: {:?}", app_config);

    let trigger_table = build_trigger_table(&app_config)?;
    info!(
        "Trigger catalog loaded: {} triggers [{}]",
        trigger_table.len(),
        trigger_table.triggers().join(", ")
    );

    let app_state = webhook::AppState {
        channel_secret: app_config.line_channel_secret.clone(),
        trigger_table: Arc::new(trigger_table),
        reply_sender: Arc::new(LineClient::new(&app_config)?),
    };

    // Configure and start the web server
    configure_and_run_server(&app_config, app_state).await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

/// Loads the trigger table from `TRIGGER_TABLE_PATH`, or the built-in catalog
fn build_trigger_table(app_config: &config::AppConfig) -> anyhow::Result<TriggerTable> {
    let resolver = catalog::AssetResolver::new(&app_config.public_base_url)
        .map_err(|e| anyhow::anyhow!("Invalid PUBLIC_BASE_URL: {}", e))?;

    let table = match &app_config.trigger_table_path {
        Some(path) => catalog::load_table(path, &resolver)
            .map_err(|e| anyhow::anyhow!("Failed to load trigger table from {}: {}", path, e))?,
        None => catalog::default_table(&resolver)
            .map_err(|e| anyhow::anyhow!("Invalid built-in trigger catalog: {}", e))?,
    };

    Ok(table)
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: &config::AppConfig,
    app_state: webhook::AppState,
) -> anyhow::Result<()> {
    let server_addr = app_config.server_addr();
    let static_dir = app_config.static_dir.clone();

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(app_state.clone())
            .configure(webhook::routes::line)
            .service(ntex_files::Files::new(consts::STATIC_ROUTE, &static_dir))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    info!("Listening on {}:{}", app_config.web_server_host, app_config.web_server_port);

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
