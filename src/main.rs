use std::sync::Arc;

use mail_event_handler::audit::FileAuditLog;
use mail_event_handler::channels::SlackNotifier;
use mail_event_handler::config::HandlerConfig;
use mail_event_handler::pipeline::processor::EventHandler;
use mail_event_handler::pipeline::types::SuppressionRegistrar;
use mail_event_handler::server::event_routes;
use mail_event_handler::suppression::{HttpSuppressionRegistrar, InMemoryRegistrar};

#[tokio::main]
async fn main() -> mail_event_handler::error::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = HandlerConfig::from_env()?;

    eprintln!("📮 Mail Event Handler v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Alerts: Slack {}", config.slack.channel);
    eprintln!("   Audit log: {}", config.mail_log_path.display());

    // ── Collaborators ───────────────────────────────────────────────────
    let registrar: Arc<dyn SuppressionRegistrar> = match &config.suppression_url {
        Some(url) => {
            eprintln!("   Suppression: {}", url);
            Arc::new(HttpSuppressionRegistrar::new(
                url.clone(),
                config.suppression_token.clone(),
            ))
        }
        None => {
            tracing::warn!(
                "SUPPRESSION_API_URL not set; suppressions are kept in memory only"
            );
            eprintln!("   Suppression: in-memory");
            Arc::new(InMemoryRegistrar::new())
        }
    };
    let notifier = Arc::new(SlackNotifier::new(config.slack.clone()));
    let audit = Arc::new(FileAuditLog::new(config.mail_log_path.clone()));

    let handler = Arc::new(EventHandler::new(audit, notifier, registrar));

    // ── Server ──────────────────────────────────────────────────────────
    let app = event_routes(handler);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Event endpoint listening");
    eprintln!("   Events: http://0.0.0.0:{}/events\n", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
