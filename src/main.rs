use anyhow::Result;
use tokio::sync::broadcast;
use tracing::info;

use tanggap::analysis::Analyzer;
use tanggap::complaint::ComplaintEvent;
use tanggap::config::AppConfig;
use tanggap::notify::WhatsAppNotifier;
use tanggap::storage::ComplaintStore;
use tanggap::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tanggap=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = AppConfig::load()?;

    let (events_tx, _) = broadcast::channel::<ComplaintEvent>(256);

    let store = ComplaintStore::open(&config.storage, events_tx).await?;
    let analyzer = Analyzer::from_config(&config.gemini)?;

    // Subscribe before serving so no intake is missed
    let notifier = WhatsAppNotifier::new(&config.whatsapp)?;
    let notifier_rx = store.subscribe();
    let notifier_handle = tokio::spawn(async move {
        if let Err(e) = notifier.run(notifier_rx).await {
            tracing::error!("WhatsApp notifier error: {:#}", e);
        }
    });

    let app_state = web::state::AppState::new(store, analyzer);
    let router = web::create_router(app_state, config.web.static_dir.as_deref());
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let web_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Web server error: {:#}", e);
        }
    });

    tokio::select! {
        _ = notifier_handle => info!("Notifier task ended"),
        _ = web_handle => info!("Web server ended"),
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
