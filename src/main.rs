use std::sync::Arc;

use scamtrap::api::{AppState, api_routes};
use scamtrap::callback::HttpCallbackSink;
use scamtrap::config::HoneypotConfig;
use scamtrap::engage::Orchestrator;
use scamtrap::reply::ReplyStrategy;
use scamtrap::session::store::{InMemorySessionStore, SessionStore, spawn_sweep_task};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = HoneypotConfig::from_env();

    eprintln!("🪤 Scamtrap v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/v1/message", config.port);
    eprintln!(
        "   Callback: {}",
        config.callback_url.as_deref().unwrap_or("(disabled)")
    );
    eprintln!(
        "   Caps: {} messages, {:?} max duration, {:?} idle timeout\n",
        config.message_cap, config.max_session_duration, config.session_idle_timeout,
    );

    let store: Arc<dyn SessionStore> = InMemorySessionStore::new();
    let sink = Arc::new(HttpCallbackSink::new(
        config.callback_url.clone(),
        config.callback_timeout,
    ));

    // Periodic idle sweep alongside live traffic
    let _sweep_handle = spawn_sweep_task(
        Arc::clone(&store),
        config.sweep_interval,
        config.session_idle_timeout,
    );

    let orchestrator = Arc::new(Orchestrator::new(
        config.clone(),
        Arc::clone(&store),
        ReplyStrategy::new(),
        sink,
    ));

    let state = AppState {
        orchestrator,
        api_key: config.api_key.clone(),
    };

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Honeypot API started");
    axum::serve(listener, api_routes(state)).await?;

    Ok(())
}
