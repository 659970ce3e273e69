use std::net::SocketAddr;
use std::sync::Arc;

use crate::interface_adapters::clients::BackendClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let base_url =
        std::env::var("BACKEND_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000/api".into());
    tracing::debug!(base_url = %base_url, "backend client configured.");
    let backend = Arc::new(BackendClient::new(base_url));

    let state = AppState {
        auth: backend.clone(),
        desk: backend.clone(),
        visitors: backend.clone(),
        visits: backend.clone(),
        admin: backend,
    };

    // Start the web server with the HTTP routes wired up.
    let app = routes::app(state);

    let addr = std::env::var("LISTEN_ADDR")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    tracing::info!(%addr, "listening");

    // Bind TCP listener with error handling.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };

    // Serve app and report errors rather than panicking.
    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server error");
    }
}
