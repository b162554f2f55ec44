mod auth;
mod config;
mod error;
mod guard;
mod render;
mod routes;
mod services;
mod state;
mod theme;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "domus_web=debug,tower_http=info".into()),
        )
        .init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let state = state::AppState::new(&config);
    let app = routes::app(state, &config.static_dir);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, auth_provider = ?config.auth_provider, dev_auth_bypass = config.dev_auth_bypass, "domus-web listening");
    axum::serve(listener, app).await.expect("server failed");
}
