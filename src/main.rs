use std::sync::Arc;

use coze_relay::{routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let state = Arc::new(AppState::new());
    let app = routes::create_router().with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!("coze relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
