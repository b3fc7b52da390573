mod apidoc;
mod config;
mod handlers;
mod models;
mod routes;
mod services;
mod utils;

use axum::{Router, routing::post};
use config::Config;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared, read-only state. Per-request inputs never live here.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub http: reqwest::Client,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/relay", post(routes::relay::relay))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", apidoc::ApiDoc::openapi()))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env()?;
    let http = reqwest::Client::new();
    let addr = cfg.bind_addr();

    let state = AppState { cfg, http };

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Gemini relay listening on http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
