pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    proxy::{RetryPolicy, SentimentProxy},
    upstream::HuggingFaceClient,
};
use axum::{Router, middleware, routing::post};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::AppState;

/// Builds the router serving the analyze endpoint at `path`.
pub fn router(proxy: SentimentProxy, path: &str) -> Router {
    let app_state = AppState { proxy };

    Router::new()
        .route(
            path,
            post(handlers::analyze)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(middleware::map_response(handlers::cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<()> {
    let client = HuggingFaceClient::new(config.upstream.clone())?;
    info!("Forwarding to upstream model at {}", client.url());

    let policy = RetryPolicy::from(&config.retry);
    let proxy = SentimentProxy::new(Arc::new(client), policy)?;

    let app = router(proxy, &config.server.path);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (endpoint {}, {} attempts, {} ms delay)",
        addr,
        config.server.path,
        policy.max_retries,
        policy.retry_delay.as_millis()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
