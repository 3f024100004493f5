use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::assets::AssetService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

/// Any origin, any method, any header.
fn build_cors() -> CorsLayer {
    CorsLayer::permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Build the router and its state from configuration.
pub fn build_app(cfg: &AppConfig) -> Result<(Router, AppState), StartupError> {
    let assets = Arc::new(AssetService::from_config(&cfg.storage)?);
    let state = AppState { assets };
    let app = routes::build_router(state.clone(), build_cors(), cfg.server.body_limit_bytes);
    Ok((app, state))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Public entry: prepare storage, bind, and run the HTTP server until `shutdown`.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if cfg.storage.backend == configs::StorageBackend::File {
        common::env::ensure_data_dir(&cfg.storage.data_file).await?;
    }

    let (app, state) = build_app(&cfg)?;
    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, collection = %state.assets.collection_key(), "asset store listening");
    println!("Server running at http://localhost:{}", addr.port());

    serve(listener, app, shutdown).await
}
