use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use configs::AppConfig;

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG, PORT and friends are visible to config and logging
    dotenv().ok();
    let config = AppConfig::load_and_validate();
    let format = config.as_ref().map(|c| c.logging.format.as_str()).unwrap_or("compact");
    common::utils::logging::init_logging_with_format(format);
    info!(service = "asset_store", event = "logger_init", "tracing subscriber initialized");

    let config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "asset_store", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "asset_store",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = config.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "asset_store", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "asset_store",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        data_file = %config.storage.data_file.display(),
        "asset store starting"
    );

    let shutdown = async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(service = "asset_store", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
        }
    };

    match rt.block_on(server::run(config, shutdown)) {
        Ok(()) => {
            info!(service = "asset_store", event = "stop", %service_id, pid, "asset store stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "asset_store", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
