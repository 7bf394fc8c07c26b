use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use apx_core::{MetadataStore, SnapshotAssembler};
use apx_observe::init_logger;
use apx_prometheus::PrometheusSink;
use apx_store::PgMetadataStore;

mod cli;
mod config;
mod http;

use cli::Cli;
use config::ExporterConfig;
use http::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) config: any error is fatal before the listener is bound
    let (path, explicit) = cli.config_path();
    let mut cfg = if explicit || path.exists() {
        ExporterConfig::load(&path).with_context(|| format!("loading {}", path.display()))?
    } else {
        ExporterConfig::default()
    };
    cli.apply(&mut cfg);
    cfg.validate()?;

    if cli.check {
        println!("configuration ok: {}", path.display());
        return Ok(());
    }

    // 2) logger, before the runtime spawns threads so the local offset can be read
    init_logger(&cfg.logger)?;
    info!(
        config = %path.display(),
        rules = cfg.xcom_params.len(),
        "logger initialized"
    );

    // 3) runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?
        .block_on(serve(cfg))
}

async fn serve(cfg: ExporterConfig) -> anyhow::Result<()> {
    let store = PgMetadataStore::connect_lazy(&cfg.database_url, &cfg.pool_options())?;
    if let Err(e) = store.ping().await {
        warn!(error = %e, "metadata store not reachable yet, serving anyway");
    }

    let store_handle: Arc<dyn MetadataStore> = Arc::new(store.clone());
    let state = Arc::new(AppState::new(
        store_handle,
        SnapshotAssembler::new(cfg.xcom_params.clone(), cfg.snapshot_config()),
        Arc::new(PrometheusSink::new(cfg.namespace.clone())),
    ));

    let listener = TcpListener::bind(cfg.listen)
        .await
        .with_context(|| format!("binding {}", cfg.listen))?;
    info!(listen = %cfg.listen, namespace = %cfg.namespace, "exporter listening");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("http server")?;

    store.close().await;
    info!("exporter stopped");
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM.
async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
    token.cancel();
}
