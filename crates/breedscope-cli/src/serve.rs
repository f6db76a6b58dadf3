//! `breedscope serve`: load the catalog, store and model, then listen.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use breedscope_ai::OnnxClassifier;
use breedscope_core::LabelCatalog;
use breedscope_server::{AppState, router};
use breedscope_store::FeedbackStore;
use clap::Args;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// ONNX export of the breed classifier.
    #[arg(
        long,
        env = "BREEDSCOPE_MODEL",
        default_value = "models/dog_breed_classifier.onnx"
    )]
    pub model: PathBuf,

    /// Breed names, one per line, in model output order.
    #[arg(long, env = "BREEDSCOPE_LABELS", default_value = "breed_names.txt")]
    pub labels: PathBuf,

    /// DuckDB file holding submitted corrections.
    #[arg(long, env = "BREEDSCOPE_DB", default_value = "feedback.duckdb")]
    pub db: PathBuf,

    #[arg(long, env = "BREEDSCOPE_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = LabelCatalog::load(&args.labels).context("loading breed labels")?;

    let store = FeedbackStore::open_persistent(&args.db)
        .with_context(|| format!("opening feedback database {}", args.db.display()))?;
    store
        .init_schema()
        .context("initialising feedback schema")?;

    let classifier =
        OnnxClassifier::load(&args.model, catalog.len()).context("loading breed classifier")?;

    let app = router(AppState::new(catalog, classifier, store));

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
