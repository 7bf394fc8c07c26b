use std::{sync::Arc, time::Instant};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, error};

use apx_core::{MetadataStore, SinkError, SinkHandle, SnapshotAssembler};

/// Everything a scrape needs; immutable after startup.
pub struct AppState {
    store: Arc<dyn MetadataStore>,
    assembler: SnapshotAssembler,
    sink: SinkHandle,
}

impl AppState {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        assembler: SnapshotAssembler,
        sink: SinkHandle,
    ) -> Self {
        Self {
            store,
            assembler,
            sink,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the exporter router.
///
/// Routes:
/// - GET /metrics - current snapshot in the sink's format
/// - GET /admin/metrics/ - same, at the orchestrator plugin's historical path
/// - GET /healthz - liveness
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/admin/metrics/", get(metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Rendering failure; the only non-200 outcome of a scrape.
#[derive(Debug)]
pub struct RenderError(SinkError);

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "failed to render snapshot");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to render metrics: {}", self.0),
        )
            .into_response()
    }
}

/// GET /metrics
async fn metrics(State(state): State<SharedState>) -> Result<Response, RenderError> {
    let started = Instant::now();
    let snapshot = state.assembler.scrape(state.store.as_ref()).await;
    let exposition = state.sink.render(&snapshot).map_err(RenderError)?;

    debug!(
        samples = snapshot.len(),
        failures = snapshot.failures().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scrape served"
    );
    Ok((
        [(header::CONTENT_TYPE, exposition.content_type)],
        exposition.body,
    )
        .into_response())
}

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}
