//! Snapshot builder for orchestrator health metrics.
//!
//! One scrape runs every [`MetadataStore`] query concurrently, turns the rows into
//! [`MetricSample`]s and returns a single immutable [`MetricSnapshot`]. A failing query only
//! removes the metric families it feeds; the rest of the snapshot is still produced.
//!
//! ```rust,ignore
//! let assembler = SnapshotAssembler::new(rules, SnapshotConfig::default());
//! let snapshot = assembler.scrape(&store).await;
//! let exposition = sink.render(&snapshot)?;
//! ```

pub mod error;
pub use error::{SnapshotError, StoreError, StoreResult};

mod store;
pub use store::{DataSource, MemoryStore, MetadataStore};

mod snapshot;
pub use snapshot::{MetricFamily, MetricSample, MetricSnapshot, SnapshotBuilder, SourceFailure};

pub mod delay;
pub mod extract;

mod assemble;
pub use assemble::{SnapshotAssembler, SnapshotConfig};

mod sink;
pub use sink::{Exposition, MetricSink, SinkError, SinkHandle};
