//! Prometheus rendering of apx metric snapshots.
//!
//! This crate provides [`PrometheusSink`], an implementation of [`apx_core::MetricSink`] that
//! renders a [`apx_core::MetricSnapshot`] in the Prometheus text exposition format.
//!
//! ## Example
//! ```rust
//! use apx_core::{MetricSink, SnapshotBuilder};
//! use apx_prometheus::PrometheusSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = PrometheusSink::new("airflow");
//! let snapshot = SnapshotBuilder::new(time::OffsetDateTime::UNIX_EPOCH).build();
//! let exposition = sink.render(&snapshot)?;
//! assert!(exposition.content_type.starts_with("text/plain"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! Every family of [`apx_core::MetricFamily`] is exposed as a gauge named
//! `<namespace>_<family>`, e.g. `airflow_task_status{dag_id, task_id, owner, status}`.
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; `apx-exporterd` mounts it on an axum router.

mod sink;
pub use sink::{DEFAULT_NAMESPACE, PrometheusSink};

pub use prometheus::{Encoder, Registry, TextEncoder};
