//! PostgreSQL metadata store.
//!
//! [`PgMetadataStore`] implements [`apx_core::MetadataStore`] against the orchestrator's
//! metadata database. Each operation is a single `SELECT` on a pooled connection; rows are
//! converted into `apx_model` records and handed to the snapshot assembler uninterpreted.
//!
//! ```rust,no_run
//! use apx_core::MetadataStore;
//! use apx_store::{PgMetadataStore, PoolOptions};
//!
//! # async fn example() -> Result<(), apx_core::StoreError> {
//! let store = PgMetadataStore::connect_lazy(
//!     "postgres://airflow@localhost/airflow",
//!     &PoolOptions::default(),
//! )?;
//! let runs = store.dag_runs().await?;
//! println!("{} dag runs", runs.len());
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::store_error;

mod payload;
pub use payload::decode_payload;

mod queries;

mod rows;

mod store;
pub use store::{PgMetadataStore, PoolOptions};
