//! Logging setup shared by apx binaries.
//!
//! ```rust
//! use apx_observe::{LoggerConfig, init_logger};
//!
//! let config = LoggerConfig::default();
//! init_logger(&config).expect("logger must initialize once");
//! tracing::info!("logger ready");
//! ```

mod logger;
pub use logger::*;
