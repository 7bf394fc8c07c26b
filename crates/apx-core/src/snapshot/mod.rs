pub(crate) mod family;
pub use family::MetricFamily;

mod sample;
pub use sample::MetricSample;

mod collection;
pub use collection::{MetricSnapshot, SnapshotBuilder, SourceFailure};
