//! Types and traits for recording training metrics.
//!
//! * [`Record`] - key-value pairs of [`RecordValue`]s
//! * [`RecordStorage`] - collects records and aggregates them
//! * [`Recorder`] and [`AggregateRecorder`] - sinks of records
//! * [`BufferedRecorder`] - keeps records in memory
//! * [`NullRecorder`] - discards everything
//!
//! ```rust
//! use balance_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("loss", RecordValue::Scalar(0.25));
//! record.insert("phase", RecordValue::String("training".into()));
//! assert_eq!(record.get_scalar("loss").unwrap(), 0.25);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
