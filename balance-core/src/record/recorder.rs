use super::Record;
use anyhow::Result;

/// Writes records to an output destination.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}

/// Stores records and writes their aggregation on flush.
///
/// The trainer stores one record per training step and flushes every
/// logging interval.
pub trait AggregateRecorder {
    /// Stores a record.
    fn store(&mut self, record: Record);

    /// Aggregates the stored records and writes the result tagged with `step`.
    ///
    /// A failed write is returned to the caller, which stops training.
    fn flush(&mut self, step: i64) -> Result<()>;
}
