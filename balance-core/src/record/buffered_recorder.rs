use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use anyhow::Result;

/// Buffers records in memory.
///
/// Records written with [`Recorder::write`] are kept as is. Records given to
/// [`AggregateRecorder::store`] are aggregated on flush and kept with an
/// additional `"opt_steps"` entry.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) -> Result<()> {
        if !self.storage.is_empty() {
            let mut record = self.storage.aggregate();
            record.insert("opt_steps", RecordValue::Scalar(step as f32));
            self.buf.push(record);
        }
        Ok(())
    }
}
