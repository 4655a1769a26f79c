//! Recorder writing aggregated scalars to a CSV file.
use anyhow::{Context, Result};
use balance_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::{fs::File, path::Path};

#[derive(Serialize)]
struct Row<'a> {
    datetime: String,
    step: i64,
    key: &'a str,
    value: f32,
}

/// Writes one row `datetime,step,key,value` per aggregated scalar on flush.
///
/// The timestamp is taken from the `datetime` entry of the aggregated record
/// if there is one, otherwise from the clock. Values that are not scalars are
/// skipped.
pub struct CsvRecorder {
    wtr: Writer<File>,
    storage: RecordStorage,
}

impl CsvRecorder {
    /// Creates the CSV file, truncating an existing one.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            wtr: Writer::from_path(path)?,
            storage: RecordStorage::new(),
        })
    }

    fn write_record(&mut self, step: i64, record: &Record) -> Result<()> {
        let datetime = match record.get("datetime") {
            Some(RecordValue::DateTime(t)) => t.to_rfc3339(),
            _ => Local::now().to_rfc3339(),
        };
        let mut scalars: Vec<(&str, f32)> = record
            .iter()
            .filter_map(|(key, value)| match value {
                RecordValue::Scalar(v) => Some((key.as_str(), *v)),
                _ => None,
            })
            .collect();
        scalars.sort_by(|a, b| a.0.cmp(b.0));

        for (key, value) in scalars {
            self.wtr.serialize(Row {
                datetime: datetime.clone(),
                step,
                key,
                value,
            })?;
        }
        self.wtr.flush()?;
        Ok(())
    }
}

impl AggregateRecorder for CsvRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) -> Result<()> {
        if self.storage.is_empty() {
            return Ok(());
        }
        let record = self.storage.aggregate();
        self.write_record(step, &record)
            .with_context(|| format!("Failed to write records at step {}", step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_csv_recorder() -> Result<()> {
        let dir = TempDir::new("csv_recorder")?;
        let path = dir.path().join("records.csv");
        let mut recorder = CsvRecorder::create(&path)?;

        recorder.store(Record::from_scalar("loss", 1.0));
        recorder.store(Record::from_scalar("loss", 3.0));
        recorder.flush(200)?;
        recorder.flush(300)?;
        recorder.store(Record::from_slice(&[
            ("eval_return", RecordValue::Scalar(20.0)),
            ("note", RecordValue::String("skipped".into())),
        ]));
        recorder.flush(400)?;

        let mut rdr = csv::Reader::from_path(&path)?;
        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        assert_eq!(headers, vec!["datetime", "step", "key", "value"]);

        let rows: Vec<(i64, String, f32)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[1].parse().unwrap(), r[2].to_string(), r[3].parse().unwrap())
            })
            .collect();
        assert_eq!(rows.len(), 5);
        assert!(rows.contains(&(200, "loss_mean".to_string(), 2.0)));
        assert!(rows.contains(&(200, "loss_max".to_string(), 3.0)));
        assert_eq!(rows[4], (400, "eval_return".to_string(), 20.0));
        Ok(())
    }
}
