use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::ingest::{RecordIter, RecordSource};
use crate::models::{SettlementError, SettlementRecord};

/// Reads settlement rows from a CSV file with a header row.
pub struct CsvRecordSource {
    path: PathBuf
}

impl CsvRecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf()
        }
    }
}

impl RecordSource for CsvRecordSource {
    fn open(self) -> Result<RecordIter, SettlementError> {
        let file = File::open(&self.path)
            .map_err(|error| SettlementError::missing_data_source(&self.path, error))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = reader.headers()
            .map_err(|error| SettlementError::malformed_record(&self.path, &error, &Default::default(), None))?
            .clone();

        debug!("Opened settlement source [{}] with columns {:?}", self.path.display(), headers);

        let path = self.path;
        let records = reader.into_records()
            .map(move |result| {
                let row = result.map_err(|error| SettlementError::malformed_record(&path, &error, &headers, None))?;

                row.deserialize::<SettlementRecord>(Some(&headers))
                    .map_err(|error| SettlementError::malformed_record(&path, &error, &headers, Some(&row)))
            });

        Ok(Box::new(records))
    }
}
