mod csv_source;
#[cfg(test)]
mod tests;

use crate::models::{SettlementError, SettlementRecord};

pub use csv_source::CsvRecordSource;

pub type RecordIter = Box<dyn Iterator<Item = Result<SettlementRecord, SettlementError>>>;

/// Supplies settlement rows in source order.
///
/// Implementations are opened on a blocking thread, so `open` may perform file I/O.
pub trait RecordSource: Send + 'static {
    fn open(self) -> Result<RecordIter, SettlementError>;
}

impl RecordSource for Vec<SettlementRecord> {
    fn open(self) -> Result<RecordIter, SettlementError> {
        Ok(Box::new(self.into_iter().map(Ok)))
    }
}
