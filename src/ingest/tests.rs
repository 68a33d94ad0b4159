use super::{CsvRecordSource, RecordSource};

use std::io::Write;

use anyhow::{anyhow, Result};
use tempfile::NamedTempFile;

use crate::models::{SettlementError, SettlementStatus};

const HEADER: &str = "merchant_id,merchant_name,status,receivables_amount,merchant_payout_amount,partner_margin_amount,reserve_withheld_amount,reserve_rate";

fn create_temporary_csv(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{HEADER}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    Ok(file)
}

#[test]
fn test_csv_source_yields_records_in_file_order() -> Result<()> {
    let file = create_temporary_csv(&[
        "2,Beta,Ready,200,180,10,10,0.05",
        "1,Alpha,,100,90,5,5,0.05",
    ])?;

    let records = CsvRecordSource::new(file.path()).open()?
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].merchant_id, "2");
    assert_eq!(records[1].merchant_id, "1");
    assert_eq!(records[1].status, SettlementStatus::Ready);

    Ok(())
}

#[test]
fn test_csv_source_reports_missing_file() {
    let result = CsvRecordSource::new("does/not/exist.csv").open();

    assert!(matches!(result, Err(SettlementError::MissingDataSource { .. })));
}

#[test]
fn test_csv_source_reports_malformed_row_with_position() -> Result<()> {
    let file = create_temporary_csv(&[
        "1,Alpha,Ready,100,90,5,5,0.05",
        "2,Beta,Ready,200,180,10",
    ])?;

    let error = CsvRecordSource::new(file.path()).open()?
        .find_map(|result| result.err())
        .ok_or_else(|| anyhow!("Expected the short row to be rejected"))?;

    match error {
        SettlementError::MalformedRecord { line, field, .. } => {
            assert_eq!(line, 3);
            assert_eq!(field, "reserve_withheld_amount");
        }
        other => return Err(anyhow!("Unexpected error variant: {other}"))
    }

    Ok(())
}

#[test]
fn test_csv_source_names_unparseable_amount_column() -> Result<()> {
    let file = create_temporary_csv(&[
        "1,Alpha,Ready,100,90,5,5,0.05",
        "2,Beta,Ready,,180,10,10,0.05",
    ])?;

    let error = CsvRecordSource::new(file.path()).open()?
        .find_map(|result| result.err())
        .ok_or_else(|| anyhow!("Expected the empty amount to be rejected"))?;

    match &error {
        SettlementError::MalformedRecord { line, field, .. } => {
            assert_eq!(*line, 3);
            assert_eq!(field, "receivables_amount");
        }
        other => return Err(anyhow!("Unexpected error variant: {other}"))
    }

    assert!(error.to_string().contains("field [receivables_amount]"));

    Ok(())
}

#[test]
fn test_in_memory_source_passes_records_through() -> Result<()> {
    let source: Vec<crate::models::SettlementRecord> = Vec::new();

    assert_eq!(source.open()?.count(), 0);

    Ok(())
}
