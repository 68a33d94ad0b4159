use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use tempfile::tempdir;

fn run_report(input: &Path, html: &Path, extra_args: &[&str]) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_settlement-report");

    Ok(Command::new(binary_path)
        .arg(input)
        .arg("--html")
        .arg(html)
        .args(extra_args)
        .env_remove("SETTLEMENT_INTEREST_RATE")
        .env_remove("SETTLEMENT_CREDIT_LIMIT")
        .env_remove("SETTLEMENT_PERIODS")
        .output()?)
}

#[test]
fn test_cli_exports_summary_with_total_row() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let output = run_report(&Path::new("samples").join("fixed.csv"), &html_path, &[])?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines, vec![
        "merchant_id,merchant_name,status,receivables,merchant_payout,merchant_rr,partner_payout,partner_rr,merchant_rr_rate",
        "1,Alpha,Ready,300000,282000,12000,6000,3000,0.05",
        "2,Beta,Ready,300000,282000,12000,6000,-3000,0.03",
        "Total,,,600000,564000,24000,12000,0,",
    ]);

    let html = fs::read_to_string(&html_path)?;

    assert!(html.contains("<td>€600,000</td>"));
    assert!(html.contains("<tr><td>1</td><td>€10,000</td><td>€590,000</td><td>€3,442</td></tr>"));
    assert!(html.contains("<tr><td>60</td><td>€10,000</td><td>€0</td><td>€0</td></tr>"));

    Ok(())
}

#[test]
fn test_cli_processes_sample_with_every_row_well_formed() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let output = run_report(&Path::new("samples").join("merchant_data.csv"), &html_path, &[])?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines();

    assert!(lines.next().is_some_and(|header| header.starts_with("merchant_id,")));

    let rows: Vec<Vec<String>> = lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect();

    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|fields| fields.len() == 9));
    assert_eq!(rows[4][0], "Total");
    assert_eq!(rows[4][3], "600000");
    assert_eq!(rows[3][2], "Requested");
    assert_eq!(rows[3][7], "");

    Ok(())
}

#[test]
fn test_cli_applies_configuration_and_payout_execution() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let export_path = directory.path().join("summary.csv");
    let export_argument = export_path.to_string_lossy().to_string();

    let output = run_report(
        &Path::new("samples").join("legacy_columns.csv"),
        &html_path,
        &["--periods", "4", "--credit-limit", "8000", "--interest-rate", "0.12", "--execute", "--export", &export_argument]
    )?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let export = fs::read_to_string(&export_path)?;

    assert!(export.contains("7,Nordwind,Requested,4000,3680,200,120,0,0.05"));

    let html = fs::read_to_string(&html_path)?;

    assert!(html.contains("<tr><td>Credit Limit Ratio</td><td>50.00%</td></tr>"));
    assert!(html.contains("<tr><td>1</td><td>€1,000</td><td>€3,000</td><td>€30</td></tr>"));
    assert_eq!(html.matches("<tr><td>4</td>").count(), 1);

    Ok(())
}

#[test]
fn test_cli_aborts_on_malformed_record_without_writing_report() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let output = run_report(&Path::new("samples").join("malformed.csv"), &html_path, &[])?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!html_path.exists());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Malformed settlement record"));
    assert!(stderr.contains("line [3]"));
    assert!(stderr.contains("field [receivables_amount]"));

    Ok(())
}

#[test]
fn test_cli_rejects_out_of_range_period_count() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");

    for periods in ["0", "-5", "1201", "5000000000"] {
        let output = run_report(&Path::new("samples").join("fixed.csv"), &html_path, &["--periods", periods])?;

        assert!(!output.status.success());
        assert!(String::from_utf8(output.stderr)?.contains("period_count"));
        assert!(!html_path.exists());
    }

    Ok(())
}

#[test]
fn test_cli_aborts_on_overflowing_amounts_without_writing_report() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let input_path = directory.path().join("overflow.csv");

    fs::write(&input_path, "merchant_id,merchant_name,status,receivables_amount,merchant_payout_amount,partner_margin_amount,reserve_withheld_amount,reserve_rate\n\
                            1,Alpha,Ready,40000000000000000000000000000.5,0,0,0,0.05\n\
                            1,Alpha,Ready,40000000000000000000000000000.5,0,0,0,0.05\n")?;

    let output = run_report(&input_path, &html_path, &[])?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!html_path.exists());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Numeric overflow"));
    assert!(!stderr.contains("panicked"));

    Ok(())
}

#[test]
fn test_cli_reports_missing_data_source() -> Result<()> {
    let directory = tempdir()?;
    let html_path = directory.path().join("report.html");
    let output = run_report(&directory.path().join("absent.csv"), &html_path, &[])?;

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("could not be read"));

    Ok(())
}
