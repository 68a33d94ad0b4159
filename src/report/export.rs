use std::io::Write;

use csv::Writer;
use rust_decimal::Decimal;

use crate::models::SettlementReport;

const EXPORT_HEADER: [&str; 9] = [
    "merchant_id",
    "merchant_name",
    "status",
    "receivables",
    "merchant_payout",
    "merchant_rr",
    "partner_payout",
    "partner_rr",
    "merchant_rr_rate"
];

const TOTAL_LABEL: &str = "Total";

/// Writes the merchant payout summary as CSV: one row per merchant group, then a `Total` row.
///
/// Values are exact decimals. Unknown rates and partner RR are left blank, as are the
/// name, status and rate of the total row.
pub fn write_summary_export<W: Write>(writer: W, report: &SettlementReport) -> Result<(), csv::Error> {
    let mut output = Writer::from_writer(writer);

    output.write_record(EXPORT_HEADER)?;

    for summary in &report.summaries {
        output.write_record([
            summary.merchant_id.clone(),
            summary.merchant_name.clone(),
            summary.status.to_string(),
            exact(summary.receivables),
            exact(summary.merchant_payout),
            exact(summary.merchant_rr),
            exact(summary.partner_payout),
            summary.partner_rr.map(exact).unwrap_or_default(),
            summary.merchant_rr_rate.map(exact).unwrap_or_default()
        ])?;
    }

    let totals = &report.totals;

    output.write_record([
        TOTAL_LABEL.to_string(),
        String::new(),
        String::new(),
        exact(totals.receivables),
        exact(totals.merchant_payout),
        exact(totals.merchant_rr),
        exact(totals.partner_payout),
        exact(totals.partner_rr),
        String::new()
    ])?;

    output.flush()?;

    Ok(())
}

fn exact(value: Decimal) -> String {
    value.normalize().to_string()
}
