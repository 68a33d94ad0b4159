use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AccountDetail, MerchantSummary, RepaymentSchedule, SettlementReport};
use crate::types::{Euro, Percent};

const TITLE: &str = "Atlas Settlement Tool";
const UNKNOWN_RATE: &str = "n/a";

const STYLESHEET: &str = r#"
        body { font-family: Arial; }
        table { font-family: Arial; border-collapse: collapse; width: 50%; }
        .summary-table { width: 80%; }
        th, td { padding: 8px; text-align: center; border: 1px solid #ddd; }
        tr { border-bottom: 1px solid #ddd; }
        tr:nth-child(even) { background-color: #f2f2f2; }
        tr:hover { background-color: #ddd; }
        tr.total { font-weight: bold; }
        .status-cell { width: 150px; }
        .header { display: flex; justify-content: flex-end; align-items: center; }
        .header img { max-height: 100px; }
"#;

/// Header logo, resolved once before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Logo {
    /// No logo was configured.
    Absent,
    Image(PathBuf),
    /// A logo was configured but the file does not exist.
    Missing(PathBuf)
}

impl Logo {
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            None => Logo::Absent,
            Some(path) if path.exists() => Logo::Image(path.to_path_buf()),
            Some(path) => {
                warn!("Logo file not found at: {}", path.display());
                Logo::Missing(path.to_path_buf())
            }
        }
    }
}

/// Browsable HTML rendering of a settlement run.
///
/// Sections: merchant payout summary, per-merchant sub-accounts and the portfolio repayment schedule.
pub struct HtmlReport<'a> {
    report: &'a SettlementReport,
    logo: &'a Logo
}

impl<'a> HtmlReport<'a> {
    pub fn new(report: &'a SettlementReport, logo: &'a Logo) -> Self {
        Self { report, logo }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_logo(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self.logo {
            Logo::Absent => Ok(()),
            Logo::Image(path) => writeln!(
                formatter,
                r#"<div class="header"><img src="{}" alt="Logo"></div>"#,
                escape(&path.display().to_string())
            ),
            Logo::Missing(_) => writeln!(formatter, r#"<div class="header"><p>Logo not found</p></div>"#)
        }
    }

    fn write_summary_table(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "<h2>Merchant Payout Summary</h2>")?;
        writeln!(formatter, r#"<table class="summary-table">"#)?;
        writeln!(
            formatter,
            "<tr><th>Merchant ID</th><th>Merchant Name</th><th>Status</th><th>Receivables</th><th>Merchant Payout</th>\
             <th>Merchant RR</th><th>Partner Payout</th><th>Partner RR</th><th>Merchant RR %</th></tr>"
        )?;

        for summary in &self.report.summaries {
            write_summary_row(formatter, summary)?;
        }

        let totals = &self.report.totals;

        writeln!(
            formatter,
            r#"<tr class="total"><td>Total</td><td></td><td></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td></td></tr>"#,
            Euro(totals.receivables),
            Euro(totals.merchant_payout),
            Euro(totals.merchant_rr),
            Euro(totals.partner_payout),
            Euro(totals.partner_rr)
        )?;

        writeln!(formatter, "</table>")
    }

    fn write_accounts(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "<h2>Merchant SubAccounts</h2>")?;
        writeln!(formatter, "<p>Credit limit per merchant: {}</p>", Euro(self.report.credit_limit))?;

        for account in &self.report.accounts {
            write_account(formatter, account)?;
        }

        Ok(())
    }

    fn write_schedule(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let schedule: &RepaymentSchedule = &self.report.schedule;

        writeln!(formatter, "<h2>Portfolio Repayment Schedule</h2>")?;
        writeln!(
            formatter,
            "<p>Straight-line over {} periods at {} annual interest, charged on the balance remaining after each period.</p>",
            schedule.periods.len(),
            Percent::precise(self.report.annual_interest_rate)
        )?;

        if !schedule.totals.rounding_remainder.is_zero() {
            writeln!(
                formatter,
                "<p>Principal rounding remainder: {}</p>",
                schedule.totals.rounding_remainder.normalize()
            )?;
        }
        writeln!(formatter, "<table>")?;
        writeln!(formatter, "<tr><th>Period</th><th>Principal</th><th>Outstanding</th><th>Expected Interest</th></tr>")?;

        for period in &schedule.periods {
            writeln!(
                formatter,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                period.period_index,
                Euro(period.principal),
                Euro(period.outstanding_balance),
                Euro(period.expected_interest)
            )?;
        }

        writeln!(
            formatter,
            r#"<tr class="total"><td>Total</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            Euro(schedule.totals.principal),
            Euro(schedule.totals.final_outstanding),
            Euro(schedule.totals.expected_interest)
        )?;

        writeln!(formatter, "</table>")
    }
}

impl Display for HtmlReport<'_> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "<!DOCTYPE html>")?;
        writeln!(formatter, "<html>")?;
        writeln!(formatter, "<head>")?;
        writeln!(formatter, r#"<meta charset="utf-8">"#)?;
        writeln!(formatter, "<title>{TITLE}</title>")?;
        writeln!(formatter, "<style>{STYLESHEET}</style>")?;
        writeln!(formatter, "</head>")?;
        writeln!(formatter, "<body>")?;

        self.write_logo(formatter)?;
        writeln!(formatter, "<h1>{TITLE}</h1>")?;
        self.write_summary_table(formatter)?;
        self.write_accounts(formatter)?;
        self.write_schedule(formatter)?;

        writeln!(formatter, "</body>")?;
        writeln!(formatter, "</html>")
    }
}

fn write_summary_row(formatter: &mut Formatter<'_>, summary: &MerchantSummary) -> fmt::Result {
    writeln!(
        formatter,
        r##"<tr><td><a href="#merchant-{id}">{id}</a></td><td>{}</td><td class="status-cell">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"##,
        escape(&summary.merchant_name),
        summary.status,
        Euro(summary.receivables),
        Euro(summary.merchant_payout),
        Euro(summary.merchant_rr),
        Euro(summary.partner_payout),
        optional_euro(summary.partner_rr),
        optional_percent(summary.merchant_rr_rate),
        id = escape(&summary.merchant_id)
    )
}

fn write_account(formatter: &mut Formatter<'_>, account: &AccountDetail) -> fmt::Result {
    writeln!(
        formatter,
        r#"<a id="merchant-{id}"></a><h2>Merchant: {} (ID: {id})</h2>"#,
        escape(&account.merchant_name),
        id = escape(&account.merchant_id)
    )?;
    writeln!(formatter, "<table>")?;
    writeln!(formatter, "<tr><th>Subaccount</th><th>Amount</th></tr>")?;

    let rows = [
        ("Factoring", Euro(account.factoring).to_string()),
        ("Settlement", Euro(account.settlement).to_string()),
        ("Rolling Reserve", Euro(account.rolling_reserve).to_string()),
        ("Rolling Reserve Rate", Percent::precise(account.rolling_reserve_rate).to_string()),
        ("Partner RR", optional_euro(account.partner_rr)),
        ("Merchant RR %", optional_percent(account.reserve_rate)),
        ("Credit Limit", Euro(account.credit_limit).to_string()),
        ("Credit Limit Ratio", Percent::precise(account.credit_limit_ratio).to_string())
    ];

    for (label, amount) in rows {
        writeln!(formatter, "<tr><td>{label}</td><td>{amount}</td></tr>")?;
    }

    writeln!(formatter, "</table><br>")
}

fn optional_euro(value: Option<Decimal>) -> String {
    value.map(|amount| Euro(amount).to_string())
        .unwrap_or_else(|| UNKNOWN_RATE.to_string())
}

fn optional_percent(value: Option<Decimal>) -> String {
    value.map(|rate| Percent::whole(rate).to_string())
        .unwrap_or_else(|| UNKNOWN_RATE.to_string())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character)
        }
    }

    escaped
}
