use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

use crate::models::SettlementStatus;
use crate::types::MerchantId;

const IDENTIFIER_COLUMNS: [&str; 2] = ["merchant_id", "Vertrieb_ID"];
const NAME_COLUMNS: [&str; 2] = ["merchant_name", "Vertrieb_Name"];
const STATUS_COLUMNS: [&str; 2] = ["status", "Status"];
const AMOUNT_COLUMNS: [[&str; 2]; 4] = [
    ["receivables_amount", "Barzahlungspreis"],
    ["merchant_payout_amount", "Broker_Payout"],
    ["partner_margin_amount", "Marge_CY"],
    ["reserve_withheld_amount", "Sicherheitseinbehalt"]
];
const RATE_COLUMNS: [&str; 2] = ["reserve_rate", "Sicherheitensatz"];

/// Represents a single row from the settlement data source.
///
/// Monetary fields are required; a row missing any of them is rejected at ingestion.
/// Amounts are parsed from the cell text, never through a float.
/// Aliases accept the column headers of the legacy spreadsheet export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettlementRecord {
    #[serde(alias = "Vertrieb_ID", deserialize_with = "deserialize_identifier")]
    pub merchant_id: MerchantId,
    #[serde(alias = "Vertrieb_Name")]
    pub merchant_name: String,
    /// Defaults to `Ready` when the column is absent or the cell is empty.
    #[serde(alias = "Status", default, deserialize_with = "deserialize_status")]
    pub status: SettlementStatus,
    /// Gross amount financed for the merchant.
    #[serde(alias = "Barzahlungspreis", deserialize_with = "deserialize_amount")]
    pub receivables_amount: Decimal,
    #[serde(alias = "Broker_Payout", deserialize_with = "deserialize_amount")]
    pub merchant_payout_amount: Decimal,
    #[serde(alias = "Marge_CY", deserialize_with = "deserialize_amount")]
    pub partner_margin_amount: Decimal,
    /// Rolling reserve withheld from the merchant payout.
    #[serde(alias = "Sicherheitseinbehalt", deserialize_with = "deserialize_amount")]
    pub reserve_withheld_amount: Decimal,
    /// Contractual reserve rate as a fraction; `None` when the source cell is empty.
    #[serde(alias = "Sicherheitensatz", default, deserialize_with = "deserialize_rate")]
    pub reserve_rate: Option<Decimal>
}

impl SettlementRecord {
    /// Moves a `Ready` row to `Requested`. Rows already requested are returned unchanged.
    pub fn request_payout(self) -> Self {
        match self.status {
            SettlementStatus::Ready => Self { status: SettlementStatus::Requested, ..self },
            SettlementStatus::Requested => self
        }
    }

    /// Names the first column of `row` that cannot be read into a record.
    ///
    /// Cells are checked in header order; a required column missing from the header row
    /// is reported by its canonical name.
    pub fn offending_column(headers: &StringRecord, row: &StringRecord) -> Option<String> {
        let invalid_cell = headers.iter()
            .enumerate()
            .find(|(index, header)| !is_valid_cell(header, row.get(*index).unwrap_or_default()))
            .map(|(_, header)| header.to_string());

        invalid_cell.or_else(|| missing_column(headers))
    }
}

fn is_valid_cell(header: &str, cell: &str) -> bool {
    if IDENTIFIER_COLUMNS.contains(&header) {
        return !cell.is_empty();
    }

    if STATUS_COLUMNS.contains(&header) {
        return cell.is_empty() || SettlementStatus::from_str(cell).is_ok();
    }

    if AMOUNT_COLUMNS.iter().any(|aliases| aliases.contains(&header)) {
        return Decimal::from_str(cell).is_ok();
    }

    if RATE_COLUMNS.contains(&header) {
        return cell.is_empty() || Decimal::from_str(cell).is_ok();
    }

    true
}

fn missing_column(headers: &StringRecord) -> Option<String> {
    let required = [IDENTIFIER_COLUMNS, NAME_COLUMNS].into_iter().chain(AMOUNT_COLUMNS);

    required
        .filter(|aliases| !headers.iter().any(|header| aliases.contains(&header)))
        .map(|[canonical, _]| canonical.to_string())
        .next()
}

fn deserialize_identifier<'de, D>(deserializer: D) -> Result<MerchantId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;

    if value.is_empty() {
        return Err(de::Error::custom("merchant id must not be empty"));
    }

    Ok(value)
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<SettlementStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SettlementStatus>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_decimal(&value).map_err(de::Error::custom)
}

fn deserialize_rate<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.is_empty() => parse_decimal(&value).map(Some).map_err(de::Error::custom),
        _ => Ok(None)
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value).map_err(|error| format!("invalid decimal [{value}]: {error}"))
}
