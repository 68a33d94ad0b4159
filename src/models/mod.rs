mod errors;
mod record;
mod report;
mod schedule;
mod summary;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Deserialize;

pub use errors::SettlementError;
pub use record::SettlementRecord;
pub use report::SettlementReport;
pub use schedule::{RepaymentPeriod, RepaymentSchedule, ScheduleTotals};
pub use summary::{AccountDetail, MerchantSummary, PortfolioTotals};

/// Payout lifecycle of a settlement row.
///
/// Rows arrive `Ready`; executing the payout run moves them to `Requested`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
pub enum SettlementStatus {
    #[default]
    Ready,
    Requested
}

impl Display for SettlementStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SettlementStatus::Ready => formatter.write_str("Ready"),
            SettlementStatus::Requested => formatter.write_str("Requested")
        }
    }
}

impl FromStr for SettlementStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Ready" => Ok(SettlementStatus::Ready),
            "Requested" => Ok(SettlementStatus::Requested),
            _ => Err(format!("unknown settlement status [{value}]"))
        }
    }
}
