use rust_decimal::Decimal;

use crate::models::{AccountDetail, MerchantSummary, PortfolioTotals, RepaymentSchedule};

/// Everything a single run hands to the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReport {
    /// Sorted by merchant id, then name, then status.
    pub summaries: Vec<MerchantSummary>,
    pub totals: PortfolioTotals,
    pub accounts: Vec<AccountDetail>,
    pub schedule: RepaymentSchedule,
    pub annual_interest_rate: Decimal,
    pub credit_limit: Decimal
}
