use rust_decimal::Decimal;

use crate::models::SettlementStatus;
use crate::types::MerchantId;

/// Merchant-level aggregate for one (merchant id, merchant name, status) group.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantSummary {
    pub merchant_id: MerchantId,
    pub merchant_name: String,
    pub status: SettlementStatus,
    /// Sum of `receivables_amount`.
    pub receivables: Decimal,
    /// Sum of `merchant_payout_amount`.
    pub merchant_payout: Decimal,
    /// Sum of `partner_margin_amount`.
    pub partner_payout: Decimal,
    /// Sum of `reserve_withheld_amount`.
    pub merchant_rr: Decimal,
    /// Mean of the non-null `reserve_rate` values; `None` if every contributing rate was null.
    pub merchant_rr_rate: Option<Decimal>,
    /// `receivables × merchant_rr_rate − merchant_rr`, filled in by the metrics stage.
    /// Stays `None` while the rate is unknown.
    pub partner_rr: Option<Decimal>
}

/// Portfolio-wide sums over every merchant summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioTotals {
    pub receivables: Decimal,
    pub merchant_payout: Decimal,
    pub merchant_rr: Decimal,
    pub partner_payout: Decimal,
    /// Sum over merchants whose partner RR is known.
    pub partner_rr: Decimal
}

/// Per-merchant sub-account view shown beneath the payout summary.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDetail {
    pub merchant_id: MerchantId,
    pub merchant_name: String,
    /// Receivables financed for the merchant.
    pub factoring: Decimal,
    /// Merchant payout.
    pub settlement: Decimal,
    pub rolling_reserve: Decimal,
    /// `rolling_reserve / factoring`, or zero when nothing was financed.
    pub rolling_reserve_rate: Decimal,
    pub partner_rr: Option<Decimal>,
    pub reserve_rate: Option<Decimal>,
    pub credit_limit: Decimal,
    /// `factoring / credit_limit`, or zero when the limit is zero.
    pub credit_limit_ratio: Decimal
}
