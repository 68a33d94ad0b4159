use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AccountDetail, MerchantSummary, PortfolioTotals, SettlementError};

/// Output of the derived-metrics stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub summaries: Vec<MerchantSummary>,
    pub totals: PortfolioTotals,
    pub accounts: Vec<AccountDetail>
}

/// Partner share of the rolling reserve: `receivables × rate − merchant_rr`. Not clamped.
///
/// `None` if the result leaves the decimal range.
pub fn partner_rolling_reserve(receivables: Decimal, merchant_rr_rate: Decimal, merchant_rr: Decimal) -> Option<Decimal> {
    receivables.checked_mul(merchant_rr_rate)?.checked_sub(merchant_rr)
}

/// `numerator / denominator`, or zero when the denominator is zero.
///
/// `None` if the quotient leaves the decimal range.
pub fn guarded_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return Some(Decimal::ZERO);
    }

    numerator.checked_div(denominator)
}

/// Fills in partner RR for every summary, sums the portfolio, and builds the sub-account view.
///
/// # Errors
/// Returns `Overflow` if any derived amount leaves the decimal range.
pub fn derive(summaries: Vec<MerchantSummary>, credit_limit: Decimal) -> Result<DerivedMetrics, SettlementError> {
    let summaries = summaries.into_iter()
        .map(with_partner_rolling_reserve)
        .collect::<Result<Vec<_>, _>>()?;

    let totals = portfolio_totals(&summaries)?;

    let accounts = summaries.iter()
        .map(|summary| account_detail(summary, credit_limit))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DerivedMetrics {
        summaries,
        totals,
        accounts
    })
}

fn with_partner_rolling_reserve(summary: MerchantSummary) -> Result<MerchantSummary, SettlementError> {
    let partner_rr = match summary.merchant_rr_rate {
        Some(rate) => Some(
            partner_rolling_reserve(summary.receivables, rate, summary.merchant_rr)
                .ok_or_else(|| SettlementError::overflow("partner_rr", &summary.merchant_id))?
        ),
        None => None
    };

    Ok(MerchantSummary { partner_rr, ..summary })
}

fn portfolio_totals(summaries: &[MerchantSummary]) -> Result<PortfolioTotals, SettlementError> {
    let mut totals = PortfolioTotals::default();
    let overflow = |quantity| SettlementError::overflow(quantity, "portfolio");

    for summary in summaries {
        totals.receivables = totals.receivables.checked_add(summary.receivables)
            .ok_or_else(|| overflow("receivables"))?;
        totals.merchant_payout = totals.merchant_payout.checked_add(summary.merchant_payout)
            .ok_or_else(|| overflow("merchant_payout"))?;
        totals.merchant_rr = totals.merchant_rr.checked_add(summary.merchant_rr)
            .ok_or_else(|| overflow("merchant_rr"))?;
        totals.partner_payout = totals.partner_payout.checked_add(summary.partner_payout)
            .ok_or_else(|| overflow("partner_payout"))?;

        match summary.partner_rr {
            Some(partner_rr) => {
                totals.partner_rr = totals.partner_rr.checked_add(partner_rr)
                    .ok_or_else(|| overflow("partner_rr"))?;
            }
            None => warn!(
                "Merchant [{}] ({}) has no reserve rate; partner RR is excluded from the portfolio total",
                summary.merchant_id, summary.status
            )
        }
    }

    Ok(totals)
}

fn account_detail(summary: &MerchantSummary, credit_limit: Decimal) -> Result<AccountDetail, SettlementError> {
    let overflow = |quantity| SettlementError::overflow(quantity, &summary.merchant_id);

    Ok(AccountDetail {
        merchant_id: summary.merchant_id.clone(),
        merchant_name: summary.merchant_name.clone(),
        factoring: summary.receivables,
        settlement: summary.merchant_payout,
        rolling_reserve: summary.merchant_rr,
        rolling_reserve_rate: guarded_ratio(summary.merchant_rr, summary.receivables)
            .ok_or_else(|| overflow("rolling_reserve_rate"))?,
        partner_rr: summary.partner_rr,
        reserve_rate: summary.merchant_rr_rate,
        credit_limit,
        credit_limit_ratio: guarded_ratio(summary.receivables, credit_limit)
            .ok_or_else(|| overflow("credit_limit_ratio"))?
    })
}
