use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::checked_period_count;
use crate::models::{RepaymentPeriod, RepaymentSchedule, ScheduleTotals, SettlementError};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Projects a straight-line repayment of `total_receivables` over `periods` months.
///
/// Principal is constant; the outstanding balance falls by one principal each period and
/// interest is charged monthly on the balance left at the end of the period, so the final
/// period carries no interest.
///
/// # Errors
/// Returns `InvalidConfiguration` if `periods` is out of range or the rate is negative, and
/// `Overflow` if an interest amount or a schedule total leaves the decimal range.
/// Negative receivables are projected as given.
pub fn project(total_receivables: Decimal, periods: i64, annual_interest_rate: Decimal) -> Result<RepaymentSchedule, SettlementError> {
    let period_count = checked_period_count(periods)?;

    if annual_interest_rate.is_sign_negative() && !annual_interest_rate.is_zero() {
        return Err(SettlementError::invalid_configuration(
            "annual_interest_rate",
            format!("must not be negative, got {annual_interest_rate}")
        ));
    }

    if total_receivables.is_sign_negative() && !total_receivables.is_zero() {
        warn!("Projecting repayment for negative portfolio receivables {total_receivables}");
    }

    let principal = total_receivables / Decimal::from(period_count);

    let periods = (1..=period_count)
        .map(|period_index| project_period(period_index, principal, total_receivables, annual_interest_rate))
        .collect::<Result<Vec<_>, _>>()?;

    let totals = schedule_totals(&periods, total_receivables)?;

    debug!(
        "Projected {} periods: principal {} per period, interest {}, remainder {}",
        period_count, principal, totals.expected_interest, totals.rounding_remainder
    );

    Ok(RepaymentSchedule { periods, totals })
}

fn project_period(period_index: u32, principal: Decimal, total_receivables: Decimal, annual_interest_rate: Decimal) -> Result<RepaymentPeriod, SettlementError> {
    let overflow = |quantity| SettlementError::overflow(quantity, format!("period {period_index}"));

    let outstanding_balance = principal.checked_mul(Decimal::from(period_index))
        .and_then(|repaid| total_receivables.checked_sub(repaid))
        .ok_or_else(|| overflow("outstanding_balance"))?;

    let expected_interest = outstanding_balance.checked_mul(annual_interest_rate)
        .and_then(|annual| annual.checked_div(MONTHS_PER_YEAR))
        .ok_or_else(|| overflow("expected_interest"))?;

    Ok(RepaymentPeriod {
        period_index,
        principal,
        outstanding_balance,
        expected_interest
    })
}

fn schedule_totals(periods: &[RepaymentPeriod], total_receivables: Decimal) -> Result<ScheduleTotals, SettlementError> {
    let overflow = |quantity| SettlementError::overflow(quantity, "repayment schedule");

    let principal = periods.iter()
        .try_fold(Decimal::ZERO, |sum, period| sum.checked_add(period.principal))
        .ok_or_else(|| overflow("principal"))?;
    let expected_interest = periods.iter()
        .try_fold(Decimal::ZERO, |sum, period| sum.checked_add(period.expected_interest))
        .ok_or_else(|| overflow("expected_interest"))?;
    let final_outstanding = periods.last()
        .map(|period| period.outstanding_balance)
        .unwrap_or(total_receivables);
    let rounding_remainder = total_receivables.checked_sub(principal)
        .ok_or_else(|| overflow("rounding_remainder"))?;

    Ok(ScheduleTotals {
        principal,
        final_outstanding,
        expected_interest,
        rounding_remainder
    })
}
