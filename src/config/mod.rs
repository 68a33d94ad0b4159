
use rust_decimal::Decimal;

use crate::models::SettlementError;

pub const DEFAULT_ANNUAL_INTEREST_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);
pub const DEFAULT_CREDIT_LIMIT: Decimal = Decimal::from_parts(250_000, 0, 0, false, 0);
pub const DEFAULT_PERIOD_COUNT: i64 = 60;
/// Longest repayment projection accepted, in months.
pub const MAX_PERIOD_COUNT: i64 = 1200;

/// Business parameters for a settlement run.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementConfig {
    /// Annual rate used for projected interest, as a fraction.
    pub annual_interest_rate: Decimal,
    /// Approved credit ceiling per merchant.
    pub credit_limit: Decimal,
    /// Number of monthly periods in the repayment projection.
    pub period_count: i64
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            annual_interest_rate: DEFAULT_ANNUAL_INTEREST_RATE,
            credit_limit: DEFAULT_CREDIT_LIMIT,
            period_count: DEFAULT_PERIOD_COUNT
        }
    }
}

impl SettlementConfig {
    /// Rejects parameters no computation can be run with.
    ///
    /// A zero credit limit is accepted; the ratio against it is reported as zero.
    pub fn validate(&self) -> Result<(), SettlementError> {
        checked_period_count(self.period_count)?;

        if self.annual_interest_rate.is_sign_negative() && !self.annual_interest_rate.is_zero() {
            return Err(SettlementError::invalid_configuration(
                "annual_interest_rate",
                format!("must not be negative, got {}", self.annual_interest_rate)
            ));
        }

        if self.credit_limit.is_sign_negative() && !self.credit_limit.is_zero() {
            return Err(SettlementError::invalid_configuration(
                "credit_limit",
                format!("must not be negative, got {}", self.credit_limit)
            ));
        }

        Ok(())
    }
}

/// Narrows a configured period count to the range a projection can be built for.
///
/// # Errors
/// Returns `InvalidConfiguration` unless `1 <= periods <= MAX_PERIOD_COUNT`.
pub fn checked_period_count(periods: i64) -> Result<u32, SettlementError> {
    if !(1..=MAX_PERIOD_COUNT).contains(&periods) {
        return Err(SettlementError::invalid_configuration(
            "period_count",
            format!("must be between 1 and {MAX_PERIOD_COUNT}, got {periods}")
        ));
    }

    u32::try_from(periods)
        .map_err(|_| SettlementError::invalid_configuration("period_count", format!("out of range, got {periods}")))
}
