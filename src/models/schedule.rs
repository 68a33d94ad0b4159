use rust_decimal::Decimal;

/// One row of a straight-line repayment schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RepaymentPeriod {
    /// 1-based period number.
    pub period_index: u32,
    pub principal: Decimal,
    /// Balance left after this period's principal is repaid.
    pub outstanding_balance: Decimal,
    /// Monthly interest on the end-of-period balance.
    pub expected_interest: Decimal
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleTotals {
    /// Sum of principal over all periods.
    pub principal: Decimal,
    /// Outstanding balance after the final period.
    pub final_outstanding: Decimal,
    /// Total projected interest income.
    pub expected_interest: Decimal,
    /// `total_receivables − principal total`.
    ///
    /// Zero when the receivables divide evenly by the period count. Otherwise it holds the
    /// residue of dividing at 28 significant digits.
    pub rounding_remainder: Decimal
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepaymentSchedule {
    pub periods: Vec<RepaymentPeriod>,
    pub totals: ScheduleTotals
}
