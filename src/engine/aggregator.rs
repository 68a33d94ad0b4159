use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{MerchantSummary, SettlementError, SettlementRecord, SettlementStatus};
use crate::types::MerchantId;

type GroupKey = (MerchantId, String, SettlementStatus);

/// Running totals for one merchant group.
///
/// Monetary fields are summed; the reserve rate keeps a sum and a count of the
/// non-null values so the mean can be taken once the group is complete.
#[derive(Debug, Default)]
struct Accumulator {
    receivables: Decimal,
    merchant_payout: Decimal,
    partner_payout: Decimal,
    merchant_rr: Decimal,
    reserve_rate_sum: Decimal,
    reserve_rate_count: u32
}

impl Accumulator {
    /// Folds `record` in. On overflow the accumulator is left unchanged.
    fn add(&mut self, record: &SettlementRecord) -> Result<(), SettlementError> {
        let overflow = |quantity| SettlementError::overflow(quantity, &record.merchant_id);

        let receivables = self.receivables.checked_add(record.receivables_amount)
            .ok_or_else(|| overflow("receivables"))?;
        let merchant_payout = self.merchant_payout.checked_add(record.merchant_payout_amount)
            .ok_or_else(|| overflow("merchant_payout"))?;
        let partner_payout = self.partner_payout.checked_add(record.partner_margin_amount)
            .ok_or_else(|| overflow("partner_payout"))?;
        let merchant_rr = self.merchant_rr.checked_add(record.reserve_withheld_amount)
            .ok_or_else(|| overflow("merchant_rr"))?;

        if let Some(rate) = record.reserve_rate {
            self.reserve_rate_sum = self.reserve_rate_sum.checked_add(rate)
                .ok_or_else(|| overflow("merchant_rr_rate"))?;
            self.reserve_rate_count += 1;
        }

        self.receivables = receivables;
        self.merchant_payout = merchant_payout;
        self.partner_payout = partner_payout;
        self.merchant_rr = merchant_rr;

        Ok(())
    }

    fn mean_reserve_rate(&self) -> Option<Decimal> {
        if self.reserve_rate_count == 0 {
            return None;
        }

        Some(self.reserve_rate_sum / Decimal::from(self.reserve_rate_count))
    }
}

/// Groups settlement records by (merchant id, merchant name, status).
///
/// Records are folded in as they arrive; `finish` emits one summary per group,
/// ordered by merchant id, then name, then status.
#[derive(Debug, Default)]
pub struct MerchantAggregator {
    groups: BTreeMap<GroupKey, Accumulator>,
    record_count: usize
}

impl MerchantAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into its group.
    ///
    /// # Errors
    /// Returns `Overflow` if a running total leaves the decimal range.
    pub fn accept(&mut self, record: &SettlementRecord) -> Result<(), SettlementError> {
        let key = (record.merchant_id.clone(), record.merchant_name.clone(), record.status);

        self.groups.entry(key).or_default().add(record)?;
        self.record_count += 1;

        Ok(())
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn finish(self) -> Vec<MerchantSummary> {
        debug!("Aggregated {} records into {} merchant groups", self.record_count, self.groups.len());

        self.groups.into_iter()
            .map(|((merchant_id, merchant_name, status), accumulator)| MerchantSummary {
                merchant_id,
                merchant_name,
                status,
                receivables: accumulator.receivables,
                merchant_payout: accumulator.merchant_payout,
                partner_payout: accumulator.partner_payout,
                merchant_rr: accumulator.merchant_rr,
                merchant_rr_rate: accumulator.mean_reserve_rate(),
                partner_rr: None
            })
            .collect()
    }
}

/// Aggregates a complete record set. An empty input yields no summaries.
pub fn aggregate(records: &[SettlementRecord]) -> Result<Vec<MerchantSummary>, SettlementError> {
    let mut aggregator = MerchantAggregator::new();

    for record in records {
        aggregator.accept(record)?;
    }

    Ok(aggregator.finish())
}
