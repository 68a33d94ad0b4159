use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error, info};

use crate::config::SettlementConfig;
use crate::engine::aggregator::MerchantAggregator;
use crate::engine::{amortization, metrics};
use crate::ingest::RecordSource;
use crate::models::{SettlementError, SettlementRecord, SettlementReport};

type RecordResult = Result<SettlementRecord, SettlementError>;

/// Batch pipeline: ingestion, aggregation, derived metrics and the repayment projection.
pub struct SettlementEngine {
    config: SettlementConfig,
    backpressure: usize,
    execute_payouts: bool
}

impl SettlementEngine {
    /// Creates an engine for a validated configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` before any data is read if the configuration is unusable.
    pub fn new(config: SettlementConfig) -> Result<Self, SettlementError> {
        config.validate()?;

        Ok(Self {
            config,
            backpressure: 256,
            execute_payouts: false
        })
    }

    /// Requests payout for every `Ready` row before it is grouped.
    pub fn with_payout_execution(mut self, execute_payouts: bool) -> Self {
        self.execute_payouts = execute_payouts;
        self
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Runs the full pipeline over `source`.
    ///
    /// The first malformed record or numeric overflow aborts the run; no partial report is produced.
    pub async fn run<S: RecordSource>(&self, source: S) -> anyhow::Result<SettlementReport> {
        let (sender, receiver) = mpsc::channel::<RecordResult>(self.backpressure);
        let reader_handle = self.spawn_record_reader(source, sender);
        let aggregation_result = self.aggregate_records(receiver).await;

        if let Err(error) = reader_handle.await {
            error!("Settlement record reader terminated abnormally: {error}");
            return Err(anyhow!("Settlement record reader terminated abnormally: {error}"));
        }

        let aggregator = aggregation_result?;
        info!("Ingested {} settlement records", aggregator.record_count());

        let derived = metrics::derive(aggregator.finish(), self.config.credit_limit)?;
        let schedule = amortization::project(
            derived.totals.receivables,
            self.config.period_count,
            self.config.annual_interest_rate
        )?;

        Ok(SettlementReport {
            summaries: derived.summaries,
            totals: derived.totals,
            accounts: derived.accounts,
            schedule,
            annual_interest_rate: self.config.annual_interest_rate,
            credit_limit: self.config.credit_limit
        })
    }

    fn spawn_record_reader<S: RecordSource>(&self, source: S, sender: mpsc::Sender<RecordResult>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let records = match source.open() {
                Ok(records) => records,
                Err(error) => {
                    let _ = sender.blocking_send(Err(error));
                    return;
                }
            };

            for result in records {
                let is_malformed = result.is_err();

                if sender.blocking_send(result).is_err() || is_malformed {
                    break;
                }
            }
        })
    }

    async fn aggregate_records(&self, mut receiver: mpsc::Receiver<RecordResult>) -> Result<MerchantAggregator, SettlementError> {
        let mut aggregator = MerchantAggregator::new();

        while let Some(result) = receiver.recv().await {
            let mut record = result?;

            if self.execute_payouts {
                record = record.request_payout();
                debug!("Payout requested for merchant [{}]", record.merchant_id);
            }

            aggregator.accept(&record)?;
        }

        Ok(aggregator)
    }
}
