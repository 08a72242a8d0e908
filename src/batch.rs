//! Sequential batch over many accounts
//!
//! Draws a random amount per account, hands it to the orchestrator, and
//! sleeps a random delay before the next account. Failures never stop the
//! batch.

use std::fmt;
use std::time::Duration;

use eyre::{eyre, Result};
use rand::Rng;
use tracing::info;

use crate::orchestrator::Orchestrator;
use crate::redact::Redacted;
use crate::rpc::EvmRpc;
use crate::types::{AccountRequest, TransactionOutcome};

/// Decimal places kept when drawing a per-account amount
const AMOUNT_DECIMALS: usize = 6;

/// Parameters shared by every account in a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchParams {
    pub network: String,
    /// Inclusive range of the per-account amount, native units
    pub amount_min: f64,
    pub amount_max: f64,
    pub slippage: f64,
    /// Inclusive range of the pause between accounts, seconds
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
}

impl BatchParams {
    pub fn validate(&self) -> Result<()> {
        if !self.amount_min.is_finite() || !self.amount_max.is_finite() || self.amount_min <= 0.0
        {
            return Err(eyre!(
                "Amount range must be positive, got {}..={}",
                self.amount_min,
                self.amount_max
            ));
        }
        if self.amount_min > self.amount_max {
            return Err(eyre!(
                "Minimum amount {} exceeds maximum {}",
                self.amount_min,
                self.amount_max
            ));
        }
        // draws never fall below amount_min
        if format!("{:.*}", AMOUNT_DECIMALS, self.amount_min)
            .trim_start_matches(['0', '.'])
            .is_empty()
        {
            return Err(eyre!(
                "Minimum amount {} rounds to zero at {} decimals",
                self.amount_min,
                AMOUNT_DECIMALS
            ));
        }
        if self.delay_min_secs > self.delay_max_secs {
            return Err(eyre!(
                "Minimum delay {}s exceeds maximum {}s",
                self.delay_min_secs,
                self.delay_max_secs
            ));
        }
        Ok(())
    }

    /// Random amount within range, rounded to 6 decimals
    pub fn draw_amount(&self) -> String {
        let amount = if self.amount_min == self.amount_max {
            self.amount_min
        } else {
            rand::thread_rng().gen_range(self.amount_min..=self.amount_max)
        };
        format!("{:.*}", AMOUNT_DECIMALS, amount)
    }

    pub fn draw_delay(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.delay_min_secs..=self.delay_max_secs);
        Duration::from_secs(secs)
    }
}

/// Per-outcome counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub confirmed: usize,
    pub reverted: usize,
    pub submitted: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &TransactionOutcome) {
        match outcome {
            TransactionOutcome::Confirmed(_) => self.confirmed += 1,
            TransactionOutcome::Reverted(_) => self.reverted += 1,
            TransactionOutcome::Submitted(_) => self.submitted += 1,
            TransactionOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.confirmed + self.reverted + self.submitted + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accounts: {} confirmed, {} reverted, {} submitted, {} failed",
            self.total(),
            self.confirmed,
            self.reverted,
            self.submitted,
            self.failed
        )
    }
}

/// Process every key once, in order.
pub async fn run_batch<R: EvmRpc>(
    orchestrator: &Orchestrator<R>,
    keys: &[Redacted<String>],
    params: &BatchParams,
) -> Result<BatchSummary> {
    params.validate()?;

    let mut summary = BatchSummary::default();

    for (idx, key) in keys.iter().enumerate() {
        let amount = params.draw_amount();
        info!(
            account = idx + 1,
            of = keys.len(),
            amount = %amount,
            "Selected bridge amount"
        );

        let request = AccountRequest {
            private_key: key.clone(),
            network: params.network.clone(),
            amount,
            slippage: params.slippage,
        };
        let outcome = orchestrator.process(&request).await;
        info!(account = idx + 1, outcome = %outcome, "Account finished");
        summary.record(&outcome);

        if idx + 1 < keys.len() {
            let delay = params.draw_delay();
            info!(delay_secs = delay.as_secs(), "Waiting before next account");
            tokio::time::sleep(delay).await;
        }
    }

    info!(summary = %summary, "Batch complete");
    Ok(summary)
}
