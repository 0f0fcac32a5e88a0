use crate::{
    commands::purchaseorders::RecordPaymentCommand,
    commands::Command,
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// What the payment provider reports for a pending settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Settled,
    Pending,
    Failed,
}

/// External settlement rail. The workflow core never talks to banks
/// directly; it polls whatever implementation is wired in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn check_status(
        &self,
        purchase_order_id: Uuid,
        amount: Decimal,
    ) -> Result<ProviderStatus, ServiceError>;
}

/// Terminal outcome of a confirmation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Failed,
    TimedOut,
}

/// Builds confirmation jobs with the polling budget taken from
/// configuration (`payment_poll_attempts`, `payment_poll_delay_secs`).
#[derive(Clone)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    max_attempts: u32,
    poll_delay: Duration,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        Self {
            db_pool,
            event_sender,
            max_attempts: config.payment_poll_attempts,
            poll_delay: Duration::from_secs(config.payment_poll_delay_secs),
        }
    }

    /// A confirmation job against the given settlement rail.
    pub fn confirmation_job(&self, provider: Arc<dyn PaymentProvider>) -> PaymentConfirmationJob {
        PaymentConfirmationJob::new(
            self.db_pool.clone(),
            self.event_sender.clone(),
            provider,
            self.max_attempts,
            self.poll_delay,
        )
    }

    /// Runs the confirmation in the background; callers that care about
    /// the outcome keep the handle.
    pub fn spawn_confirmation(
        &self,
        provider: Arc<dyn PaymentProvider>,
        tenant_id: Uuid,
        purchase_order_id: Uuid,
        amount: Decimal,
    ) -> tokio::task::JoinHandle<Result<ConfirmationOutcome, ServiceError>> {
        let job = self.confirmation_job(provider);
        tokio::spawn(async move { job.confirm(tenant_id, purchase_order_id, amount).await })
    }
}

/// Polls the provider until a payment settles, fails, or the attempt
/// budget runs out. On settlement the payment is recorded against the
/// order through the regular command path.
pub struct PaymentConfirmationJob {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    provider: Arc<dyn PaymentProvider>,
    max_attempts: u32,
    poll_delay: Duration,
}

impl PaymentConfirmationJob {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        provider: Arc<dyn PaymentProvider>,
        max_attempts: u32,
        poll_delay: Duration,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            provider,
            max_attempts,
            poll_delay,
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm(
        &self,
        tenant_id: Uuid,
        purchase_order_id: Uuid,
        amount: Decimal,
    ) -> Result<ConfirmationOutcome, ServiceError> {
        for attempt in 1..=self.max_attempts.max(1) {
            match self
                .provider
                .check_status(purchase_order_id, amount)
                .await?
            {
                ProviderStatus::Settled => {
                    RecordPaymentCommand {
                        id: purchase_order_id,
                        tenant_id,
                        amount,
                    }
                    .execute(self.db_pool.clone(), self.event_sender.clone())
                    .await?;
                    info!(
                        purchase_order_id = %purchase_order_id,
                        attempt,
                        "Payment confirmed"
                    );
                    return Ok(ConfirmationOutcome::Confirmed);
                }
                ProviderStatus::Failed => {
                    warn!(
                        purchase_order_id = %purchase_order_id,
                        attempt,
                        "Provider reported payment failure"
                    );
                    return Ok(ConfirmationOutcome::Failed);
                }
                ProviderStatus::Pending => {
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.poll_delay).await;
                    }
                }
            }
        }

        warn!(
            purchase_order_id = %purchase_order_id,
            attempts = self.max_attempts,
            "Payment confirmation timed out"
        );
        Ok(ConfirmationOutcome::TimedOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSender;
    use tokio::sync::mpsc;

    fn job(provider: MockPaymentProvider, attempts: u32) -> PaymentConfirmationJob {
        let (tx, _rx) = mpsc::channel(8);
        // An unconnected in-memory handle; provider short-circuits before
        // any query in these tests.
        let db = Arc::new(sea_orm::DatabaseConnection::default());
        let mut cfg = AppConfig::for_tests("sqlite::memory:");
        cfg.payment_poll_attempts = attempts;
        PaymentService::new(db, Arc::new(EventSender::new(tx)), &cfg)
            .confirmation_job(Arc::new(provider))
    }

    #[tokio::test]
    async fn failed_payment_is_terminal() {
        let mut provider = MockPaymentProvider::new();
        provider
            .expect_check_status()
            .times(1)
            .returning(|_, _| Ok(ProviderStatus::Failed));

        let outcome = job(provider, 5)
            .confirm(Uuid::new_v4(), Uuid::new_v4(), Decimal::from(100))
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmationOutcome::Failed);
    }

    #[tokio::test]
    async fn pending_exhausts_attempt_budget() {
        let mut provider = MockPaymentProvider::new();
        provider
            .expect_check_status()
            .times(3)
            .returning(|_, _| Ok(ProviderStatus::Pending));

        let outcome = job(provider, 3)
            .confirm(Uuid::new_v4(), Uuid::new_v4(), Decimal::from(100))
            .await
            .unwrap();
        assert_eq!(outcome, ConfirmationOutcome::TimedOut);
    }
}
