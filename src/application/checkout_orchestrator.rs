//! CheckoutOrchestrator - runs one subscription checkout at a time.
//!
//! `initiate` claims the single attempt slot synchronously, before its first
//! await, so a second click while a request is in flight is a no-op. The
//! slot is released by a guard on every exit path: success, failure, panic
//! or the caller dropping the future.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::checkout::{
    CheckoutAttempt, CheckoutError, CheckoutOutcome, CheckoutPhase, Plan, PlanCatalog,
    PlanControl,
};
use crate::domain::foundation::{AttemptId, PriceId};
use crate::ports::{CheckoutSessionGateway, PaymentRedirect};

/// Clears the attempt slot when dropped.
struct AttemptGuard<'a> {
    slot: &'a watch::Sender<CheckoutAttempt>,
    attempt_id: AttemptId,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.slot.send_modify(CheckoutAttempt::clear);
        tracing::debug!(attempt_id = %self.attempt_id, "Checkout attempt released");
    }
}

/// Drives the checkout flow for the pricing view.
pub struct CheckoutOrchestrator {
    catalog: PlanCatalog,
    gateway: Arc<dyn CheckoutSessionGateway>,
    redirect: Arc<dyn PaymentRedirect>,
    slot: watch::Sender<CheckoutAttempt>,
}

impl CheckoutOrchestrator {
    pub fn new(
        catalog: PlanCatalog,
        gateway: Arc<dyn CheckoutSessionGateway>,
        redirect: Arc<dyn PaymentRedirect>,
    ) -> Self {
        let (slot, _) = watch::channel(CheckoutAttempt::Idle);
        Self {
            catalog,
            gateway,
            redirect,
            slot,
        }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Snapshot of the attempt slot.
    pub fn state(&self) -> CheckoutAttempt {
        self.slot.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        !self.slot.borrow().is_idle()
    }

    pub fn phase_of(&self, price_id: &PriceId) -> CheckoutPhase {
        self.slot.borrow().phase_of(price_id)
    }

    /// Receiver that observes every attempt transition.
    pub fn watch(&self) -> watch::Receiver<CheckoutAttempt> {
        self.slot.subscribe()
    }

    pub fn control_for(&self, plan: &Plan) -> PlanControl {
        PlanControl::derive(plan, &self.slot.borrow())
    }

    /// Controls for every catalog plan, in catalog order.
    pub fn controls(&self) -> Vec<PlanControl> {
        let attempt = self.slot.borrow();
        self.catalog
            .iter()
            .map(|plan| PlanControl::derive(plan, &attempt))
            .collect()
    }

    /// Starts checkout for `price_id`.
    ///
    /// Returns `Ignored` without any request if another attempt is active.
    /// Failures are reported in the outcome; the slot is `Idle` again by the
    /// time this returns.
    pub async fn initiate(&self, price_id: &PriceId) -> CheckoutOutcome {
        if !self.catalog.contains(price_id) {
            tracing::warn!(%price_id, "Checkout requested for unknown plan");
            return CheckoutOutcome::Failed(CheckoutError::UnknownPlan(price_id.clone()));
        }

        let mut blocked_by = None;
        self.slot.send_if_modified(|attempt| match attempt.begin(price_id.clone()) {
            Ok(()) => true,
            Err(active) => {
                blocked_by = Some(active);
                false
            }
        });
        if let Some(active) = blocked_by {
            tracing::debug!(%price_id, %active, "Checkout already in flight, ignoring");
            return CheckoutOutcome::Ignored { active };
        }

        let attempt_id = AttemptId::new();
        let _guard = AttemptGuard {
            slot: &self.slot,
            attempt_id,
        };
        tracing::info!(%attempt_id, %price_id, "Checkout attempt started");

        let session_id = match self.gateway.create_checkout_session(price_id).await {
            Ok(session_id) => session_id,
            Err(err) => return self.fail(attempt_id, price_id, err),
        };

        self.slot.send_modify(|attempt| {
            if let Err(e) = attempt.mark_redirecting(price_id) {
                tracing::warn!(%attempt_id, error = %e, "Unexpected attempt state before redirect");
            }
        });

        if let Some(err) = self.redirect.redirect_to_checkout(&session_id).await {
            return self.fail(attempt_id, price_id, CheckoutError::Redirect(err));
        }

        tracing::info!(%attempt_id, %price_id, %session_id, "Redirected to checkout");
        CheckoutOutcome::Redirected { session_id }
    }

    fn fail(&self, attempt_id: AttemptId, price_id: &PriceId, err: CheckoutError) -> CheckoutOutcome {
        tracing::error!(
            %attempt_id,
            %price_id,
            kind = err.kind(),
            retryable = err.is_retryable(),
            error = %err,
            "Checkout attempt failed"
        );
        CheckoutOutcome::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::checkout::{MockCheckoutGateway, MockPaymentRedirect};
    use crate::domain::checkout::RedirectError;
    use crate::domain::foundation::CheckoutSessionId;
    use async_trait::async_trait;
    use std::time::Duration;

    fn pro() -> PriceId {
        PriceId::new("price_pro_monthly").unwrap()
    }

    fn starter() -> PriceId {
        PriceId::new("price_starter_monthly").unwrap()
    }

    fn orchestrator(
        gateway: Arc<MockCheckoutGateway>,
        redirect: Arc<MockPaymentRedirect>,
    ) -> CheckoutOrchestrator {
        CheckoutOrchestrator::new(PlanCatalog::default_catalog().clone(), gateway, redirect)
    }

    #[tokio::test]
    async fn successful_checkout_redirects_with_issued_session() {
        let gateway = Arc::new(MockCheckoutGateway::new().with_session("cs_123"));
        let redirect = Arc::new(MockPaymentRedirect::new());
        let orchestrator = orchestrator(gateway.clone(), redirect.clone());

        let outcome = orchestrator.initiate(&pro()).await;

        let expected = CheckoutSessionId::new("cs_123").unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Redirected {
                session_id: expected.clone()
            }
        );
        assert_eq!(gateway.calls(), vec![pro()]);
        assert_eq!(redirect.calls(), vec![expected]);
        assert!(orchestrator.state().is_idle());
    }

    #[tokio::test]
    async fn unknown_plan_fails_without_request() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let orchestrator = orchestrator(gateway.clone(), Arc::new(MockPaymentRedirect::new()));

        let outcome = orchestrator.initiate(&PriceId::new("price_gold").unwrap()).await;

        assert!(matches!(
            outcome.error(),
            Some(CheckoutError::UnknownPlan(_))
        ));
        assert_eq!(gateway.call_count(), 0);
        assert!(orchestrator.state().is_idle());
    }

    #[tokio::test]
    async fn gateway_failure_returns_to_idle() {
        let gateway = Arc::new(MockCheckoutGateway::new().with_error(CheckoutError::HttpStatus {
            status: 500,
            body: None,
        }));
        let redirect = Arc::new(MockPaymentRedirect::new());
        let orchestrator = orchestrator(gateway, redirect.clone());

        let outcome = orchestrator.initiate(&starter()).await;

        assert!(matches!(
            outcome.error(),
            Some(CheckoutError::HttpStatus { status: 500, .. })
        ));
        assert_eq!(redirect.call_count(), 0);
        assert!(orchestrator.state().is_idle());
    }

    #[tokio::test]
    async fn redirect_error_is_reported() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let redirect = Arc::new(
            MockPaymentRedirect::new().with_error(RedirectError::new("Stripe.js failed to load")),
        );
        let orchestrator = orchestrator(gateway, redirect);

        let outcome = orchestrator.initiate(&pro()).await;

        match outcome {
            CheckoutOutcome::Failed(CheckoutError::Redirect(err)) => {
                assert_eq!(err.message, "Stripe.js failed to load");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(orchestrator.state().is_idle());
    }

    #[tokio::test]
    async fn second_initiate_while_pending_is_ignored() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let gate = gateway.hold_requests();
        let orchestrator = orchestrator(gateway.clone(), Arc::new(MockPaymentRedirect::new()));
        let pro = pro();

        let (first, second) = tokio::join!(orchestrator.initiate(&pro), async {
            let outcome = orchestrator.initiate(&starter()).await;
            gate.release();
            outcome
        });

        assert!(first.is_redirected());
        assert_eq!(second, CheckoutOutcome::Ignored { active: pro });
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn controls_reflect_pending_plan() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let gate = gateway.hold_requests();
        let orchestrator = Arc::new(orchestrator(gateway, Arc::new(MockPaymentRedirect::new())));

        let task = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.initiate(&pro()).await })
        };
        let mut rx = orchestrator.watch();
        rx.wait_for(|attempt| !attempt.is_idle()).await.unwrap();

        assert_eq!(orchestrator.phase_of(&pro()), CheckoutPhase::Pending);
        assert_eq!(orchestrator.phase_of(&starter()), CheckoutPhase::Idle);
        let controls = orchestrator.controls();
        assert!(controls.iter().all(|c| c.disabled));
        let pro_control = controls.iter().find(|c| c.price_id == pro()).unwrap();
        assert_eq!(pro_control.label, PlanControl::LOADING_LABEL);
        let starter_control = controls.iter().find(|c| c.price_id == starter()).unwrap();
        assert_eq!(starter_control.label, "Subscribe to Starter");

        gate.release();
        assert!(task.await.unwrap().is_redirected());
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn slot_is_redirecting_while_redirect_runs() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let redirect = Arc::new(MockPaymentRedirect::new());
        let gate = redirect.hold_redirects();
        let orchestrator = Arc::new(orchestrator(gateway, redirect));

        let task = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.initiate(&pro()).await })
        };
        let mut rx = orchestrator.watch();
        rx.wait_for(|attempt| attempt.phase() == CheckoutPhase::Redirecting)
            .await
            .unwrap();

        assert_eq!(orchestrator.phase_of(&pro()), CheckoutPhase::Redirecting);

        gate.release();
        task.await.unwrap();
        assert!(orchestrator.state().is_idle());
    }

    #[tokio::test]
    async fn dropping_the_future_releases_the_slot() {
        let gateway = Arc::new(MockCheckoutGateway::new());
        let _gate = gateway.hold_requests();
        let orchestrator = orchestrator(gateway, Arc::new(MockPaymentRedirect::new()));

        let result =
            tokio::time::timeout(Duration::from_millis(20), orchestrator.initiate(&pro())).await;

        assert!(result.is_err());
        assert!(orchestrator.state().is_idle());
    }

    struct PanickingGateway;

    #[async_trait]
    impl CheckoutSessionGateway for PanickingGateway {
        async fn create_checkout_session(
            &self,
            _price_id: &PriceId,
        ) -> Result<CheckoutSessionId, CheckoutError> {
            panic!("gateway exploded");
        }
    }

    #[tokio::test]
    async fn panic_during_attempt_releases_the_slot() {
        let orchestrator = Arc::new(CheckoutOrchestrator::new(
            PlanCatalog::default_catalog().clone(),
            Arc::new(PanickingGateway),
            Arc::new(MockPaymentRedirect::new()),
        ));

        let task = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.initiate(&pro()).await })
        };

        assert!(task.await.unwrap_err().is_panic());
        assert!(orchestrator.state().is_idle());
    }
}
