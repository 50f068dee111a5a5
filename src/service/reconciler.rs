use crate::domain::error::ReconcileError;
use crate::domain::event::{GatewayStatus, Transaction, WebhookPayload};
use crate::domain::money::cop_to_cents;
use crate::domain::order::{map_gateway_status, MetaEntry, OrderStatus, OrderUpdate};
use crate::gateway::signature::SignatureVerifier;
use crate::store::idempotency::IdempotencyStore;
use crate::store::orders::OrderStore;
use crate::store::retry::{update_with_retry, DEFAULT_MAX_ATTEMPTS};
use std::sync::Arc;

/// Bounds the blast radius of a worker that dies holding the lock: after
/// this many seconds a redelivery may re-acquire it and retry the event.
pub const LOCK_TTL_SECS: u64 = 300;
/// Redeliveries of a completed event are absorbed as no-ops for this window.
pub const PROCESSED_TTL_SECS: u64 = 60 * 60 * 24 * 14;

pub fn lock_key(event_id: &str) -> String {
    format!("wompi:lock:{event_id}")
}

pub fn processed_key(event_id: &str) -> String {
    format!("wompi:processed:{event_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The order was patched and the processed marker set.
    Updated,
    /// A processed marker exists for this event id; nothing was done.
    AlreadyProcessed,
    /// Another invocation holds the processing lock; nothing was done.
    LockContended,
}

/// Applies one verified gateway event to the order store at most once.
/// All collaborators are injected; the reconciler holds no state of its own.
#[derive(Clone)]
pub struct Reconciler {
    pub verifier: SignatureVerifier,
    pub idempotency: Arc<dyn IdempotencyStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Reconciler {
    pub async fn reconcile(
        &self,
        payload: &WebhookPayload,
        supplied_signature: &str,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        if !self.verifier.verify(payload, supplied_signature) {
            return Err(ReconcileError::InvalidSignature);
        }

        let tx = &payload.data.transaction;
        tracing::info!(
            event_id = %tx.id,
            reference = %tx.reference,
            status = %tx.status,
            "webhook event verified"
        );

        if self.idempotency.get(&processed_key(&tx.id)).await?.is_some() {
            tracing::info!(event_id = %tx.id, "event already processed, ignoring redelivery");
            return Ok(ReconcileOutcome::AlreadyProcessed);
        }

        let lock = lock_key(&tx.id);
        if !self.idempotency.set_if_absent(&lock, "1", LOCK_TTL_SECS).await? {
            tracing::info!(event_id = %tx.id, "event is being handled by a concurrent invocation");
            return Ok(ReconcileOutcome::LockContended);
        }

        let result = self.apply(tx).await;

        // Single release point for the business phase. The one exception is
        // a missing order: the lock stays held so redeliveries for a
        // permanently absent order are throttled by its TTL.
        if !matches!(&result, Err(ReconcileError::OrderNotFound { .. })) {
            if let Err(err) = self.idempotency.delete(&lock).await {
                tracing::error!(event_id = %tx.id, "failed to release processing lock: {err:#}");
            }
        }

        result
    }

    async fn apply(&self, tx: &Transaction) -> Result<ReconcileOutcome, ReconcileError> {
        let order = self
            .orders
            .find_by_reference(&tx.reference)
            .await?
            .ok_or_else(|| ReconcileError::OrderNotFound {
                reference: tx.reference.clone(),
            })?;

        let expected = cop_to_cents(&order.total)?;
        if expected != tx.amount_in_cents {
            return Err(ReconcileError::AmountMismatch {
                declared: tx.amount_in_cents,
                expected,
            });
        }

        let status = map_gateway_status(&GatewayStatus::parse(&tx.status));
        let update = build_update(tx, status);
        update_with_retry(self.orders.as_ref(), order.id, &update, DEFAULT_MAX_ATTEMPTS).await?;

        // NX keeps the first marker authoritative even if a straggler with an
        // expired lock reaches this point late.
        self.idempotency
            .set_if_absent(&processed_key(&tx.id), "1", PROCESSED_TTL_SECS)
            .await?;

        tracing::info!(
            event_id = %tx.id,
            order_id = order.id,
            status = ?status,
            "order reconciled"
        );
        Ok(ReconcileOutcome::Updated)
    }
}

fn build_update(tx: &Transaction, status: OrderStatus) -> OrderUpdate {
    let mut meta_data = vec![MetaEntry {
        key: "_wompi_event_id".to_string(),
        value: tx.id.clone(),
    }];
    if let Some(method) = &tx.payment_method_type {
        meta_data.push(MetaEntry {
            key: "_wompi_payment_method".to_string(),
            value: method.clone(),
        });
    }

    OrderUpdate {
        status,
        transaction_id: tx.id.clone(),
        date_paid: (status == OrderStatus::Processing)
            .then(|| chrono::Utc::now().to_rfc3339()),
        meta_data,
    }
}
