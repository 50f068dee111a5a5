use crate::domain::order::{Order, OrderUpdate};
use crate::store::orders::OrderStore;
use anyhow::Result;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Classification seam for a future retryable/permanent split. Today every
/// failure is retried up to the cap, matching the store's observed behavior.
fn should_retry(_err: &anyhow::Error) -> bool {
    true
}

/// Delay before re-attempting after `attempt` failures: 1s, 2s, 4s, ...
/// Monotonically increasing, no jitter.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Retries only the update. Lookups are never retried here; a fresh webhook
/// delivery re-runs the whole flow instead.
pub async fn update_with_retry(
    store: &dyn OrderStore,
    order_id: i64,
    update: &OrderUpdate,
    max_attempts: u32,
) -> Result<Order> {
    let mut attempt = 0;
    loop {
        match store.update(order_id, update).await {
            Ok(order) => return Ok(order),
            Err(err) => {
                attempt += 1;
                if attempt >= max_attempts || !should_retry(&err) {
                    return Err(err);
                }
                let delay = backoff_delay(attempt - 1);
                tracing::warn!(
                    order_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "order update failed, backing off: {err:#}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
