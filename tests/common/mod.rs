use anyhow::Result;
use payment_reconciler::domain::event::{EventData, Transaction, WebhookPayload};
use payment_reconciler::domain::order::{Order, OrderUpdate};
use payment_reconciler::gateway::signature::SignatureVerifier;
use payment_reconciler::service::reconciler::Reconciler;
use payment_reconciler::store::idempotency::IdempotencyStore;
use payment_reconciler::store::orders::OrderStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "test_secret_integration";

/// In-memory stand-in for the Redis store. TTLs are accepted and ignored;
/// set-if-absent is atomic under the mutex, which is what the flow relies on.
#[derive(Default)]
pub struct MemoryIdempotencyStore {
    entries: Mutex<HashMap<String, String>>,
    deletes: Mutex<Vec<String>>,
}

impl MemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn delete_count(&self, key: &str) -> usize {
        self.deletes.lock().unwrap().iter().filter(|k| *k == key).count()
    }
}

#[async_trait::async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_if_absent(&self, key: &str, value: &str, _ttl_secs: u64) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        self.deletes.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

/// Scriptable order store: serves one optional order, fails the first
/// `fail_updates` update attempts, and can simulate an unreachable store
/// on lookup.
pub struct ScriptedOrderStore {
    pub order: Option<Order>,
    pub fail_lookups: AtomicBool,
    pub fail_updates: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub last_update: Mutex<Option<(i64, OrderUpdate)>>,
}

impl ScriptedOrderStore {
    pub fn with_order(order: Order) -> Self {
        Self {
            order: Some(order),
            fail_lookups: AtomicBool::new(false),
            fail_updates: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            last_update: Mutex::new(None),
        }
    }

    pub fn empty() -> Self {
        Self {
            order: None,
            fail_lookups: AtomicBool::new(false),
            fail_updates: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            last_update: Mutex::new(None),
        }
    }

    pub fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OrderStore for ScriptedOrderStore {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Order>> {
        let _ = reference;
        if self.fail_lookups.load(Ordering::SeqCst) {
            anyhow::bail!("order store unreachable");
        }
        Ok(self.order.clone())
    }

    async fn update(&self, order_id: i64, update: &OrderUpdate) -> Result<Order> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) > 0 {
            self.fail_updates.fetch_sub(1, Ordering::SeqCst);
            anyhow::bail!("order store unavailable");
        }
        *self.last_update.lock().unwrap() = Some((order_id, update.clone()));
        let mut order = self.order.clone().expect("update without a scripted order");
        order.status = serde_json::to_value(update.status)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string();
        Ok(order)
    }
}

pub fn order(id: i64, total: &str) -> Order {
    Order {
        id,
        total: total.to_string(),
        status: "pending".to_string(),
    }
}

pub fn payload(event_id: &str, reference: &str, status: &str, amount_in_cents: i64) -> WebhookPayload {
    WebhookPayload {
        event: "transaction.updated".to_string(),
        timestamp: 1_678_900_000,
        data: EventData {
            transaction: Transaction {
                id: event_id.to_string(),
                reference: reference.to_string(),
                status: status.to_string(),
                amount_in_cents,
                payment_method_type: Some("CARD".to_string()),
            },
        },
    }
}

pub fn sign(payload: &WebhookPayload) -> String {
    SignatureVerifier::new(TEST_SECRET).compute(payload)
}

pub fn reconciler(
    idempotency: Arc<MemoryIdempotencyStore>,
    orders: Arc<ScriptedOrderStore>,
) -> Reconciler {
    Reconciler {
        verifier: SignatureVerifier::new(TEST_SECRET),
        idempotency,
        orders,
    }
}
