use anyhow::Result;
use redis::AsyncCommands;

/// Key-value coordination store for webhook deduplication. The only
/// mutual-exclusion primitive in the system is `set_if_absent`.
#[async_trait::async_trait]
pub trait IdempotencyStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Atomically sets `key` iff it does not exist, with a TTL. Returns
    /// whether this call created the key.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool>;

    async fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct RedisIdempotencyStore {
    pub client: redis::Client,
}

impl RedisIdempotencyStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IdempotencyStore for RedisIdempotencyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let val: Option<String> = conn.get(key).await?;
        Ok(val)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // SET NX EX in one round trip so acquire and expiry are atomic.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: usize = conn.del(key).await?;
        Ok(())
    }
}
