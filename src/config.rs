use anyhow::Context;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: String,
    pub wc_base_url: String,
    pub wc_consumer_key: String,
    pub wc_consumer_secret: String,
    pub wompi_events_secret: String,
    pub order_store_timeout_ms: u64,
}

impl AppConfig {
    /// The Wompi events secret and Woo credentials have no defaults: a
    /// deployment without them must fail at startup, not skip verification.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string()),
            wc_base_url: std::env::var("WC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            wc_consumer_key: std::env::var("WC_CONSUMER_KEY")
                .context("WC_CONSUMER_KEY is not set")?,
            wc_consumer_secret: std::env::var("WC_CONSUMER_SECRET")
                .context("WC_CONSUMER_SECRET is not set")?,
            wompi_events_secret: std::env::var("WOMPI_EVENTS_SECRET")
                .context("WOMPI_EVENTS_SECRET is not set")?,
            order_store_timeout_ms: std::env::var("ORDER_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(10_000),
        })
    }
}
