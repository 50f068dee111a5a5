use axum::routing::{get, post};
use axum::Router;
use payment_reconciler::config::AppConfig;
use payment_reconciler::gateway::signature::SignatureVerifier;
use payment_reconciler::service::reconciler::Reconciler;
use payment_reconciler::store::idempotency::RedisIdempotencyStore;
use payment_reconciler::store::orders::WooOrderStore;
use payment_reconciler::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;
    let idempotency = Arc::new(RedisIdempotencyStore::new(redis_client.clone()));
    let orders = Arc::new(WooOrderStore {
        base_url: cfg.wc_base_url.clone(),
        consumer_key: cfg.wc_consumer_key.clone(),
        consumer_secret: cfg.wc_consumer_secret.clone(),
        timeout_ms: cfg.order_store_timeout_ms,
        client: reqwest::Client::new(),
    });

    let reconciler = Reconciler {
        verifier: SignatureVerifier::new(cfg.wompi_events_secret.clone()),
        idempotency,
        orders,
    };

    let state = AppState {
        reconciler,
        redis_client,
    };

    let app = Router::new()
        .route(
            "/webhooks/wompi",
            post(payment_reconciler::http::handlers::webhooks::wompi_webhook),
        )
        .route("/ops/readiness", get(payment_reconciler::http::handlers::ops::readiness))
        .route("/ops/liveness", get(payment_reconciler::http::handlers::ops::liveness))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
