pub mod config;
pub mod domain {
    pub mod error;
    pub mod event;
    pub mod money;
    pub mod order;
}
pub mod gateway {
    pub mod signature;
}
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod webhooks;
    }
}
pub mod service {
    pub mod reconciler;
}
pub mod store {
    pub mod idempotency;
    pub mod orders;
    pub mod retry;
}

#[derive(Clone)]
pub struct AppState {
    pub reconciler: service::reconciler::Reconciler,
    pub redis_client: redis::Client,
}
