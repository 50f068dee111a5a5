use thiserror::Error;

/// Everything that can stop a reconciliation. The HTTP layer owns the
/// mapping to status codes; the variants here are what the flow branches on.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("signature header missing")]
    MissingSignature,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("no order found for reference {reference}")]
    OrderNotFound { reference: String },

    #[error("amount mismatch: gateway declared {declared} cents, order total is {expected} cents")]
    AmountMismatch { declared: i64, expected: i64 },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
