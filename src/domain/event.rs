use serde::Deserialize;

/// Wompi webhook envelope. Deserialization is the shape check: a body that
/// does not fit this type is rejected before any signature work.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    pub timestamp: i64,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub reference: String,
    /// Kept as the raw wire string: it is part of the signed chain and must
    /// be hashed byte-for-byte as received. Parse with [`GatewayStatus::parse`].
    pub status: String,
    pub amount_in_cents: i64,
    pub payment_method_type: Option<String>,
}

/// Wompi transaction statuses the business expects. Anything else comes back
/// as `Unrecognized` and is routed to manual review, never to success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Approved,
    Declined,
    Voided,
    Error,
    Pending,
    Unrecognized(String),
}

impl GatewayStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "APPROVED" => GatewayStatus::Approved,
            "DECLINED" => GatewayStatus::Declined,
            "VOIDED" => GatewayStatus::Voided,
            "ERROR" => GatewayStatus::Error,
            "PENDING" => GatewayStatus::Pending,
            other => GatewayStatus::Unrecognized(other.to_string()),
        }
    }
}
