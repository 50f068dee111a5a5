use crate::domain::event::GatewayStatus;
use serde::{Deserialize, Serialize};

/// The slice of a WooCommerce order the reconciler reads. Totals arrive as
/// strings in major units; conversion to cents happens in `domain::money`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Order {
    pub id: i64,
    pub total: String,
    pub status: String,
}

/// Order-store status vocabulary, distinct from the gateway's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Processing,
    Failed,
    Cancelled,
    OnHold,
}

/// Patch applied to the order on a successful reconciliation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_paid: Option<String>,
    pub meta_data: Vec<MetaEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

/// Total mapping from the gateway vocabulary to the store vocabulary.
/// Unrecognized statuses land on `on-hold` for manual review; nothing maps
/// to a success state by default.
pub fn map_gateway_status(status: &GatewayStatus) -> OrderStatus {
    match status {
        GatewayStatus::Approved => OrderStatus::Processing,
        GatewayStatus::Declined | GatewayStatus::Error => OrderStatus::Failed,
        GatewayStatus::Voided => OrderStatus::Cancelled,
        GatewayStatus::Pending => OrderStatus::OnHold,
        GatewayStatus::Unrecognized(raw) => {
            tracing::warn!(status = %raw, "unrecognized gateway status, holding order for review");
            OrderStatus::OnHold
        }
    }
}
