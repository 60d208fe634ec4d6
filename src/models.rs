use serde::Serialize;

/// Mirrored subscription state, keyed by the provider's subscription ID.
///
/// The row reflects the most recently processed relevant event for that
/// subscription; out-of-order deliveries are not reconciled.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    /// Provider subscription ID (sub_xxx)
    pub id: String,
    /// Provider customer ID (cus_xxx)
    pub customer_id: String,
    /// Whether the subscription is currently active
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
