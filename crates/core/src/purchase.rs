//! Purchase ledger domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::perk::Perk;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// One redemption event. Records are append-only: the engine constructs
/// them and the ledger stores them, nothing mutates them afterwards.
///
/// `perk_id` is a weak reference — the perk may later be edited or removed
/// without invalidating history, which is why the supplier display name is
/// denormalized onto the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Doubles as the idempotency key: generated once per redemption
    /// attempt and reused across ledger append retries.
    pub id: String,
    pub member_id: String,
    pub perk_id: String,
    pub purchase_date: DateTime<Utc>,
    /// Price charged.
    pub amount: f64,
    /// Reward credited to the member's wallet.
    pub earnings: f64,
    pub status: PurchaseStatus,
    pub store_name: String,
}

impl PurchaseRecord {
    /// Confirmed record for an accepted redemption. There is no separate
    /// approval workflow: every initiated redemption is written confirmed.
    pub fn confirmed(member_id: &str, perk: &Perk, amount: f64, earnings: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            member_id: member_id.to_string(),
            perk_id: perk.id.clone(),
            purchase_date: Utc::now(),
            amount,
            earnings,
            status: PurchaseStatus::Confirmed,
            store_name: perk.supplier_name.clone(),
        }
    }
}
