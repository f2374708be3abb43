//! Collaborator contracts for the redemption path, plus thread-safe
//! in-memory reference implementations and the demo seed catalog.
//!
//! Production deployments put a managed document store behind these traits;
//! the in-memory implementations carry development and tests.

pub mod memory;
pub mod seed;

use async_trait::async_trait;
use vanta_core::member::MemberProfile;
use vanta_core::perk::Perk;
use vanta_core::purchase::PurchaseRecord;
use vanta_core::VantaResult;

pub use memory::{MemoryPerkCatalog, MemoryProfileStore, MemoryPurchaseLedger};

/// Member profile persistence. One record per member, keyed by the auth
/// provider's subject id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, member_id: &str) -> VantaResult<Option<MemberProfile>>;
    async fn insert(&self, profile: &MemberProfile) -> VantaResult<()>;
    async fn update(&self, member_id: &str, profile: &MemberProfile) -> VantaResult<()>;
    async fn list(&self) -> VantaResult<Vec<MemberProfile>>;
}

/// Perk catalog persistence.
///
/// Redemption counters move only through the reserve/release pair, so
/// `current_redemptions <= redemption_limit` holds under concurrent
/// redemptions.
#[async_trait]
pub trait PerkCatalog: Send + Sync {
    async fn list(&self) -> VantaResult<Vec<Perk>>;
    async fn get(&self, perk_id: &str) -> VantaResult<Option<Perk>>;
    async fn upsert(&self, perk: &Perk) -> VantaResult<()>;
    async fn delete(&self, perk_id: &str) -> VantaResult<bool>;
    /// Compare-and-increment `current_redemptions` under the entry lock.
    /// Returns false when the perk is unknown or already at its limit.
    async fn try_reserve_redemption(&self, perk_id: &str) -> VantaResult<bool>;
    /// Undo a reservation after a failed ledger append.
    async fn release_redemption(&self, perk_id: &str) -> VantaResult<()>;
}

/// Append-only purchase ledger.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Durable append, idempotent on record id: re-appending an id the
    /// ledger already holds is a no-op success.
    async fn append(&self, record: &PurchaseRecord) -> VantaResult<()>;
    /// Purchases for one member, newest first.
    async fn list_by_member(&self, member_id: &str) -> VantaResult<Vec<PurchaseRecord>>;
    /// Full ledger snapshot, for reporting.
    async fn list_all(&self) -> VantaResult<Vec<PurchaseRecord>>;
}
