//! In-memory stores backed by DashMap.
//!
//! Production: replace with the managed document store behind the same
//! traits. These provide the identical API surface for development and
//! testing, including fault injection on the ledger for rejection-path
//! tests.

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, info};
use vanta_core::member::MemberProfile;
use vanta_core::perk::Perk;
use vanta_core::purchase::PurchaseRecord;
use vanta_core::{VantaError, VantaResult};

use crate::{PerkCatalog, ProfileStore, PurchaseLedger};

// ─── Profile Store ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<String, MemberProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        info!("Profile store initialized (in-memory, development mode)");
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, member_id: &str) -> VantaResult<Option<MemberProfile>> {
        Ok(self.profiles.get(member_id).map(|r| r.value().clone()))
    }

    async fn insert(&self, profile: &MemberProfile) -> VantaResult<()> {
        debug!(member_id = %profile.member_id, "Profile inserted");
        self.profiles
            .insert(profile.member_id.clone(), profile.clone());
        Ok(())
    }

    async fn update(&self, member_id: &str, profile: &MemberProfile) -> VantaResult<()> {
        if !self.profiles.contains_key(member_id) {
            return Err(VantaError::Internal(anyhow!(
                "no profile for member {member_id}"
            )));
        }
        self.profiles.insert(member_id.to_string(), profile.clone());
        Ok(())
    }

    async fn list(&self) -> VantaResult<Vec<MemberProfile>> {
        Ok(self.profiles.iter().map(|r| r.value().clone()).collect())
    }
}

// ─── Perk Catalog ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryPerkCatalog {
    perks: DashMap<String, Perk>,
}

impl MemoryPerkCatalog {
    pub fn new() -> Self {
        info!("Perk catalog initialized (in-memory, development mode)");
        Self::default()
    }
}

#[async_trait]
impl PerkCatalog for MemoryPerkCatalog {
    async fn list(&self) -> VantaResult<Vec<Perk>> {
        let mut perks: Vec<Perk> = self.perks.iter().map(|r| r.value().clone()).collect();
        perks.sort_by(|a, b| a.category.cmp(&b.category).then(a.title.cmp(&b.title)));
        Ok(perks)
    }

    async fn get(&self, perk_id: &str) -> VantaResult<Option<Perk>> {
        Ok(self.perks.get(perk_id).map(|r| r.value().clone()))
    }

    async fn upsert(&self, perk: &Perk) -> VantaResult<()> {
        debug!(perk_id = %perk.id, title = %perk.title, "Perk upserted");
        self.perks.insert(perk.id.clone(), perk.clone());
        Ok(())
    }

    async fn delete(&self, perk_id: &str) -> VantaResult<bool> {
        Ok(self.perks.remove(perk_id).is_some())
    }

    async fn try_reserve_redemption(&self, perk_id: &str) -> VantaResult<bool> {
        match self.perks.get_mut(perk_id) {
            Some(mut entry) => {
                let perk = entry.value_mut();
                if perk.current_redemptions >= perk.redemption_limit {
                    return Ok(false);
                }
                perk.current_redemptions += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn release_redemption(&self, perk_id: &str) -> VantaResult<()> {
        if let Some(mut entry) = self.perks.get_mut(perk_id) {
            let perk = entry.value_mut();
            perk.current_redemptions = perk.current_redemptions.saturating_sub(1);
        }
        Ok(())
    }
}

// ─── Purchase Ledger ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryPurchaseLedger {
    records: DashMap<String, PurchaseRecord>,
    fail_appends: AtomicU32,
}

impl MemoryPurchaseLedger {
    pub fn new() -> Self {
        info!("Purchase ledger initialized (in-memory, development mode)");
        Self::default()
    }

    /// Make the next `n` appends fail. Used by rejection-path tests.
    pub fn fail_next_appends(&self, n: u32) {
        self.fail_appends.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl PurchaseLedger for MemoryPurchaseLedger {
    async fn append(&self, record: &PurchaseRecord) -> VantaResult<()> {
        let inject_failure = self
            .fail_appends
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if inject_failure {
            return Err(VantaError::Internal(anyhow!("injected ledger failure")));
        }
        if self.records.contains_key(&record.id) {
            debug!(record_id = %record.id, "Duplicate ledger append ignored");
            return Ok(());
        }
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn list_by_member(&self, member_id: &str) -> VantaResult<Vec<PurchaseRecord>> {
        let mut records: Vec<PurchaseRecord> = self
            .records
            .iter()
            .filter(|r| r.value().member_id == member_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(records)
    }

    async fn list_all(&self) -> VantaResult<Vec<PurchaseRecord>> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use vanta_core::member::ProvisioningHints;
    use vanta_core::perk::{CreatePerkRequest, OfferType};
    use vanta_core::purchase::PurchaseStatus;

    fn sample_perk(limit: u32) -> Perk {
        Perk::from_create(CreatePerkRequest {
            supplier_name: "Starbucks".to_string(),
            title: "Second Coffee Half Price".to_string(),
            description: String::new(),
            offer_type: OfferType::Deal,
            value: "%50".to_string(),
            original_price: Some(120.0),
            discounted_price: Some(60.0),
            category: "Dining".to_string(),
            valid_until: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            redemption_limit: limit,
            rating: None,
            location: None,
            image_url: None,
        })
    }

    fn sample_record(member_id: &str, perk: &Perk, days_ago: i64) -> PurchaseRecord {
        let mut record = PurchaseRecord::confirmed(member_id, perk, 60.0, 6.0);
        record.purchase_date = Utc::now() - Duration::days(days_ago);
        record
    }

    #[tokio::test]
    async fn test_profile_update_requires_existing() {
        let store = MemoryProfileStore::new();
        let profile = MemberProfile::provisioned("m-1", &ProvisioningHints::default(), 100.0);
        assert!(store.update("m-1", &profile).await.is_err());
        store.insert(&profile).await.unwrap();
        assert!(store.update("m-1", &profile).await.is_ok());
    }

    #[tokio::test]
    async fn test_reserve_stops_at_limit() {
        let catalog = MemoryPerkCatalog::new();
        let perk = sample_perk(2);
        catalog.upsert(&perk).await.unwrap();

        assert!(catalog.try_reserve_redemption(&perk.id).await.unwrap());
        assert!(catalog.try_reserve_redemption(&perk.id).await.unwrap());
        assert!(!catalog.try_reserve_redemption(&perk.id).await.unwrap());

        let stored = catalog.get(&perk.id).await.unwrap().unwrap();
        assert_eq!(stored.current_redemptions, 2);
        assert_eq!(stored.remaining_redemptions(), 0);
    }

    #[tokio::test]
    async fn test_release_restores_slot() {
        let catalog = MemoryPerkCatalog::new();
        let perk = sample_perk(1);
        catalog.upsert(&perk).await.unwrap();

        assert!(catalog.try_reserve_redemption(&perk.id).await.unwrap());
        catalog.release_redemption(&perk.id).await.unwrap();
        assert!(catalog.try_reserve_redemption(&perk.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_unknown_perk_is_false() {
        let catalog = MemoryPerkCatalog::new();
        assert!(!catalog.try_reserve_redemption("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_ledger_append_is_idempotent() {
        let ledger = MemoryPurchaseLedger::new();
        let perk = sample_perk(10);
        let record = sample_record("m-1", &perk, 0);

        ledger.append(&record).await.unwrap();
        ledger.append(&record).await.unwrap();

        let records = ledger.list_by_member("m-1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, PurchaseStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_ledger_lists_newest_first() {
        let ledger = MemoryPurchaseLedger::new();
        let perk = sample_perk(10);
        let old = sample_record("m-1", &perk, 3);
        let recent = sample_record("m-1", &perk, 1);
        let other = sample_record("m-2", &perk, 0);

        ledger.append(&old).await.unwrap();
        ledger.append(&recent).await.unwrap();
        ledger.append(&other).await.unwrap();

        let records = ledger.list_by_member("m-1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, recent.id);
        assert_eq!(records[1].id, old.id);
    }

    #[tokio::test]
    async fn test_ledger_fault_injection() {
        let ledger = MemoryPurchaseLedger::new();
        let perk = sample_perk(10);
        ledger.fail_next_appends(1);

        assert!(ledger.append(&sample_record("m-1", &perk, 0)).await.is_err());
        assert!(ledger.append(&sample_record("m-1", &perk, 0)).await.is_ok());
    }
}
