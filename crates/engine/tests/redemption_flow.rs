//! End-to-end redemption flow over the in-memory stores: pricing, tier
//! progression, rejection paths, and reconciliation.

use std::sync::Arc;

use chrono::NaiveDate;
use vanta_core::config::EngineConfig;
use vanta_core::member::{MemberProfile, MemberTier, ProvisioningHints};
use vanta_core::perk::{CreatePerkRequest, OfferType, Perk};
use vanta_core::purchase::{PurchaseRecord, PurchaseStatus};
use vanta_core::VantaError;
use vanta_engine::RedemptionEngine;
use vanta_store::{
    MemoryPerkCatalog, MemoryProfileStore, MemoryPurchaseLedger, PerkCatalog, ProfileStore,
    PurchaseLedger,
};

struct Fixture {
    engine: RedemptionEngine,
    profiles: Arc<MemoryProfileStore>,
    catalog: Arc<MemoryPerkCatalog>,
    ledger: Arc<MemoryPurchaseLedger>,
}

fn fixture() -> Fixture {
    let profiles = Arc::new(MemoryProfileStore::new());
    let catalog = Arc::new(MemoryPerkCatalog::new());
    let ledger = Arc::new(MemoryPurchaseLedger::new());
    let mut config = EngineConfig::default();
    // Keep rejection tests fast.
    config.ledger_retry_base_ms = 1;
    let engine = RedemptionEngine::new(
        &config,
        profiles.clone(),
        catalog.clone(),
        ledger.clone(),
    );
    Fixture {
        engine,
        profiles,
        catalog,
        ledger,
    }
}

fn perk(id: &str, value: &str, discounted_price: Option<f64>, limit: u32) -> Perk {
    let mut perk = Perk::from_create(CreatePerkRequest {
        supplier_name: "Burger Lab".to_string(),
        title: format!("Offer {id}"),
        description: String::new(),
        offer_type: OfferType::Deal,
        value: value.to_string(),
        original_price: None,
        discounted_price,
        category: "Dining".to_string(),
        valid_until: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        redemption_limit: limit,
        rating: None,
        location: None,
        image_url: None,
    });
    perk.id = id.to_string();
    perk
}

async fn member(fx: &Fixture, id: &str, tier: MemberTier, total_spent: f64, balance: f64) {
    let mut profile = MemberProfile::provisioned(id, &ProvisioningHints::default(), balance);
    profile.tier = tier;
    profile.total_spent = total_spent;
    fx.profiles.insert(&profile).await.unwrap();
}

#[tokio::test]
async fn test_bronze_member_redeems_percent_perk() {
    let fx = fixture();
    member(&fx, "m-1", MemberTier::Bronze, 0.0, 100.0).await;
    fx.catalog
        .upsert(&perk("p-1", "%20", Some(1000.0), 100))
        .await
        .unwrap();

    let outcome = fx.engine.redeem("m-1", "p-1").await.unwrap();

    assert_eq!(outcome.quote.amount, 1000.0);
    assert_eq!(outcome.quote.rate, 0.20);
    assert_eq!(outcome.quote.bonus_multiplier, 1.00);
    assert!((outcome.quote.earnings - 200.0).abs() < 1e-9);
    assert_eq!(outcome.profile.total_spent, 1000.0);
    assert_eq!(outcome.profile.tier, MemberTier::Bronze);
    assert!((outcome.profile.balance - 300.0).abs() < 1e-9);
    assert!(!outcome.tier_changed);

    // Durable effects: one confirmed ledger record, counter incremented,
    // profile persisted.
    let records = fx.ledger.list_by_member("m-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, PurchaseStatus::Confirmed);
    assert_eq!(records[0].store_name, "Burger Lab");
    let stored = fx.catalog.get("p-1").await.unwrap().unwrap();
    assert_eq!(stored.current_redemptions, 1);
    let profile = fx.profiles.get("m-1").await.unwrap().unwrap();
    assert_eq!(profile, outcome.profile);
}

#[tokio::test]
async fn test_silver_member_bonus_and_boundary_on_new_total() {
    let fx = fixture();
    member(&fx, "m-2", MemberTier::Silver, 1800.0, 100.0).await;
    fx.catalog
        .upsert(&perk("p-2", "%10", Some(2500.0), 100))
        .await
        .unwrap();

    let outcome = fx.engine.redeem("m-2", "p-2").await.unwrap();

    assert_eq!(outcome.quote.amount, 2500.0);
    assert_eq!(outcome.quote.rate, 0.10);
    assert_eq!(outcome.quote.bonus_multiplier, 1.05);
    assert!((outcome.quote.earnings - 262.5).abs() < 1e-9);
    // The boundary is evaluated on the new cumulative spend: 4300 < 5000,
    // so the member stays Silver.
    assert_eq!(outcome.profile.total_spent, 4300.0);
    assert_eq!(outcome.profile.tier, MemberTier::Silver);
    assert!(!outcome.tier_changed);
}

#[tokio::test]
async fn test_crossing_gold_threshold_upgrades() {
    let fx = fixture();
    member(&fx, "m-3", MemberTier::Silver, 4000.0, 0.0).await;
    fx.catalog
        .upsert(&perk("p-3", "%10", Some(1000.0), 100))
        .await
        .unwrap();

    let outcome = fx.engine.redeem("m-3", "p-3").await.unwrap();
    assert_eq!(outcome.profile.total_spent, 5000.0);
    assert_eq!(outcome.profile.tier, MemberTier::Gold);
    assert!(outcome.tier_changed);
    assert!(outcome.profile.tier > MemberTier::Silver);
}

#[tokio::test]
async fn test_unpriced_perk_falls_back() {
    let fx = fixture();
    member(&fx, "m-4", MemberTier::Bronze, 0.0, 100.0).await;
    fx.catalog
        .upsert(&perk("p-4", "BEDAVA", None, 100))
        .await
        .unwrap();

    let outcome = fx.engine.redeem("m-4", "p-4").await.unwrap();
    assert_eq!(outcome.quote.amount, 500.0);
    assert_eq!(outcome.quote.rate, 0.05);
    assert!((outcome.quote.earnings - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_perk_is_rejected_before_side_effects() {
    let fx = fixture();
    member(&fx, "m-5", MemberTier::Bronze, 0.0, 100.0).await;

    let err = fx.engine.redeem("m-5", "ghost").await.unwrap_err();
    assert!(matches!(err, VantaError::PerkUnavailable { .. }));
    assert!(fx.ledger.list_by_member("m-5").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_failure_leaves_profile_untouched() {
    let fx = fixture();
    member(&fx, "m-6", MemberTier::Bronze, 0.0, 100.0).await;
    fx.catalog
        .upsert(&perk("p-6", "%20", Some(1000.0), 100))
        .await
        .unwrap();
    let before = fx.profiles.get("m-6").await.unwrap().unwrap();

    // Exhaust the whole retry budget.
    fx.ledger
        .fail_next_appends(fx.engine.config().ledger_max_retries);

    let err = fx.engine.redeem("m-6", "p-6").await.unwrap_err();
    assert!(matches!(err, VantaError::LedgerWriteFailed(_)));

    let after = fx.profiles.get("m-6").await.unwrap().unwrap();
    assert_eq!(before, after);
    assert!(fx.ledger.list_by_member("m-6").await.unwrap().is_empty());
    // The counter reservation was released.
    let stored = fx.catalog.get("p-6").await.unwrap().unwrap();
    assert_eq!(stored.current_redemptions, 0);
}

#[tokio::test]
async fn test_transient_ledger_failure_is_retried() {
    let fx = fixture();
    member(&fx, "m-7", MemberTier::Bronze, 0.0, 100.0).await;
    fx.catalog
        .upsert(&perk("p-7", "%20", Some(1000.0), 100))
        .await
        .unwrap();

    // One failure, fewer than the retry budget: the redemption succeeds.
    fx.ledger.fail_next_appends(1);
    let outcome = fx.engine.redeem("m-7", "p-7").await.unwrap();
    assert_eq!(fx.ledger.list_by_member("m-7").await.unwrap().len(), 1);
    assert_eq!(outcome.profile.total_spent, 1000.0);
}

#[tokio::test]
async fn test_sold_out_perk_is_rejected() {
    let fx = fixture();
    member(&fx, "m-8", MemberTier::Bronze, 0.0, 100.0).await;
    let mut sold_out = perk("p-8", "%20", Some(1000.0), 5);
    sold_out.current_redemptions = 5;
    fx.catalog.upsert(&sold_out).await.unwrap();

    let err = fx.engine.redeem("m-8", "p-8").await.unwrap_err();
    assert!(matches!(err, VantaError::PerkSoldOut { .. }));
    assert!(fx.ledger.list_by_member("m-8").await.unwrap().is_empty());
    let stored = fx.catalog.get("p-8").await.unwrap().unwrap();
    assert_eq!(stored.current_redemptions, 5);
}

#[tokio::test]
async fn test_monotonicity_across_redemptions() {
    let fx = fixture();
    member(&fx, "m-9", MemberTier::Bronze, 0.0, 100.0).await;
    for (id, price) in [("a", 900.0), ("b", 1500.0), ("c", 3000.0)] {
        fx.catalog
            .upsert(&perk(id, "%10", Some(price), 100))
            .await
            .unwrap();
    }

    let mut last = fx.profiles.get("m-9").await.unwrap().unwrap();
    for id in ["a", "b", "c"] {
        let outcome = fx.engine.redeem("m-9", id).await.unwrap();
        assert!(outcome.profile.total_spent >= last.total_spent);
        assert!(outcome.profile.balance >= last.balance);
        assert!(outcome.profile.tier >= last.tier);
        last = outcome.profile;
    }
    assert_eq!(last.total_spent, 5400.0);
    assert_eq!(last.tier, MemberTier::Gold);
}

#[tokio::test]
async fn test_provisioning_seeds_once() {
    let fx = fixture();
    let hints = ProvisioningHints {
        full_name: Some("Ada Usta".to_string()),
        email: Some("ada@example.com".to_string()),
        company_name: None,
    };

    let first = fx
        .engine
        .get_or_create_profile("auth-1", &hints)
        .await
        .unwrap();
    assert_eq!(first.tier, MemberTier::Bronze);
    assert_eq!(first.balance, 100.0);
    assert_eq!(first.total_spent, 0.0);
    assert_eq!(first.full_name, "Ada Usta");

    let second = fx
        .engine
        .get_or_create_profile("auth-1", &ProvisioningHints::default())
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reconcile_applies_ledgered_but_unapplied_spend() {
    let fx = fixture();
    member(&fx, "m-10", MemberTier::Bronze, 1000.0, 100.0).await;
    let earlier = perk("p-9", "%10", Some(1000.0), 100);
    let target = perk("p-10", "%20", Some(1500.0), 100);
    fx.catalog.upsert(&earlier).await.unwrap();
    fx.catalog.upsert(&target).await.unwrap();

    // The applied history behind the profile's 1000 spent.
    let applied = PurchaseRecord::confirmed("m-10", &earlier, 1000.0, 100.0);
    fx.ledger.append(&applied).await.unwrap();
    // Simulate the crash window: this charge reached the ledger but the
    // profile update never happened.
    let orphan = PurchaseRecord::confirmed("m-10", &target, 1500.0, 300.0);
    fx.ledger.append(&orphan).await.unwrap();

    let repaired = fx.engine.reconcile("m-10").await.unwrap().unwrap();
    assert_eq!(repaired.total_spent, 2500.0);
    assert_eq!(repaired.tier, MemberTier::Silver);
    assert!((repaired.balance - 400.0).abs() < 1e-9);

    // Second pass: stores agree, nothing to repair.
    assert!(fx.engine.reconcile("m-10").await.unwrap().is_none());
}

#[tokio::test]
async fn test_reconcile_unknown_member_is_noop() {
    let fx = fixture();
    assert!(fx.engine.reconcile("ghost").await.unwrap().is_none());
}
