//! Redemption & tier-progression engine: converts a perk redemption into
//! spend, wallet earnings, and tier transitions, and owns the
//! catalog/profile consistency rules around it.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};
use vanta_core::config::EngineConfig;
use vanta_core::member::{MemberProfile, MemberTier, ProvisioningHints};
use vanta_core::perk::Perk;
use vanta_core::purchase::{PurchaseRecord, PurchaseStatus};
use vanta_core::{VantaError, VantaResult};
use vanta_store::{PerkCatalog, ProfileStore, PurchaseLedger};

/// Float tolerance when comparing cumulative currency amounts.
const DRIFT_EPSILON: f64 = 1e-6;

/// Pricing quote for redeeming one perk at one tier. Pure output of
/// [`RedemptionEngine::quote`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionQuote {
    /// Price charged.
    pub amount: f64,
    /// Earning rate derived from the perk's value.
    pub rate: f64,
    /// Tier bonus applied on top of the rate.
    pub bonus_multiplier: f64,
    /// Reward credited, full precision.
    pub earnings: f64,
}

impl RedemptionQuote {
    /// Earnings rounded to 2 decimals, for display only.
    pub fn earnings_display(&self) -> f64 {
        (self.earnings * 100.0).round() / 100.0
    }
}

/// Result of an applied redemption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionOutcome {
    pub profile: MemberProfile,
    pub record: PurchaseRecord,
    pub quote: RedemptionQuote,
    pub tier_changed: bool,
}

/// Redemption engine — stateless computation over profile and perk data,
/// plus the two sequential collaborator calls (ledger append, profile
/// update) that make a redemption durable.
pub struct RedemptionEngine {
    config: EngineConfig,
    profiles: Arc<dyn ProfileStore>,
    catalog: Arc<dyn PerkCatalog>,
    ledger: Arc<dyn PurchaseLedger>,
}

impl RedemptionEngine {
    pub fn new(
        config: &EngineConfig,
        profiles: Arc<dyn ProfileStore>,
        catalog: Arc<dyn PerkCatalog>,
        ledger: Arc<dyn PurchaseLedger>,
    ) -> Self {
        info!(
            silver = config.silver_threshold,
            gold = config.gold_threshold,
            fallback_amount = config.fallback_amount,
            "Redemption engine initialized"
        );
        Self {
            config: config.clone(),
            profiles,
            catalog,
            ledger,
        }
    }

    /// Tier as a pure function of cumulative spend. Total and monotonic;
    /// no hysteresis.
    pub fn classify_tier(&self, total_spent: f64) -> MemberTier {
        if total_spent >= self.config.gold_threshold {
            MemberTier::Gold
        } else if total_spent >= self.config.silver_threshold {
            MemberTier::Silver
        } else {
            MemberTier::Bronze
        }
    }

    /// Price and earnings for redeeming `perk` at `tier`. Pure and
    /// deterministic.
    pub fn quote(&self, perk: &Perk, tier: MemberTier) -> RedemptionQuote {
        // A zero price means the perk has no explicit pricing (mileage or
        // percent-only offers) and charges the policy fallback.
        let amount = perk
            .discounted_price
            .filter(|p| *p > 0.0)
            .unwrap_or(self.config.fallback_amount);
        let rate = perk.value_kind.rate(self.config.default_rate);
        let bonus_multiplier = tier.bonus_multiplier();
        RedemptionQuote {
            amount,
            rate,
            bonus_multiplier,
            earnings: amount * rate * bonus_multiplier,
        }
    }

    /// Redeem one perk for one member.
    ///
    /// State machine per attempt: Initiated → (validation, quote, counter
    /// reservation) → Ledgered → Applied, or Rejected with no profile
    /// mutation. The ledger append and the profile update are two separate
    /// store calls with no cross-store transaction; a failure between them
    /// is the accepted ledgered-but-not-applied window that
    /// [`Self::reconcile`] repairs.
    pub async fn redeem(&self, member_id: &str, perk_id: &str) -> VantaResult<RedemptionOutcome> {
        if member_id.trim().is_empty() {
            return Err(VantaError::AuthenticationRequired);
        }
        let profile = self
            .profiles
            .get(member_id)
            .await?
            .ok_or(VantaError::AuthenticationRequired)?;
        let perk = self
            .catalog
            .get(perk_id)
            .await?
            .ok_or_else(|| VantaError::PerkUnavailable {
                perk_id: perk_id.to_string(),
            })?;

        let quote = self.quote(&perk, profile.tier);

        if !self.catalog.try_reserve_redemption(perk_id).await? {
            metrics::counter!("redemption.sold_out").increment(1);
            return Err(VantaError::PerkSoldOut {
                perk_id: perk_id.to_string(),
            });
        }

        // The record id is generated here, once, and reused across append
        // retries — the ledger dedupes on it.
        let record = PurchaseRecord::confirmed(member_id, &perk, quote.amount, quote.earnings);

        if let Err(e) = self.append_with_retry(&record).await {
            if let Err(release_err) = self.catalog.release_redemption(perk_id).await {
                warn!(perk_id, error = %release_err, "Failed to release redemption slot");
            }
            metrics::counter!("redemption.rejected").increment(1);
            warn!(member_id, perk_id, error = %e, "Redemption rejected: ledger append failed");
            return Err(VantaError::LedgerWriteFailed(e.to_string()));
        }

        let (updated, tier_changed) = self.apply_quote(&profile, &quote);

        if let Err(e) = self.profiles.update(member_id, &updated).await {
            // Ledgered but not applied: the charge is durable, the profile
            // stays stale until the next reconcile pass.
            metrics::counter!("redemption.profile_write_failed").increment(1);
            warn!(
                member_id,
                record_id = %record.id,
                error = %e,
                "Profile update failed after ledger append"
            );
            return Err(VantaError::ProfileWriteFailed(e.to_string()));
        }

        metrics::counter!("redemption.applied").increment(1);
        if tier_changed {
            metrics::counter!("redemption.tier_upgrades").increment(1);
            info!(
                member_id,
                old_tier = ?profile.tier,
                new_tier = ?updated.tier,
                total_spent = updated.total_spent,
                "Tier upgrade"
            );
        }
        debug!(
            member_id,
            perk_id,
            amount = quote.amount,
            earnings = quote.earnings,
            balance = updated.balance,
            "Redemption applied"
        );

        Ok(RedemptionOutcome {
            profile: updated,
            record,
            quote,
            tier_changed,
        })
    }

    /// Fold a quote into a profile. `total_spent` and `balance` only grow;
    /// the tier is reclassified from the new cumulative spend.
    fn apply_quote(&self, profile: &MemberProfile, quote: &RedemptionQuote) -> (MemberProfile, bool) {
        let mut updated = profile.clone();
        updated.total_spent += quote.amount;
        updated.balance += quote.earnings;
        updated.tier = self.classify_tier(updated.total_spent);
        let tier_changed = updated.tier != profile.tier;
        (updated, tier_changed)
    }

    /// Bounded, jittered retry around the ledger append. Every attempt
    /// carries the same record, so duplicates collapse at the store.
    async fn append_with_retry(&self, record: &PurchaseRecord) -> VantaResult<()> {
        let mut attempt = 0u32;
        loop {
            match self.ledger.append(record).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.config.ledger_max_retries.max(1) {
                        return Err(e);
                    }
                    let base = self.config.ledger_retry_base_ms << (attempt - 1);
                    let jitter = rand::thread_rng().gen_range(0..=base / 2);
                    warn!(
                        record_id = %record.id,
                        attempt,
                        error = %e,
                        "Ledger append failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(base + jitter)).await;
                }
            }
        }
    }

    /// Fetch a member's profile, provisioning the seed profile (Bronze,
    /// seed balance, zero spend) on first authentication.
    pub async fn get_or_create_profile(
        &self,
        member_id: &str,
        hints: &ProvisioningHints,
    ) -> VantaResult<MemberProfile> {
        if member_id.trim().is_empty() {
            return Err(VantaError::AuthenticationRequired);
        }
        if let Some(profile) = self.profiles.get(member_id).await? {
            return Ok(profile);
        }
        let profile = MemberProfile::provisioned(member_id, hints, self.config.seed_balance);
        self.profiles.insert(&profile).await?;
        metrics::counter!("profile.provisioned").increment(1);
        info!(member_id, balance = profile.balance, "Provisioned new member profile");
        Ok(profile)
    }

    /// Repair the ledgered-but-not-applied window: recompute confirmed
    /// spend from the ledger and fold any unapplied records into the
    /// profile. Returns the repaired profile, or None when the stores
    /// already agree (or the member is unknown).
    pub async fn reconcile(&self, member_id: &str) -> VantaResult<Option<MemberProfile>> {
        let Some(profile) = self.profiles.get(member_id).await? else {
            return Ok(None);
        };
        let purchases = self.ledger.list_by_member(member_id).await?;
        let confirmed: Vec<&PurchaseRecord> = purchases
            .iter()
            .filter(|p| p.status == PurchaseStatus::Confirmed)
            .collect();
        let ledger_spent: f64 = confirmed.iter().map(|p| p.amount).sum();
        let drift = ledger_spent - profile.total_spent;
        if drift <= DRIFT_EPSILON {
            return Ok(None);
        }

        // Attribute the drift to the most recent records (the list is
        // newest first) and credit their earnings.
        let mut remaining = drift;
        let mut missing_earnings = 0.0;
        for record in &confirmed {
            if remaining <= DRIFT_EPSILON {
                break;
            }
            remaining -= record.amount;
            missing_earnings += record.earnings;
        }

        let mut updated = profile.clone();
        updated.total_spent = ledger_spent;
        updated.balance += missing_earnings;
        updated.tier = self.classify_tier(updated.total_spent);
        self.profiles.update(member_id, &updated).await?;

        metrics::counter!("redemption.reconciled").increment(1);
        info!(
            member_id,
            drift,
            credited = missing_earnings,
            old_tier = ?profile.tier,
            new_tier = ?updated.tier,
            "Reconciled ledgered-but-unapplied spend"
        );
        Ok(Some(updated))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
