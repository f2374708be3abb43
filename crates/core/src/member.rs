//! Member domain types — profile, tier, provisioning defaults.

use serde::{Deserialize, Serialize};

// ─── Tier System ────────────────────────────────────────────────────────────

/// Member status tiers, ordered Bronze < Silver < Gold.
///
/// A member's tier is always the pure function of their cumulative spend
/// (see the engine's `classify_tier`); no code path may set a tier that
/// disagrees with `total_spent`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemberTier {
    Bronze,
    Silver,
    Gold,
}

impl MemberTier {
    /// Earnings bonus multiplier applied when a perk is redeemed.
    pub fn bonus_multiplier(&self) -> f64 {
        match self {
            MemberTier::Bronze => 1.00,
            MemberTier::Silver => 1.05,
            MemberTier::Gold => 1.10,
        }
    }
}

impl Default for MemberTier {
    fn default() -> Self {
        MemberTier::Bronze
    }
}

// ─── Member Profile ─────────────────────────────────────────────────────────

/// One profile record per member, keyed by the auth provider's subject id.
///
/// `balance` and `total_spent` are monotonically non-decreasing in this
/// subsystem; both move only through the redemption engine's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub member_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    pub is_first_login: bool,
    pub company_name: String,
    pub sector: String,
    pub job_title: String,
    pub location: String,
    pub tier: MemberTier,
    /// Accumulated spendable reward currency.
    pub balance: f64,
    /// Cumulative amount redeemed across all purchases.
    pub total_spent: f64,
}

impl MemberProfile {
    /// Seed profile created on a member's first authentication.
    pub fn provisioned(member_id: &str, hints: &ProvisioningHints, seed_balance: f64) -> Self {
        Self {
            member_id: member_id.to_string(),
            full_name: hints
                .full_name
                .clone()
                .unwrap_or_else(|| "VANTA Member".to_string()),
            email: hints.email.clone().unwrap_or_default(),
            phone: String::new(),
            is_verified: true,
            is_first_login: true,
            company_name: hints
                .company_name
                .clone()
                .unwrap_or_else(|| "VANTA Demo".to_string()),
            sector: "Technology".to_string(),
            job_title: "Employee".to_string(),
            location: "Istanbul".to_string(),
            tier: MemberTier::Bronze,
            balance: seed_balance,
            total_spent: 0.0,
        }
    }
}

/// Optional identity fields the auth provider supplies on first login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningHints {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
}
