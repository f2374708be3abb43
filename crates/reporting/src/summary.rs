//! Employer usage summary: totals, category shares, and daily activity.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use vanta_core::member::MemberProfile;
use vanta_core::perk::Perk;
use vanta_core::purchase::{PurchaseRecord, PurchaseStatus};

/// Category assigned to purchases whose perk has since been removed from
/// the catalog.
const ORPHAN_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerSummary {
    /// Members with a profile.
    pub members: usize,
    /// Members with at least one confirmed redemption.
    pub active_members: usize,
    pub total_redemptions: usize,
    pub total_spend: f64,
    /// Reward currency credited to wallets.
    pub total_earnings: f64,
    /// Original minus discounted price, summed over redeemed perks that
    /// still carry both prices.
    pub total_savings: f64,
    pub categories: Vec<CategoryShare>,
    /// Trailing week including today, oldest day first.
    pub daily_usage: Vec<DailyUsage>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub redemptions: usize,
    pub spend: f64,
    /// Fraction of all redemptions, in [0, 1].
    pub share: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub redemptions: usize,
}

/// Aggregate the employer view for a given day. Perk references on
/// purchases are weak: records whose perk was deleted fall into the
/// "Other" category and contribute no savings.
pub fn employer_summary(
    purchases: &[PurchaseRecord],
    perks: &[Perk],
    profiles: &[MemberProfile],
    today: NaiveDate,
) -> EmployerSummary {
    let perk_by_id: HashMap<&str, &Perk> = perks.iter().map(|p| (p.id.as_str(), p)).collect();
    let confirmed: Vec<&PurchaseRecord> = purchases
        .iter()
        .filter(|p| p.status == PurchaseStatus::Confirmed)
        .collect();

    let mut active: Vec<&str> = confirmed.iter().map(|p| p.member_id.as_str()).collect();
    active.sort_unstable();
    active.dedup();

    let total_spend: f64 = confirmed.iter().map(|p| p.amount).sum();
    let total_earnings: f64 = confirmed.iter().map(|p| p.earnings).sum();
    let total_savings: f64 = confirmed
        .iter()
        .filter_map(|p| perk_by_id.get(p.perk_id.as_str()))
        .filter_map(|perk| match (perk.original_price, perk.discounted_price) {
            (Some(original), Some(discounted)) if original > discounted => {
                Some(original - discounted)
            }
            _ => None,
        })
        .sum();

    let mut by_category: HashMap<&str, (usize, f64)> = HashMap::new();
    for purchase in &confirmed {
        let category = perk_by_id
            .get(purchase.perk_id.as_str())
            .map(|perk| perk.category.as_str())
            .unwrap_or(ORPHAN_CATEGORY);
        let entry = by_category.entry(category).or_default();
        entry.0 += 1;
        entry.1 += purchase.amount;
    }
    let mut categories: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, (redemptions, spend))| CategoryShare {
            category: category.to_string(),
            redemptions,
            spend,
            share: if confirmed.is_empty() {
                0.0
            } else {
                redemptions as f64 / confirmed.len() as f64
            },
        })
        .collect();
    categories.sort_by(|a, b| b.redemptions.cmp(&a.redemptions));

    let daily_usage = (0..7)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            DailyUsage {
                date,
                redemptions: confirmed
                    .iter()
                    .filter(|p| p.purchase_date.date_naive() == date)
                    .count(),
            }
        })
        .collect();

    tracing::debug!(
        redemptions = confirmed.len(),
        members = profiles.len(),
        total_spend,
        "Employer summary computed"
    );

    EmployerSummary {
        members: profiles.len(),
        active_members: active.len(),
        total_redemptions: confirmed.len(),
        total_spend,
        total_earnings,
        total_savings,
        categories,
        daily_usage,
    }
}
