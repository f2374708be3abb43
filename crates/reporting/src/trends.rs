//! Per-sector usage rows — the input to the advisor's trend analysis.

use std::collections::HashMap;

use serde::Serialize;
use vanta_core::member::MemberProfile;
use vanta_core::perk::Perk;
use vanta_core::purchase::{PurchaseRecord, PurchaseStatus};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorUsage {
    pub sector: String,
    pub category: String,
    pub redemptions: usize,
    pub spend: f64,
}

/// Group confirmed redemptions by (member sector, perk category), busiest
/// pairs first. Members without a profile and perks no longer in the
/// catalog land in "Unknown"/"Other" rather than being dropped.
pub fn sector_trends(
    purchases: &[PurchaseRecord],
    perks: &[Perk],
    profiles: &[MemberProfile],
) -> Vec<SectorUsage> {
    let perk_by_id: HashMap<&str, &Perk> = perks.iter().map(|p| (p.id.as_str(), p)).collect();
    let sector_by_member: HashMap<&str, &str> = profiles
        .iter()
        .map(|p| (p.member_id.as_str(), p.sector.as_str()))
        .collect();

    let mut grouped: HashMap<(String, String), (usize, f64)> = HashMap::new();
    for purchase in purchases
        .iter()
        .filter(|p| p.status == PurchaseStatus::Confirmed)
    {
        let sector = sector_by_member
            .get(purchase.member_id.as_str())
            .copied()
            .unwrap_or("Unknown");
        let category = perk_by_id
            .get(purchase.perk_id.as_str())
            .map(|perk| perk.category.as_str())
            .unwrap_or("Other");
        let entry = grouped
            .entry((sector.to_string(), category.to_string()))
            .or_default();
        entry.0 += 1;
        entry.1 += purchase.amount;
    }

    let mut rows: Vec<SectorUsage> = grouped
        .into_iter()
        .map(|((sector, category), (redemptions, spend))| SectorUsage {
            sector,
            category,
            redemptions,
            spend,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.redemptions
            .cmp(&a.redemptions)
            .then_with(|| a.sector.cmp(&b.sector))
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use vanta_core::member::ProvisioningHints;
    use vanta_core::perk::{CreatePerkRequest, OfferType};

    fn perk(id: &str, category: &str) -> Perk {
        let mut perk = Perk::from_create(CreatePerkRequest {
            supplier_name: "Supplier".to_string(),
            title: format!("Offer {id}"),
            description: String::new(),
            offer_type: OfferType::Deal,
            value: "%10".to_string(),
            original_price: None,
            discounted_price: Some(100.0),
            category: category.to_string(),
            valid_until: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            redemption_limit: 100,
            rating: None,
            location: None,
            image_url: None,
        });
        perk.id = id.to_string();
        perk
    }

    fn member(id: &str, sector: &str) -> MemberProfile {
        let mut profile = MemberProfile::provisioned(id, &ProvisioningHints::default(), 100.0);
        profile.sector = sector.to_string();
        profile
    }

    #[test]
    fn test_trends_group_by_sector_and_category() {
        let dining = perk("f-1", "Dining");
        let fitness = perk("s-1", "Fitness");
        let perks = vec![dining.clone(), fitness.clone()];
        let profiles = vec![member("m-1", "Finance"), member("m-2", "Technology")];
        let purchases = vec![
            PurchaseRecord::confirmed("m-1", &dining, 100.0, 10.0),
            PurchaseRecord::confirmed("m-1", &dining, 100.0, 10.0),
            PurchaseRecord::confirmed("m-2", &fitness, 200.0, 20.0),
        ];

        let rows = sector_trends(&purchases, &perks, &profiles);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sector, "Finance");
        assert_eq!(rows[0].category, "Dining");
        assert_eq!(rows[0].redemptions, 2);
        assert!((rows[0].spend - 200.0).abs() < 1e-9);
        assert_eq!(rows[1].sector, "Technology");
    }

    #[test]
    fn test_trends_tolerate_missing_references() {
        let ghost = perk("gone", "Dining");
        let purchases = vec![PurchaseRecord::confirmed("stranger", &ghost, 100.0, 10.0)];

        let rows = sector_trends(&purchases, &[], &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sector, "Unknown");
        assert_eq!(rows[0].category, "Other");
    }
}
