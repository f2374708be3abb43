//! Demo catalog used by the admin seed endpoint and by tests.

use chrono::NaiveDate;
use tracing::info;
use vanta_core::perk::{OfferType, Perk, PerkValue};
use vanta_core::VantaResult;

use crate::PerkCatalog;

struct SeedPerk {
    id: &'static str,
    supplier_name: &'static str,
    title: &'static str,
    description: &'static str,
    offer_type: OfferType,
    value: &'static str,
    original_price: f64,
    discounted_price: f64,
    category: &'static str,
    redemption_limit: u32,
    current_redemptions: u32,
    rating: f64,
    location: &'static str,
}

const SEED_PERKS: &[SeedPerk] = &[
    SeedPerk {
        id: "f-1",
        supplier_name: "Burger Lab",
        title: "Gourmet Menu Deal",
        description: "20% instant discount at every branch.",
        offer_type: OfferType::Deal,
        value: "%20",
        original_price: 450.0,
        discounted_price: 360.0,
        category: "Dining",
        redemption_limit: 500,
        current_redemptions: 42,
        rating: 4.8,
        location: "Istanbul",
    },
    SeedPerk {
        id: "f-2",
        supplier_name: "Starbucks",
        title: "Second Coffee Half Price",
        description: "With a member-only code.",
        offer_type: OfferType::Deal,
        value: "%50",
        original_price: 120.0,
        discounted_price: 60.0,
        category: "Dining",
        redemption_limit: 1000,
        current_redemptions: 156,
        rating: 4.7,
        location: "Nationwide",
    },
    SeedPerk {
        id: "f-3",
        supplier_name: "Pizza Locale",
        title: "Weekend Buy One Get One",
        description: "Valid on selected medium pizzas.",
        offer_type: OfferType::Deal,
        value: "BEDAVA",
        original_price: 800.0,
        discounted_price: 400.0,
        category: "Dining",
        redemption_limit: 300,
        current_redemptions: 89,
        rating: 4.9,
        location: "Izmir & Istanbul",
    },
    SeedPerk {
        id: "s-1",
        supplier_name: "MacFit",
        title: "6-Month Gold Membership",
        description: "Unlimited access across all clubs.",
        offer_type: OfferType::Deal,
        value: "%30",
        original_price: 9000.0,
        discounted_price: 6300.0,
        category: "Fitness",
        redemption_limit: 100,
        current_redemptions: 23,
        rating: 4.5,
        location: "Nationwide",
    },
    SeedPerk {
        id: "s-3",
        supplier_name: "Decathlon",
        title: "150 TL Discount Voucher",
        description: "On purchases of 750 TL and above.",
        offer_type: OfferType::Coupon,
        value: "150 TL",
        original_price: 750.0,
        discounted_price: 600.0,
        category: "Fitness",
        redemption_limit: 1000,
        current_redemptions: 412,
        rating: 4.7,
        location: "Online",
    },
    SeedPerk {
        id: "h-1",
        supplier_name: "Medicana",
        title: "Comprehensive Check-up",
        description: "Full health screening for your age group.",
        offer_type: OfferType::Deal,
        value: "%20",
        original_price: 8000.0,
        discounted_price: 6400.0,
        category: "Health",
        redemption_limit: 40,
        current_redemptions: 8,
        rating: 4.6,
        location: "Ankara & Istanbul",
    },
    SeedPerk {
        id: "e-1",
        supplier_name: "Udemy",
        title: "Software & AI Courses",
        description: "Member code valid on all courses.",
        offer_type: OfferType::Coupon,
        value: "%40",
        original_price: 600.0,
        discounted_price: 360.0,
        category: "Education",
        redemption_limit: 500,
        current_redemptions: 211,
        rating: 4.8,
        location: "Online",
    },
    SeedPerk {
        id: "t-4",
        supplier_name: "Trendyol Tech",
        title: "Electronics Discount Code",
        description: "Valid on all small appliances.",
        offer_type: OfferType::Coupon,
        value: "250 TL",
        original_price: 3000.0,
        discounted_price: 2750.0,
        category: "Technology",
        redemption_limit: 1000,
        current_redemptions: 742,
        rating: 4.4,
        location: "Online",
    },
    SeedPerk {
        id: "ev-2",
        supplier_name: "Biletix",
        title: "Open-Air Concerts",
        description: "Instant 10% on selected events.",
        offer_type: OfferType::Coupon,
        value: "%10",
        original_price: 1500.0,
        discounted_price: 1350.0,
        category: "Events",
        redemption_limit: 1000,
        current_redemptions: 890,
        rating: 4.2,
        location: "Nationwide",
    },
    SeedPerk {
        id: "tr-2",
        supplier_name: "THY",
        title: "Flight Miles Bonus",
        description: "1000 extra miles on ticket purchases.",
        offer_type: OfferType::Deal,
        value: "1000 MİL",
        original_price: 0.0,
        discounted_price: 0.0,
        category: "Travel",
        redemption_limit: 500,
        current_redemptions: 211,
        rating: 4.9,
        location: "Global",
    },
    SeedPerk {
        id: "tr-4",
        supplier_name: "Booking.com",
        title: "Cashback Advantage",
        description: "10% of the reservation total refunded.",
        offer_type: OfferType::Cashback,
        value: "%10",
        original_price: 8000.0,
        discounted_price: 7200.0,
        category: "Travel",
        redemption_limit: 1000,
        current_redemptions: 567,
        rating: 4.7,
        location: "Global",
    },
    SeedPerk {
        id: "sp-1",
        supplier_name: "Deep Relax Spa",
        title: "Thai Massage Package",
        description: "A 60-minute deep relaxation session.",
        offer_type: OfferType::Deal,
        value: "%35",
        original_price: 1800.0,
        discounted_price: 1170.0,
        category: "Spa",
        redemption_limit: 60,
        current_redemptions: 12,
        rating: 4.9,
        location: "Besiktas",
    },
];

/// The demo perk catalog. Prices of zero mean the offer has no explicit
/// pricing (mileage/percent-only perks) and redeem at the engine's
/// fallback amount.
pub fn demo_perks() -> Vec<Perk> {
    let valid_until = NaiveDate::from_ymd_opt(2026, 12, 31).expect("static date");
    SEED_PERKS
        .iter()
        .map(|seed| Perk {
            id: seed.id.to_string(),
            supplier_name: seed.supplier_name.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            offer_type: seed.offer_type,
            value: seed.value.to_string(),
            value_kind: PerkValue::classify(seed.value),
            original_price: (seed.original_price > 0.0).then_some(seed.original_price),
            discounted_price: (seed.discounted_price > 0.0).then_some(seed.discounted_price),
            category: seed.category.to_string(),
            valid_until,
            redemption_limit: seed.redemption_limit,
            current_redemptions: seed.current_redemptions,
            rating: Some(seed.rating),
            location: Some(seed.location.to_string()),
            image_url: None,
        })
        .collect()
}

/// Upsert the demo catalog into `catalog`. Returns how many perks were
/// written.
pub async fn seed_catalog(catalog: &dyn PerkCatalog) -> VantaResult<usize> {
    let perks = demo_perks();
    for perk in &perks {
        catalog.upsert(perk).await?;
    }
    info!(count = perks.len(), "Demo catalog seeded");
    Ok(perks.len())
}
