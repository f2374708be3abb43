//! Perk catalog domain types — offers, tagged discount values, and the
//! admin request shapes that create and edit them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Offer Types ────────────────────────────────────────────────────────────

/// Offer flavor shown in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Cashback,
    Coupon,
    Deal,
    Giftcard,
    Trial,
}

// ─── Discount Value ─────────────────────────────────────────────────────────

/// Discount semantics, decided once when a perk enters the catalog.
///
/// The display string stays on the perk for rendering; pricing math reads
/// this tag instead of re-parsing the string on every redemption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PerkValue {
    /// "%20" — a percentage discount.
    Percent(f64),
    /// "150 TL" — a fixed currency amount.
    FixedAmount(f64),
    /// "1000 MİL" — a mileage bonus.
    Miles(f64),
    /// "BEDAVA" or any value with no digits at all.
    Free,
}

impl PerkValue {
    /// Classify a display value string.
    pub fn classify(display: &str) -> Self {
        let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return PerkValue::Free;
        }
        let n: f64 = digits.parse().unwrap_or(0.0);
        let upper = display.to_uppercase();
        if display.contains('%') {
            PerkValue::Percent(n)
        } else if upper.contains("MİL") || upper.contains("MIL") {
            PerkValue::Miles(n)
        } else {
            PerkValue::FixedAmount(n)
        }
    }

    /// Earning rate for this value.
    ///
    /// FixedAmount and Miles reproduce the digit-stripping arithmetic the
    /// catalog has always used, so "1000 MİL" yields a 10.0 rate and
    /// "150 TL" a 1.5 rate. That distortion is intentionally unchanged
    /// pending a pricing decision (see DESIGN.md); fixing it later is a
    /// one-arm edit here.
    pub fn rate(&self, default_rate: f64) -> f64 {
        match self {
            PerkValue::Percent(n) | PerkValue::FixedAmount(n) | PerkValue::Miles(n) => n / 100.0,
            PerkValue::Free => default_rate,
        }
    }
}

// ─── Perk ───────────────────────────────────────────────────────────────────

/// A catalog entry: a purchasable or redeemable discount/benefit offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub id: String,
    pub supplier_name: String,
    pub title: String,
    pub description: String,
    pub offer_type: OfferType,
    /// Display string for the discount ("%20", "150 TL", "BEDAVA").
    pub value: String,
    /// Tagged semantics of `value`, fixed at catalog-entry time.
    pub value_kind: PerkValue,
    pub original_price: Option<f64>,
    pub discounted_price: Option<f64>,
    pub category: String,
    pub valid_until: NaiveDate,
    pub redemption_limit: u32,
    pub current_redemptions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Perk {
    /// Remaining redemption slots.
    pub fn remaining_redemptions(&self) -> u32 {
        self.redemption_limit.saturating_sub(self.current_redemptions)
    }

    /// Build a new catalog entry from an admin create request.
    pub fn from_create(req: CreatePerkRequest) -> Self {
        let value_kind = PerkValue::classify(&req.value);
        Self {
            id: Uuid::new_v4().to_string(),
            supplier_name: req.supplier_name,
            title: req.title,
            description: req.description,
            offer_type: req.offer_type,
            value: req.value,
            value_kind,
            original_price: req.original_price,
            discounted_price: req.discounted_price,
            category: req.category,
            valid_until: req.valid_until,
            redemption_limit: req.redemption_limit,
            current_redemptions: 0,
            rating: req.rating,
            location: req.location,
            image_url: req.image_url,
        }
    }

    /// Apply an admin edit. A changed display value is reclassified so the
    /// tag never drifts from the string.
    pub fn apply_update(&mut self, req: UpdatePerkRequest) {
        if let Some(supplier_name) = req.supplier_name {
            self.supplier_name = supplier_name;
        }
        if let Some(title) = req.title {
            self.title = title;
        }
        if let Some(description) = req.description {
            self.description = description;
        }
        if let Some(offer_type) = req.offer_type {
            self.offer_type = offer_type;
        }
        if let Some(value) = req.value {
            self.value_kind = PerkValue::classify(&value);
            self.value = value;
        }
        if let Some(original_price) = req.original_price {
            self.original_price = Some(original_price);
        }
        if let Some(discounted_price) = req.discounted_price {
            self.discounted_price = Some(discounted_price);
        }
        if let Some(category) = req.category {
            self.category = category;
        }
        if let Some(valid_until) = req.valid_until {
            self.valid_until = valid_until;
        }
        if let Some(redemption_limit) = req.redemption_limit {
            self.redemption_limit = redemption_limit;
        }
        if let Some(rating) = req.rating {
            self.rating = Some(rating);
        }
        if let Some(location) = req.location {
            self.location = Some(location);
        }
        if let Some(image_url) = req.image_url {
            self.image_url = Some(image_url);
        }
    }
}

// ─── Admin Request Shapes ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerkRequest {
    pub supplier_name: String,
    pub title: String,
    pub description: String,
    pub offer_type: OfferType,
    pub value: String,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub category: String,
    pub valid_until: NaiveDate,
    pub redemption_limit: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerkRequest {
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub offer_type: Option<OfferType>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub redemption_limit: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
