//! Advisory generative-language collaborator: perk ranking, chat replies,
//! and trend insights.
//!
//! Advisory by construction: unlike the stores, nothing here returns a
//! `Result`. Every operation has a mandatory timeout and a required
//! fallback value, so a slow or failing model can never block or fail
//! catalog browsing or redemption.

pub mod client;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vanta_core::member::MemberProfile;
use vanta_core::perk::Perk;

pub use client::{DisabledAdvisor, GenerativeAdvisor};

/// A perk the advisor picked for a member, with its justification.
///
/// Advisory-only: callers must filter `perk_id` against the live catalog
/// and silently drop ids the catalog no longer holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkMatch {
    pub perk_id: String,
    pub reason: String,
}

/// The catalog slice the advisor sees when ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkSummary {
    pub id: String,
    pub title: String,
    pub category: String,
}

impl From<&Perk> for PerkSummary {
    fn from(perk: &Perk) -> Self {
        Self {
            id: perk.id.clone(),
            title: perk.title.clone(),
            category: perk.category.clone(),
        }
    }
}

#[async_trait]
pub trait Advisor: Send + Sync {
    /// Ranked perk suggestions for a member. Failure, timeout, or
    /// unparseable model output degrades to an empty list.
    async fn rank_perks(&self, profile: &MemberProfile, perks: &[PerkSummary]) -> Vec<PerkMatch>;

    /// Conversational reply. Failure degrades to a static fallback.
    async fn chat_reply(&self, message: &str, profile: &MemberProfile) -> String;

    /// 1-2 sentence analysis of sectoral usage rows. Failure degrades to a
    /// static fallback.
    async fn trend_insights(&self, rows: &serde_json::Value) -> String;
}
