//! Prompt assembly and fallback copy for the generative advisor.

use serde_json::json;
use vanta_core::member::MemberProfile;

use crate::PerkSummary;

/// Reply used whenever the chat model is unreachable or misbehaves.
pub const CHAT_FALLBACK: &str = "We can't answer right now, please try again later.";

/// Insight used whenever the trend analysis call degrades.
pub const TREND_FALLBACK: &str = "Sector trends cannot be analyzed at the moment.";

/// Ranking prompt: member context plus the catalog slice, asking for the
/// three best-suited perks with reasons.
pub fn smart_matching(profile: &MemberProfile, perks: &[PerkSummary]) -> String {
    let catalog = serde_json::to_string(perks).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Member profile:\n\
         - Sector: {sector} - Job title: {job_title} - Tier: {tier:?}\n\
         Available perks: {catalog}\n\
         TASK: Pick the 3 perks best suited to this member's {tier:?} tier \
         and profile, and explain why for each.",
        sector = profile.sector,
        job_title = profile.job_title,
        tier = profile.tier,
    )
}

/// JSON response schema for the ranking call, so the model returns
/// `{"matches": [{"perkId", "reason"}]}` and nothing else.
pub fn matching_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "matches": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "perkId": { "type": "string" },
                        "reason": { "type": "string" }
                    },
                    "required": ["perkId", "reason"]
                }
            }
        },
        "required": ["matches"]
    })
}

/// Chat prompt: assistant persona with the member's wallet context.
pub fn chat(message: &str, profile: &MemberProfile) -> String {
    format!(
        "You are the smart assistant of the VANTA perks platform. Member:\n\
         Name: {name}, Tier: {tier:?}, Balance: {balance:.2} TL.\n\
         Member message: \"{message}\"\n\
         Give a short, professional, helpful answer. Highlight the tier \
         bonuses (Silver 5%, Gold 10% extra).",
        name = profile.full_name,
        tier = profile.tier,
        balance = profile.balance,
    )
}

/// Trend analysis prompt over per-sector usage rows.
pub fn trends(rows: &serde_json::Value) -> String {
    format!(
        "Analyze the following per-sector perk usage data and give a 1-2 \
         sentence professional insight. Point out which spend categories \
         stand out in which sectors:\n{rows}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanta_core::member::ProvisioningHints;

    fn profile() -> MemberProfile {
        MemberProfile::provisioned("m-1", &ProvisioningHints::default(), 100.0)
    }

    #[test]
    fn test_matching_prompt_carries_catalog() {
        let perks = vec![PerkSummary {
            id: "f-1".to_string(),
            title: "Gourmet Menu Deal".to_string(),
            category: "Dining".to_string(),
        }];
        let prompt = smart_matching(&profile(), &perks);
        assert!(prompt.contains("Gourmet Menu Deal"));
        assert!(prompt.contains("Bronze"));
        assert!(prompt.contains("Technology"));
    }

    #[test]
    fn test_matching_schema_requires_matches() {
        let schema = matching_schema();
        assert_eq!(schema["required"][0], "matches");
        assert_eq!(
            schema["properties"]["matches"]["items"]["required"][1],
            "reason"
        );
    }

    #[test]
    fn test_chat_prompt_carries_balance() {
        let prompt = chat("How much do I have?", &profile());
        assert!(prompt.contains("100.00 TL"));
        assert!(prompt.contains("How much do I have?"));
    }
}
