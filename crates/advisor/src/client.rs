//! HTTP client for the hosted generative-language API, plus the disabled
//! fallback used when no API key is configured.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vanta_core::config::AdvisorConfig;
use vanta_core::member::MemberProfile;
use vanta_core::{VantaError, VantaResult};

use crate::{prompt, Advisor, PerkMatch, PerkSummary};

// ─── Wire Types ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
    }
}

#[derive(Deserialize)]
struct MatchEnvelope {
    #[serde(default)]
    matches: Vec<PerkMatch>,
}

// ─── Generative Advisor ─────────────────────────────────────────────────────

/// Advisor backed by the hosted generative-language API.
pub struct GenerativeAdvisor {
    http: reqwest::Client,
    config: AdvisorConfig,
}

impl GenerativeAdvisor {
    pub fn new(config: &AdvisorConfig) -> VantaResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.timeout_ms.min(3_000)))
            .build()
            .map_err(|e| VantaError::Config(format!("advisor http client: {e}")))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    async fn generate(
        &self,
        model: &str,
        text: String,
        generation_config: Option<GenerationConfig>,
    ) -> anyhow::Result<String> {
        let url = format!("{}/models/{}:generateContent", self.config.api_base, model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
            generation_config,
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .first_text()
            .ok_or_else(|| anyhow!("model returned no candidates"))
    }

    fn degraded(op: &'static str, error: &dyn std::fmt::Display) {
        metrics::counter!("advisor.degraded", "op" => op).increment(1);
        warn!(op, error = %error, "Advisor call degraded to fallback");
    }
}

#[async_trait]
impl Advisor for GenerativeAdvisor {
    async fn rank_perks(&self, profile: &MemberProfile, perks: &[PerkSummary]) -> Vec<PerkMatch> {
        if perks.is_empty() {
            return Vec::new();
        }
        let generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: prompt::matching_schema(),
        });
        let text = prompt::smart_matching(profile, perks);
        match self
            .generate(&self.config.match_model, text, generation_config)
            .await
        {
            Ok(raw) => match serde_json::from_str::<MatchEnvelope>(&raw) {
                Ok(envelope) => {
                    metrics::counter!("advisor.rankings").increment(1);
                    envelope.matches
                }
                Err(e) => {
                    Self::degraded("rank_perks", &e);
                    Vec::new()
                }
            },
            Err(e) => {
                Self::degraded("rank_perks", &e);
                Vec::new()
            }
        }
    }

    async fn chat_reply(&self, message: &str, profile: &MemberProfile) -> String {
        let text = prompt::chat(message, profile);
        match self.generate(&self.config.chat_model, text, None).await {
            Ok(reply) => reply,
            Err(e) => {
                Self::degraded("chat_reply", &e);
                prompt::CHAT_FALLBACK.to_string()
            }
        }
    }

    async fn trend_insights(&self, rows: &serde_json::Value) -> String {
        let text = prompt::trends(rows);
        match self.generate(&self.config.match_model, text, None).await {
            Ok(insight) => insight,
            Err(e) => {
                Self::degraded("trend_insights", &e);
                prompt::TREND_FALLBACK.to_string()
            }
        }
    }
}

// ─── Disabled Advisor ───────────────────────────────────────────────────────

/// Advisor used when no API key is configured: instant fallbacks, no
/// network.
#[derive(Default)]
pub struct DisabledAdvisor;

#[async_trait]
impl Advisor for DisabledAdvisor {
    async fn rank_perks(&self, _profile: &MemberProfile, _perks: &[PerkSummary]) -> Vec<PerkMatch> {
        debug!("Advisor disabled, returning no recommendations");
        Vec::new()
    }

    async fn chat_reply(&self, _message: &str, _profile: &MemberProfile) -> String {
        prompt::CHAT_FALLBACK.to_string()
    }

    async fn trend_insights(&self, _rows: &serde_json::Value) -> String {
        prompt::TREND_FALLBACK.to_string()
    }
}
