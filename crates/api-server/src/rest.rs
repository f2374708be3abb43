//! REST handlers for the member surface and operational endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use vanta_advisor::{Advisor, PerkSummary};
use vanta_core::member::{MemberProfile, ProvisioningHints};
use vanta_core::perk::Perk;
use vanta_core::purchase::PurchaseRecord;
use vanta_core::VantaError;
use vanta_engine::{RedemptionEngine, RedemptionOutcome};
use vanta_store::{PerkCatalog, ProfileStore, PurchaseLedger};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RedemptionEngine>,
    pub profiles: Arc<dyn ProfileStore>,
    pub catalog: Arc<dyn PerkCatalog>,
    pub ledger: Arc<dyn PurchaseLedger>,
    pub advisor: Arc<dyn Advisor>,
    pub start_time: Instant,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map the error taxonomy onto HTTP statuses.
pub(crate) fn error_response(err: VantaError) -> ApiError {
    let (status, code) = match &err {
        VantaError::AuthenticationRequired => {
            (StatusCode::UNAUTHORIZED, "authentication_required")
        }
        VantaError::PerkUnavailable { .. } => (StatusCode::NOT_FOUND, "perk_unavailable"),
        VantaError::PerkSoldOut { .. } => (StatusCode::CONFLICT, "perk_sold_out"),
        VantaError::LedgerWriteFailed(_) => (StatusCode::BAD_GATEWAY, "ledger_write_failed"),
        VantaError::ProfileWriteFailed(_) => (StatusCode::BAD_GATEWAY, "profile_write_failed"),
        VantaError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        VantaError::Config(_) | VantaError::Serialization(_) | VantaError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    if status.is_server_error() {
        warn!(error = %err, "Request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

// ─── Catalog & Redemption ───────────────────────────────────────────────────

/// GET /v1/perks — the full catalog.
pub async fn list_perks(State(state): State<AppState>) -> Result<Json<Vec<Perk>>, ApiError> {
    let perks = state.catalog.list().await.map_err(error_response)?;
    Ok(Json(perks))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub member_id: String,
    pub perk_id: String,
}

/// POST /v1/redeem — run one redemption through the engine.
pub async fn handle_redeem(
    State(state): State<AppState>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<RedemptionOutcome>, ApiError> {
    if request.perk_id.is_empty() {
        return Err(error_response(VantaError::Validation(
            "perkId must not be empty".to_string(),
        )));
    }
    metrics::counter!("api.redeem_requests").increment(1);
    let outcome = state
        .engine
        .redeem(&request.member_id, &request.perk_id)
        .await
        .map_err(error_response)?;
    Ok(Json(outcome))
}

// ─── Member Profile ─────────────────────────────────────────────────────────

/// GET /v1/members/:id — profile, provisioned on first sight.
pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberProfile>, ApiError> {
    let profile = state
        .engine
        .get_or_create_profile(&member_id, &ProvisioningHints::default())
        .await
        .map_err(error_response)?;
    Ok(Json(profile))
}

/// Identity and employment edits. Tier, balance, and cumulative spend are
/// engine output and cannot be written through this shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_first_login: Option<bool>,
}

/// PUT /v1/members/:id — onboarding/contact edits.
pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<MemberProfile>, ApiError> {
    let Some(mut profile) = state.profiles.get(&member_id).await.map_err(error_response)? else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "member_not_found".to_string(),
                message: format!("no profile for member {member_id}"),
            }),
        ));
    };

    if let Some(full_name) = request.full_name {
        profile.full_name = full_name;
    }
    if let Some(email) = request.email {
        profile.email = email;
    }
    if let Some(phone) = request.phone {
        profile.phone = phone;
    }
    if let Some(company_name) = request.company_name {
        profile.company_name = company_name;
    }
    if let Some(sector) = request.sector {
        profile.sector = sector;
    }
    if let Some(job_title) = request.job_title {
        profile.job_title = job_title;
    }
    if let Some(location) = request.location {
        profile.location = location;
    }
    if let Some(is_first_login) = request.is_first_login {
        profile.is_first_login = is_first_login;
    }

    state
        .profiles
        .update(&member_id, &profile)
        .await
        .map_err(error_response)?;
    Ok(Json(profile))
}

/// GET /v1/members/:id/purchases — history, newest first.
pub async fn member_purchases(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<PurchaseRecord>>, ApiError> {
    let purchases = state
        .ledger
        .list_by_member(&member_id)
        .await
        .map_err(error_response)?;
    Ok(Json(purchases))
}

// ─── Recommendations & Chat ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedPerk {
    pub perk: Perk,
    pub reason: String,
}

/// GET /v1/members/:id/recommendations — advisor-ranked perks, filtered
/// against the live catalog. Advisor degradation yields an empty list,
/// never an error.
pub async fn member_recommendations(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<RecommendedPerk>>, ApiError> {
    let profile = state
        .profiles
        .get(&member_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(VantaError::AuthenticationRequired))?;
    let perks = state.catalog.list().await.map_err(error_response)?;

    let summaries: Vec<PerkSummary> = perks.iter().map(PerkSummary::from).collect();
    let matches = state.advisor.rank_perks(&profile, &summaries).await;

    // Advisor output is advisory-only: ids the catalog no longer holds are
    // silently dropped.
    let recommended = matches
        .into_iter()
        .filter_map(|m| {
            perks
                .iter()
                .find(|p| p.id == m.perk_id)
                .map(|perk| RecommendedPerk {
                    perk: perk.clone(),
                    reason: m.reason,
                })
        })
        .collect();
    Ok(Json(recommended))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub member_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /v1/chat — assistant reply with a built-in fallback.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let profile = state
        .profiles
        .get(&request.member_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(VantaError::AuthenticationRequired))?;
    let reply = state.advisor.chat_reply(&request.message, &profile).await;
    metrics::counter!("api.chat_replies").increment(1);
    Ok(Json(ChatResponse { reply }))
}

// ─── Operational ────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// GET /health — health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog.list().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
