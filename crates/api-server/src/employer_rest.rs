//! REST handlers for the employer analytics surface.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use vanta_advisor::Advisor;
use vanta_reporting::{employer_summary, sector_trends, EmployerSummary, SectorUsage};
use vanta_store::{PerkCatalog, ProfileStore, PurchaseLedger};

use crate::rest::{error_response, ApiError, AppState};

/// GET /v1/employer/summary — aggregate usage for the employer dashboard.
pub async fn summary(State(state): State<AppState>) -> Result<Json<EmployerSummary>, ApiError> {
    let purchases = state.ledger.list_all().await.map_err(error_response)?;
    let perks = state.catalog.list().await.map_err(error_response)?;
    let profiles = state.profiles.list().await.map_err(error_response)?;

    let summary = employer_summary(
        &purchases,
        &perks,
        &profiles,
        Utc::now().date_naive(),
    );
    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub rows: Vec<SectorUsage>,
    /// Advisor commentary; falls back to a static line when the model is
    /// unavailable.
    pub insight: String,
}

/// GET /v1/employer/trends — per-sector usage rows plus advisor
/// commentary.
pub async fn trends(State(state): State<AppState>) -> Result<Json<TrendResponse>, ApiError> {
    let purchases = state.ledger.list_all().await.map_err(error_response)?;
    let perks = state.catalog.list().await.map_err(error_response)?;
    let profiles = state.profiles.list().await.map_err(error_response)?;

    let rows = sector_trends(&purchases, &perks, &profiles);
    let insight = state.advisor.trend_insights(&json!(rows)).await;
    Ok(Json(TrendResponse { rows, insight }))
}
