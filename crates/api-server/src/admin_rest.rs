//! REST handlers for the catalog administration surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use vanta_core::perk::{CreatePerkRequest, Perk, UpdatePerkRequest};
use vanta_store::{seed, PerkCatalog};

use crate::rest::{error_response, ApiError, AppState, ErrorResponse};

fn perk_not_found(perk_id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "perk_not_found".to_string(),
            message: format!("no perk {perk_id} in catalog"),
        }),
    )
}

/// GET /v1/admin/perks — catalog with admin-relevant counters included.
pub async fn list_perks(State(state): State<AppState>) -> Result<Json<Vec<Perk>>, ApiError> {
    let perks = state.catalog.list().await.map_err(error_response)?;
    Ok(Json(perks))
}

/// POST /v1/admin/perks — create a catalog entry. The discount value is
/// classified here, at catalog-entry time.
pub async fn create_perk(
    State(state): State<AppState>,
    Json(request): Json<CreatePerkRequest>,
) -> Result<(StatusCode, Json<Perk>), ApiError> {
    let perk = Perk::from_create(request);
    state.catalog.upsert(&perk).await.map_err(error_response)?;
    metrics::counter!("admin.perks_created").increment(1);
    Ok((StatusCode::CREATED, Json(perk)))
}

/// PUT /v1/admin/perks/:id — edit a catalog entry.
pub async fn update_perk(
    State(state): State<AppState>,
    Path(perk_id): Path<String>,
    Json(request): Json<UpdatePerkRequest>,
) -> Result<Json<Perk>, ApiError> {
    let Some(mut perk) = state.catalog.get(&perk_id).await.map_err(error_response)? else {
        return Err(perk_not_found(&perk_id));
    };
    perk.apply_update(request);
    state.catalog.upsert(&perk).await.map_err(error_response)?;
    Ok(Json(perk))
}

/// DELETE /v1/admin/perks/:id.
pub async fn delete_perk(
    State(state): State<AppState>,
    Path(perk_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state
        .catalog
        .delete(&perk_id)
        .await
        .map_err(error_response)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(perk_not_found(&perk_id))
    }
}

#[derive(Serialize)]
pub struct SeedResponse {
    pub seeded: usize,
}

/// POST /v1/admin/perks/seed — load the demo catalog.
pub async fn seed_perks(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    let seeded = seed::seed_catalog(state.catalog.as_ref())
        .await
        .map_err(error_response)?;
    Ok(Json(SeedResponse { seeded }))
}
