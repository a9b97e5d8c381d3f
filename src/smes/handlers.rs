use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::SmeRequest,
    repo_types::{Sme, SmeListing, SmePatch},
};
use crate::{auth::extractors::AuthUser, error::AppError, response::ApiSuccess, state::AppState};

const NOT_FOUND: &str = "SME not found.";

pub fn sme_routes() -> Router<AppState> {
    Router::new()
        .route("/smes", get(list_smes).post(create_sme))
        .route(
            "/smes/:id",
            get(get_sme).put(update_sme).delete(delete_sme),
        )
}

#[instrument(skip(state))]
pub async fn list_smes(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<SmeListing>>, AppError> {
    let smes = state
        .smes
        .list()
        .await
        .map_err(|e| e.into_app_error("Server error while listing SMEs."))?;
    Ok(ApiSuccess::ok("SMEs retrieved successfully.", smes))
}

#[instrument(skip(state))]
pub async fn get_sme(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiSuccess<SmeListing>, AppError> {
    let Path(id) = id?;
    let sme = state
        .smes
        .find(id)
        .await
        .map_err(|e| e.into_app_error("Server error while loading SME."))?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
    Ok(ApiSuccess::ok("SME retrieved successfully.", sme))
}

#[instrument(skip(state, user, payload))]
pub async fn create_sme(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<SmeRequest>, JsonRejection>,
) -> Result<ApiSuccess<Sme>, AppError> {
    let Json(payload) = payload?;
    let patch = SmePatch::from(payload);
    let business_name = patch
        .business_name
        .ok_or_else(|| AppError::Validation("Business name is required.".into()))?;

    let now = OffsetDateTime::now_utc();
    let sme = Sme {
        id: Uuid::new_v4(),
        owner_id: user.user_id,
        business_name,
        location: patch.location,
        category: patch.category,
        price_range: patch.price_range,
        created_at: now,
        updated_at: now,
    };
    state
        .smes
        .insert(&sme)
        .await
        .map_err(|e| e.into_app_error("Server error while creating SME."))?;

    info!(sme_id = %sme.id, owner_id = %sme.owner_id, "sme created");
    Ok(ApiSuccess::created("SME created successfully.", sme))
}

#[instrument(skip(state, user, payload))]
pub async fn update_sme(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SmeRequest>, JsonRejection>,
) -> Result<ApiSuccess<Sme>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let mut sme = state
        .smes
        .find_owned(id, user.user_id)
        .await
        .map_err(|e| e.into_app_error("Server error while updating SME."))?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;

    sme.apply(&SmePatch::from(payload));
    let updated = state
        .smes
        .update(&sme)
        .await
        .map_err(|e| e.into_app_error("Server error while updating SME."))?;
    if !updated {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }

    info!(sme_id = %sme.id, "sme updated");
    Ok(ApiSuccess::ok("SME updated successfully.", sme))
}

#[instrument(skip(state, user))]
pub async fn delete_sme(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiSuccess<()>, AppError> {
    let Path(id) = id?;
    let deleted = state
        .smes
        .delete_owned(id, user.user_id)
        .await
        .map_err(|e| e.into_app_error("Server error while deleting SME."))?;
    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND.into()));
    }
    info!(sme_id = %id, "sme deleted");
    Ok(ApiSuccess::message("SME deleted successfully."))
}
