//! Public API endpoints: registration, status lookup, and display widgets.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    DirectoryEntry, MemberView, MembershipStats, RegisterRequest, RegistrationReceipt,
};
use crate::validation;
use crate::AppState;

/// Default and maximum sizes of the public directory listing.
const DIRECTORY_DEFAULT_LIMIT: i64 = 10;
const DIRECTORY_MAX_LIMIT: i64 = 100;

/// POST /api/register - Public registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<RegistrationReceipt> {
    let input = validation::validate_registration(&request)?;
    let member = state.repo.register(&input).await?;

    tracing::info!(member_number = %member.member_number, "new member registered");

    success(RegistrationReceipt {
        member_number: member.member_number,
    })
}

/// GET /api/lookup/{national_id} - Public membership status lookup.
///
/// A malformed ID is rejected before the database is consulted, so callers
/// can distinguish "invalid format" from "not found".
pub async fn lookup(
    State(state): State<AppState>,
    Path(national_id): Path<String>,
) -> ApiResult<MemberView> {
    let national_id = validation::validate_national_id(&national_id)?;

    match state.repo.find_by_national_id(&national_id).await? {
        Some(member) => success(MemberView::from(&member)),
        None => Err(AppError::NotFound(
            "No membership found for that national ID.".to_string(),
        )),
    }
}

/// GET /api/stats - Aggregate membership statistics for public display.
pub async fn stats(State(state): State<AppState>) -> ApiResult<MembershipStats> {
    let stats = state.repo.stats().await?;
    success(stats)
}

#[derive(Debug, Deserialize)]
pub struct DirectoryParams {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/directory - Recent members for public display.
///
/// Exposes membership number, name, and registration date only; contact
/// details and national IDs never appear here.
pub async fn directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> ApiResult<Vec<DirectoryEntry>> {
    let limit = params
        .limit
        .filter(|&n| n > 0)
        .unwrap_or(DIRECTORY_DEFAULT_LIMIT)
        .min(DIRECTORY_MAX_LIMIT);

    let members = state.repo.recent(limit).await?;
    success(members.iter().map(DirectoryEntry::from).collect())
}
