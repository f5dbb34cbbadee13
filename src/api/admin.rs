//! Admin API endpoints: member list/search, manual registration, deletion.
//!
//! All routes here sit behind the admin-key middleware.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::{
    DeleteManyRequest, DeleteManyResponse, DeletedMember, Member, MemberPage, RegisterRequest,
};
use crate::validation;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
}

/// GET /api/admin/members - Paginated, searchable member list.
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<MemberPage> {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = state.config.page_size;

    let (items, total_count) = state
        .repo
        .list(params.search.as_deref(), page, page_size)
        .await?;

    success(MemberPage {
        items,
        total_count,
        page,
        page_size,
    })
}

/// POST /api/admin/members - Manual registration entry.
///
/// Goes through the same validation and numbering pipeline as the public
/// form; the only difference is who is filling it in.
pub async fn create_member(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Member> {
    let input = validation::validate_registration(&request)?;
    let member = state.repo.register(&input).await?;

    tracing::info!(member_number = %member.member_number, "member added by administrator");

    success(member)
}

/// DELETE /api/admin/members/{id} - Delete a single member.
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DeletedMember> {
    let deleted_name = state.repo.delete(id).await?;

    tracing::info!(member_id = id, "member deleted");

    success(DeletedMember { deleted_name })
}

/// POST /api/admin/members/delete - Bulk deletion.
pub async fn delete_members(
    State(state): State<AppState>,
    Json(request): Json<DeleteManyRequest>,
) -> ApiResult<DeleteManyResponse> {
    let deleted_count = state.repo.delete_many(&request.ids).await?;

    tracing::info!(deleted_count, "bulk member deletion");

    success(DeleteManyResponse { deleted_count })
}
