//! # 部員 API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tsudoi_domain::member::{Email, Member, MemberId, MemberProfile};
use tsudoi_domain::value_objects::{PersonName, StudentId};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::MemberUseCaseImpl};

/// 部員ハンドラーの State
pub struct MemberState {
    pub usecase: MemberUseCaseImpl,
}

/// 部員 DTO
#[derive(Debug, Serialize)]
pub struct MemberDto {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub year: Option<String>,
    pub competitive: bool,
    pub officer: bool,
    pub position: Option<String>,
    pub request: bool,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            id: *member.id().as_uuid(),
            email: member.email().as_str().to_string(),
            first_name: member.first_name().map(|n| n.as_str().to_string()),
            last_name: member.last_name().map(|n| n.as_str().to_string()),
            full_name: member.full_name(),
            student_id: member.student_id().map(|s| s.as_str().to_string()),
            year: member.year().map(str::to_string),
            competitive: member.competitive(),
            officer: member.is_officer(),
            position: member.position().map(str::to_string),
            request: member.request(),
        }
    }
}

/// 入部申請リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_id: Option<String>,
    pub year: Option<String>,
    #[serde(default)]
    pub competitive: bool,
    pub position: Option<String>,
}

/// プロフィール更新リクエスト
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_id: Option<String>,
    pub year: Option<String>,
    #[serde(default)]
    pub competitive: bool,
    pub position: Option<String>,
}

/// 役員権限変更リクエスト
#[derive(Debug, Deserialize)]
pub struct SetOfficerRequest {
    pub officer: bool,
}

fn build_profile(
    first_name: Option<String>,
    last_name: Option<String>,
    student_id: Option<String>,
    year: Option<String>,
    competitive: bool,
    position: Option<String>,
) -> Result<MemberProfile, CoreError> {
    Ok(MemberProfile {
        first_name: first_name.map(PersonName::new).transpose()?,
        last_name: last_name.map(PersonName::new).transpose()?,
        student_id: student_id.map(StudentId::new).transpose()?,
        year,
        competitive,
        position,
    })
}

/// 入部申請として部員を登録する
///
/// ## エンドポイント
/// POST /internal/members
#[tracing::instrument(skip_all)]
pub async fn register_member(
    State(state): State<Arc<MemberState>>,
    Json(request): Json<RegisterMemberRequest>,
) -> Result<Response, CoreError> {
    let email = Email::new(request.email)?;
    let profile = build_profile(
        request.first_name,
        request.last_name,
        request.student_id,
        request.year,
        request.competitive,
        request.position,
    )?;

    let member = state.usecase.register(email, profile, Utc::now()).await?;

    let response = ApiResponse::new(MemberDto::from(&member));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 部員を取得する
///
/// ## エンドポイント
/// GET /internal/members/{id}
#[tracing::instrument(skip_all)]
pub async fn get_member(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let member = state.usecase.get(&MemberId::from_uuid(id)).await?;

    let response = ApiResponse::new(MemberDto::from(&member));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全部員を取得する
///
/// ## エンドポイント
/// GET /internal/members
#[tracing::instrument(skip_all)]
pub async fn list_members(
    State(state): State<Arc<MemberState>>,
) -> Result<Response, CoreError> {
    let members = state.usecase.list().await?;

    let dtos: Vec<MemberDto> = members.iter().map(MemberDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// プロフィールを更新する（本人または役員）
///
/// ## エンドポイント
/// PUT /internal/members/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn update_member_profile(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Response, CoreError> {
    let profile = build_profile(
        request.first_name,
        request.last_name,
        request.student_id,
        request.year,
        request.competitive,
        request.position,
    )?;

    let member = state
        .usecase
        .update_profile(
            &MemberId::from_uuid(actor.member_id),
            &MemberId::from_uuid(id),
            profile,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(MemberDto::from(&member));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 入部申請を承認する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/members/{id}/approve?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn approve_member(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    let member = state
        .usecase
        .approve(
            &MemberId::from_uuid(actor.member_id),
            &MemberId::from_uuid(id),
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(MemberDto::from(&member));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 役員権限を付与・剥奪する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/members/{id}/officer?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn set_member_officer(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<SetOfficerRequest>,
) -> Result<Response, CoreError> {
    let member = state
        .usecase
        .set_officer(
            &MemberId::from_uuid(actor.member_id),
            &MemberId::from_uuid(id),
            request.officer,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(MemberDto::from(&member));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 部員を削除する（役員のみ）
///
/// ## エンドポイント
/// DELETE /internal/members/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_member(
    State(state): State<Arc<MemberState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &MemberId::from_uuid(actor.member_id),
            &MemberId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
