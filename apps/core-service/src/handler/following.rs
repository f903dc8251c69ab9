//! # フォロー API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use tsudoi_domain::{event::EventId, member::MemberId};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{
    error::CoreError,
    handler::{ActorQuery, event::EventDto, member::MemberDto},
    usecase::FollowUseCaseImpl,
};

/// フォローハンドラーの State
pub struct FollowState {
    pub usecase: FollowUseCaseImpl,
}

/// フォロー結果 DTO
#[derive(Debug, Serialize)]
pub struct FollowResultDto {
    /// 新規フォローなら true、既にフォロー済みなら false
    pub followed: bool,
}

/// イベントをフォローする（冪等）
///
/// ## エンドポイント
/// POST /internal/events/{id}/follow?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn follow_event(
    State(state): State<Arc<FollowState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    let followed = state
        .usecase
        .follow_event(
            &MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(FollowResultDto { followed });
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// イベントのフォローを解除する
///
/// ## エンドポイント
/// DELETE /internal/events/{id}/follow?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn unfollow_event(
    State(state): State<Arc<FollowState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .unfollow_event(
            &MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// イベントのフォロワー一覧を取得する
///
/// ## エンドポイント
/// GET /internal/events/{id}/followers
#[tracing::instrument(skip_all)]
pub async fn list_event_followers(
    State(state): State<Arc<FollowState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let followers = state
        .usecase
        .list_followers(&EventId::from_uuid(id))
        .await?;

    let dtos: Vec<MemberDto> = followers.iter().map(MemberDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// 部員がフォローしているイベント一覧を取得する
///
/// ## エンドポイント
/// GET /internal/members/{id}/followed-events
#[tracing::instrument(skip_all)]
pub async fn list_followed_events(
    State(state): State<Arc<FollowState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let events = state
        .usecase
        .list_followed_events(&MemberId::from_uuid(id))
        .await?;

    let dtos: Vec<EventDto> = events.iter().map(EventDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}
