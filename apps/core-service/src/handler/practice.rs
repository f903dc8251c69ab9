//! # 練習 API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tsudoi_domain::{
    member::MemberId,
    practice::{Practice, PracticeId},
};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::PracticeUseCaseImpl};

/// 練習ハンドラーの State
pub struct PracticeState {
    pub usecase: PracticeUseCaseImpl,
}

/// 練習 DTO
#[derive(Debug, Serialize)]
pub struct PracticeDto {
    pub id: Uuid,
    pub day: String,
    pub time: Option<NaiveTime>,
    /// `H:MM AM/PM` 形式の表示用文字列（時刻未設定なら null）
    pub time_string: Option<String>,
    pub location: Option<String>,
}

impl From<&Practice> for PracticeDto {
    fn from(practice: &Practice) -> Self {
        Self {
            id: *practice.id().as_uuid(),
            day: practice.day().to_string(),
            time: practice.time(),
            time_string: practice.time_string(),
            location: practice.location().map(str::to_string),
        }
    }
}

/// 練習作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct PracticeRequest {
    pub day: String,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
}

/// 練習を作成する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/practices?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_practice(
    State(state): State<Arc<PracticeState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<PracticeRequest>,
) -> Result<Response, CoreError> {
    let practice = state
        .usecase
        .create(
            &MemberId::from_uuid(actor.member_id),
            request.day,
            request.time,
            request.location,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(PracticeDto::from(&practice));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 練習を取得する
///
/// ## エンドポイント
/// GET /internal/practices/{id}
#[tracing::instrument(skip_all)]
pub async fn get_practice(
    State(state): State<Arc<PracticeState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let practice = state.usecase.get(&PracticeId::from_uuid(id)).await?;

    let response = ApiResponse::new(PracticeDto::from(&practice));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全練習を取得する
///
/// ## エンドポイント
/// GET /internal/practices
#[tracing::instrument(skip_all)]
pub async fn list_practices(
    State(state): State<Arc<PracticeState>>,
) -> Result<Response, CoreError> {
    let practices = state.usecase.list().await?;

    let dtos: Vec<PracticeDto> = practices.iter().map(PracticeDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// 練習を更新する（役員のみ）
///
/// ## エンドポイント
/// PUT /internal/practices/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn update_practice(
    State(state): State<Arc<PracticeState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<PracticeRequest>,
) -> Result<Response, CoreError> {
    let practice = state
        .usecase
        .update(
            &MemberId::from_uuid(actor.member_id),
            &PracticeId::from_uuid(id),
            request.day,
            request.time,
            request.location,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(PracticeDto::from(&practice));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 練習を削除する（役員のみ）
///
/// ## エンドポイント
/// DELETE /internal/practices/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_practice(
    State(state): State<Arc<PracticeState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &MemberId::from_uuid(actor.member_id),
            &PracticeId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
