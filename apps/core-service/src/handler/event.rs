//! # イベント API ハンドラ
//!
//! イベント CRUD と写真添付のエンドポイントを実装する。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tsudoi_domain::event::{Event, EventId, NewEvent};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::EventUseCaseImpl};

/// イベントハンドラーの State
pub struct EventState {
    pub usecase: EventUseCaseImpl,
}

/// イベント DTO
#[derive(Debug, Serialize)]
pub struct EventDto {
    pub id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// `MM/DD/YYYY` 形式の表示用文字列
    pub date_string: String,
    /// `H:MM AM/PM` 形式の表示用文字列
    pub time_string: String,
    pub description: String,
    pub has_photo: bool,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        Self {
            id: *event.id().as_uuid(),
            name: event.name().as_str().to_string(),
            date: event.date(),
            time: event.time(),
            date_string: event.date_string(),
            time_string: event.time_string(),
            description: event.description().to_string(),
            has_photo: event.photo().is_some(),
        }
    }
}

/// イベント作成・更新リクエスト
///
/// 必須項目の欠落チェックはドメイン層（`Event::new`）が行うため、
/// ここではすべて Option で受ける。
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub description: Option<String>,
}

impl From<EventRequest> for NewEvent {
    fn from(request: EventRequest) -> Self {
        Self {
            name:        request.name,
            date:        request.date,
            time:        request.time,
            description: request.description,
        }
    }
}

/// 写真メタデータリクエスト（アップロード URL 発行・確認共通）
#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    pub file_name: String,
    pub content_type: String,
    pub file_size: i64,
}

/// アップロード URL レスポンス
#[derive(Debug, Serialize)]
pub struct UploadUrlDto {
    pub upload_url: String,
}

/// 写真閲覧 URL レスポンス
#[derive(Debug, Serialize)]
pub struct PhotoUrlDto {
    pub url: Option<String>,
}

/// イベントを作成する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/events?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_event(
    State(state): State<Arc<EventState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<EventRequest>,
) -> Result<Response, CoreError> {
    let event = state
        .usecase
        .create(
            &tsudoi_domain::member::MemberId::from_uuid(actor.member_id),
            request.into(),
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(EventDto::from(&event));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// イベントを取得する
///
/// ## エンドポイント
/// GET /internal/events/{id}
#[tracing::instrument(skip_all)]
pub async fn get_event(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let event = state.usecase.get(&EventId::from_uuid(id)).await?;

    let response = ApiResponse::new(EventDto::from(&event));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全イベントを取得する
///
/// ## エンドポイント
/// GET /internal/events
#[tracing::instrument(skip_all)]
pub async fn list_events(State(state): State<Arc<EventState>>) -> Result<Response, CoreError> {
    let events = state.usecase.list().await?;

    let dtos: Vec<EventDto> = events.iter().map(EventDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// イベントを更新する（役員のみ）
///
/// ## エンドポイント
/// PUT /internal/events/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn update_event(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<EventRequest>,
) -> Result<Response, CoreError> {
    let event = state
        .usecase
        .update(
            &tsudoi_domain::member::MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
            request.into(),
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(EventDto::from(&event));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// イベントを削除する（役員のみ）
///
/// ## エンドポイント
/// DELETE /internal/events/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_event(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &tsudoi_domain::member::MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// 写真アップロード用 URL を発行する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/events/{id}/photo/upload-url?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn issue_event_photo_upload_url(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<PhotoRequest>,
) -> Result<Response, CoreError> {
    let upload_url = state
        .usecase
        .issue_photo_upload_url(
            &tsudoi_domain::member::MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
            &request.file_name,
            &request.content_type,
            request.file_size,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(UploadUrlDto { upload_url });
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 写真アップロード完了を確認し、メタデータを保存する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/events/{id}/photo?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn confirm_event_photo(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<PhotoRequest>,
) -> Result<Response, CoreError> {
    let event = state
        .usecase
        .confirm_photo(
            &tsudoi_domain::member::MemberId::from_uuid(actor.member_id),
            &EventId::from_uuid(id),
            &request.file_name,
            &request.content_type,
            request.file_size,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(EventDto::from(&event));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 写真の閲覧用 URL を取得する
///
/// ## エンドポイント
/// GET /internal/events/{id}/photo
#[tracing::instrument(skip_all)]
pub async fn get_event_photo_url(
    State(state): State<Arc<EventState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let url = state.usecase.photo_url(&EventId::from_uuid(id)).await?;

    let response = ApiResponse::new(PhotoUrlDto { url });
    Ok((StatusCode::OK, Json(response)).into_response())
}
