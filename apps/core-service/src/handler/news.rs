//! # お知らせ API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tsudoi_domain::{member::MemberId, news::{News, NewsId}, value_objects::Title};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::NewsUseCaseImpl};

/// お知らせハンドラーの State
pub struct NewsState {
    pub usecase: NewsUseCaseImpl,
}

/// お知らせ DTO
#[derive(Debug, Serialize)]
pub struct NewsDto {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<&News> for NewsDto {
    fn from(news: &News) -> Self {
        Self {
            id: *news.id().as_uuid(),
            title: news.title().as_str().to_string(),
            author_id: *news.author_id().as_uuid(),
            body: news.body().to_string(),
            created_at: news.created_at(),
        }
    }
}

/// お知らせ作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct NewsRequest {
    pub title: String,
    pub body: String,
}

/// お知らせを作成する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/news?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_news(
    State(state): State<Arc<NewsState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<NewsRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let news = state
        .usecase
        .create(
            &MemberId::from_uuid(actor.member_id),
            title,
            request.body,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(NewsDto::from(&news));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// お知らせを取得する
///
/// ## エンドポイント
/// GET /internal/news/{id}
#[tracing::instrument(skip_all)]
pub async fn get_news(
    State(state): State<Arc<NewsState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let news = state.usecase.get(&NewsId::from_uuid(id)).await?;

    let response = ApiResponse::new(NewsDto::from(&news));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全お知らせを取得する
///
/// ## エンドポイント
/// GET /internal/news
#[tracing::instrument(skip_all)]
pub async fn list_news(State(state): State<Arc<NewsState>>) -> Result<Response, CoreError> {
    let items = state.usecase.list().await?;

    let dtos: Vec<NewsDto> = items.iter().map(NewsDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// お知らせを更新する（役員のみ）
///
/// ## エンドポイント
/// PUT /internal/news/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn update_news(
    State(state): State<Arc<NewsState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<NewsRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let news = state
        .usecase
        .update(
            &MemberId::from_uuid(actor.member_id),
            &NewsId::from_uuid(id),
            title,
            request.body,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(NewsDto::from(&news));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// お知らせを削除する（役員のみ）
///
/// ## エンドポイント
/// DELETE /internal/news/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_news(
    State(state): State<Arc<NewsState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(&MemberId::from_uuid(actor.member_id), &NewsId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
