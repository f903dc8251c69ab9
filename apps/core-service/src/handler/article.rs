//! # 記事 API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tsudoi_domain::{
    article::{Article, ArticleId},
    member::MemberId,
    value_objects::Title,
};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::ArticleUseCaseImpl};

/// 記事ハンドラーの State
pub struct ArticleState {
    pub usecase: ArticleUseCaseImpl,
}

/// 記事 DTO
#[derive(Debug, Serialize)]
pub struct ArticleDto {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub editor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for ArticleDto {
    fn from(article: &Article) -> Self {
        Self {
            id: *article.id().as_uuid(),
            title: article.title().as_str().to_string(),
            body: article.body().to_string(),
            author_id: *article.author_id().as_uuid(),
            editor_id: article.editor_id().map(|id| *id.as_uuid()),
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        }
    }
}

/// 記事作成・編集リクエスト
#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
    pub body: String,
}

/// 記事を作成する
///
/// ## エンドポイント
/// POST /internal/articles?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_article(
    State(state): State<Arc<ArticleState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<ArticleRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let article = state
        .usecase
        .create(
            &MemberId::from_uuid(actor.member_id),
            title,
            request.body,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(ArticleDto::from(&article));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 記事を取得する
///
/// ## エンドポイント
/// GET /internal/articles/{id}
#[tracing::instrument(skip_all)]
pub async fn get_article(
    State(state): State<Arc<ArticleState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let article = state.usecase.get(&ArticleId::from_uuid(id)).await?;

    let response = ApiResponse::new(ArticleDto::from(&article));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全記事を取得する
///
/// ## エンドポイント
/// GET /internal/articles
#[tracing::instrument(skip_all)]
pub async fn list_articles(
    State(state): State<Arc<ArticleState>>,
) -> Result<Response, CoreError> {
    let articles = state.usecase.list().await?;

    let dtos: Vec<ArticleDto> = articles.iter().map(ArticleDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// 記事を編集する（投稿者本人または役員）
///
/// ## エンドポイント
/// PUT /internal/articles/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn edit_article(
    State(state): State<Arc<ArticleState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<ArticleRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let article = state
        .usecase
        .edit(
            &MemberId::from_uuid(actor.member_id),
            &ArticleId::from_uuid(id),
            title,
            request.body,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(ArticleDto::from(&article));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 記事を削除する（投稿者本人または役員）
///
/// ## エンドポイント
/// DELETE /internal/articles/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_article(
    State(state): State<Arc<ArticleState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &MemberId::from_uuid(actor.member_id),
            &ArticleId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
