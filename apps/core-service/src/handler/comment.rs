//! # コメント API ハンドラ

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
    comment::{Comment, CommentId, CommentableRef, CommentableType},
    member::MemberId,
};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::CommentUseCaseImpl};

/// コメントハンドラーの State
pub struct CommentState {
    pub usecase: CommentUseCaseImpl,
}

/// コメント DTO
#[derive(Debug, Serialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub body: String,
    pub commenter_id: Uuid,
    pub commentable_type: CommentableType,
    pub commentable_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: *comment.id().as_uuid(),
            body: comment.body().to_string(),
            commenter_id: *comment.commenter_id().as_uuid(),
            commentable_type: comment.target().commentable_type(),
            commentable_id: *comment.target().commentable_id(),
            created_at: comment.created_at(),
        }
    }
}

/// コメント投稿リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub commentable_type: CommentableType,
    pub commentable_id: Uuid,
    pub body: String,
}

/// コメント対象を指定するクエリ
#[derive(Debug, Deserialize)]
pub struct CommentTargetQuery {
    pub commentable_type: CommentableType,
    pub commentable_id: Uuid,
}

/// コメントを投稿する
///
/// ## エンドポイント
/// POST /internal/comments?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_comment(
    State(state): State<Arc<CommentState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Response, CoreError> {
    let target = CommentableRef::from_parts(request.commentable_type, request.commentable_id);
    let comment = state
        .usecase
        .create(
            &MemberId::from_uuid(actor.member_id),
            target,
            request.body,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(CommentDto::from(&comment));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 対象へのコメント一覧を取得する
///
/// ## エンドポイント
/// GET /internal/comments?commentable_type={type}&commentable_id={id}
#[tracing::instrument(skip_all)]
pub async fn list_comments(
    State(state): State<Arc<CommentState>>,
    Query(query): Query<CommentTargetQuery>,
) -> Result<Response, CoreError> {
    let target = CommentableRef::from_parts(query.commentable_type, query.commentable_id);
    let comments = state.usecase.list_by_target(&target).await?;

    let dtos: Vec<CommentDto> = comments.iter().map(CommentDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// コメントを削除する（投稿者本人または役員）
///
/// ## エンドポイント
/// DELETE /internal/comments/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_comment(
    State(state): State<Arc<CommentState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &MemberId::from_uuid(actor.member_id),
            &CommentId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
