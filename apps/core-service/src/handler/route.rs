//! # ルート API ハンドラ

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tsudoi_domain::{
    member::MemberId,
    route::{Route, RouteId},
    value_objects::Title,
};
use tsudoi_shared::ApiResponse;
use uuid::Uuid;

use crate::{error::CoreError, handler::ActorQuery, usecase::RouteUseCaseImpl};

/// ルートハンドラーの State
pub struct RouteState {
    pub usecase: RouteUseCaseImpl,
}

/// ルート DTO
#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub id: Uuid,
    pub title: String,
    pub distance: Option<i64>,
    pub map_my_run_id: Option<String>,
}

impl From<&Route> for RouteDto {
    fn from(route: &Route) -> Self {
        Self {
            id: *route.id().as_uuid(),
            title: route.title().as_str().to_string(),
            distance: route.distance(),
            map_my_run_id: route.map_my_run_id().map(str::to_string),
        }
    }
}

/// ルート作成・更新リクエスト
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub title: String,
    pub distance: Option<i64>,
    pub map_my_run_id: Option<String>,
}

/// ルートを作成する（役員のみ）
///
/// ## エンドポイント
/// POST /internal/routes?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn create_route(
    State(state): State<Arc<RouteState>>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<RouteRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let route = state
        .usecase
        .create(
            &MemberId::from_uuid(actor.member_id),
            title,
            request.distance,
            request.map_my_run_id,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(RouteDto::from(&route));
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// ルートを取得する
///
/// ## エンドポイント
/// GET /internal/routes/{id}
#[tracing::instrument(skip_all)]
pub async fn get_route(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, CoreError> {
    let route = state.usecase.get(&RouteId::from_uuid(id)).await?;

    let response = ApiResponse::new(RouteDto::from(&route));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// 全ルートを取得する
///
/// ## エンドポイント
/// GET /internal/routes
#[tracing::instrument(skip_all)]
pub async fn list_routes(State(state): State<Arc<RouteState>>) -> Result<Response, CoreError> {
    let routes = state.usecase.list().await?;

    let dtos: Vec<RouteDto> = routes.iter().map(RouteDto::from).collect();
    Ok((StatusCode::OK, Json(ApiResponse::new(dtos))).into_response())
}

/// ルートを更新する（役員のみ）
///
/// ## エンドポイント
/// PUT /internal/routes/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn update_route(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    Json(request): Json<RouteRequest>,
) -> Result<Response, CoreError> {
    let title = Title::new(request.title)?;
    let route = state
        .usecase
        .update(
            &MemberId::from_uuid(actor.member_id),
            &RouteId::from_uuid(id),
            title,
            request.distance,
            request.map_my_run_id,
            Utc::now(),
        )
        .await?;

    let response = ApiResponse::new(RouteDto::from(&route));
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// ルートを削除する（役員のみ）
///
/// ## エンドポイント
/// DELETE /internal/routes/{id}?member_id={acting}
#[tracing::instrument(skip_all)]
pub async fn delete_route(
    State(state): State<Arc<RouteState>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Response, CoreError> {
    state
        .usecase
        .delete(
            &MemberId::from_uuid(actor.member_id),
            &RouteId::from_uuid(id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
