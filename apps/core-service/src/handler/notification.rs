//! # 通知 API ハンドラ
//!
//! 外部スケジューラ（cron）から起動される通知バッチのエンドポイント。

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tsudoi_domain::clock::Clock;
use tsudoi_shared::ApiResponse;

use crate::{error::CoreError, usecase::UpcomingEventNotifier};

/// 通知ハンドラーの State
///
/// 現在時刻はここで Clock から取得し、ユースケースへ注入する。
pub struct NotificationState {
    pub notifier: UpcomingEventNotifier,
    pub clock:    Arc<dyn Clock>,
}

/// 開催間近イベント通知バッチを実行する
///
/// 外部スケジューラ（cron 等）が日次で呼び出す。
///
/// ## エンドポイント
/// POST /internal/notifications/upcoming-events/dispatch
#[tracing::instrument(skip_all)]
pub async fn dispatch_upcoming_event_notifications(
    State(state): State<Arc<NotificationState>>,
) -> Result<Response, CoreError> {
    let now = state.clock.now();
    let summary = state.notifier.notify_followers(now).await?;

    let response = ApiResponse::new(summary);
    Ok((StatusCode::OK, Json(response)).into_response())
}
