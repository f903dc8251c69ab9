//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use thiserror::Error;
use tsudoi_domain::DomainError;
use tsudoi_infra::{InfraError, error::InfraErrorKind};
use tsudoi_shared::ErrorResponse;

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 不正なリクエスト
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// 権限不足
   #[error("権限がありません: {0}")]
   Forbidden(String),

   /// 競合（一意制約違反など）
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// データベース・外部サービスエラー
   #[error("インフラエラー: {0}")]
   Infra(#[from] InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for CoreError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => Self::BadRequest(msg),
         DomainError::NotFound { entity_type, id } => {
            Self::NotFound(format!("{entity_type}: {id}"))
         }
         DomainError::Conflict(msg) => Self::Conflict(msg),
         DomainError::Forbidden(msg) => Self::Forbidden(msg),
      }
   }
}

impl IntoResponse for CoreError {
   fn into_response(self) -> Response {
      let (status, body) = match &self {
         CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
         CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg)),
         CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::forbidden(msg)),
         CoreError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::conflict(msg)),
         CoreError::Infra(e) => {
            // 一意制約違反はクライアント起因なので 409 で返す
            if let InfraErrorKind::Conflict { entity, id } = e.kind() {
               (
                  StatusCode::CONFLICT,
                  ErrorResponse::conflict(format!("{entity} は既に存在します: {id}")),
               )
            } else {
               tracing::error!(error = %e, span_trace = %e.span_trace(), "インフラエラー");
               (
                  StatusCode::INTERNAL_SERVER_ERROR,
                  ErrorResponse::internal_error(),
               )
            }
         }
         CoreError::Internal(msg) => {
            tracing::error!("内部エラー: {}", msg);
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               ErrorResponse::internal_error(),
            )
         }
      };

      (status, Json(body)).into_response()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_domain_errorからの変換が対応するバリアントになる() {
      let err: CoreError = DomainError::Validation("必須です".to_string()).into();
      assert!(matches!(err, CoreError::BadRequest(_)));

      let err: CoreError = DomainError::Forbidden("役員のみ".to_string()).into();
      assert!(matches!(err, CoreError::Forbidden(_)));

      let err: CoreError = DomainError::NotFound {
         entity_type: "Event",
         id:          "E-001".to_string(),
      }
      .into();
      assert!(matches!(err, CoreError::NotFound(_)));
   }

   #[test]
   fn test_infra_conflictはconflictレスポンスになる() {
      let err = CoreError::Infra(InfraError::conflict("Member", "a@example.com"));
      let response = err.into_response();
      assert_eq!(response.status(), StatusCode::CONFLICT);
   }

   #[test]
   fn test_infra_databaseエラーは500になる() {
      let err = CoreError::Infra(sqlx::Error::RowNotFound.into());
      let response = err.into_response();
      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
   }
}
