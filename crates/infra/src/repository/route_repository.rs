//! # RouteRepository
//!
//! ランニングルートの永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   route::{Route, RouteId},
   value_objects::Title,
};
use uuid::Uuid;

use crate::error::InfraError;

/// ルートリポジトリトレイト
#[async_trait]
pub trait RouteRepository: Send + Sync {
   /// ルートを登録する
   async fn insert(&self, route: &Route) -> Result<(), InfraError>;

   /// ルートを更新する
   async fn update(&self, route: &Route) -> Result<(), InfraError>;

   /// ルートを削除する
   async fn delete(&self, id: &RouteId) -> Result<(), InfraError>;

   /// ID でルートを検索
   async fn find_by_id(&self, id: &RouteId) -> Result<Option<Route>, InfraError>;

   /// 全ルートを取得（タイトル順）
   async fn find_all(&self) -> Result<Vec<Route>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
   id: Uuid,
   title: String,
   distance: Option<i64>,
   map_my_run_id: Option<String>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl RouteRow {
   fn into_entity(self) -> Result<Route, InfraError> {
      Ok(Route::from_db(
         RouteId::from_uuid(self.id),
         Title::new(&self.title).map_err(|e| InfraError::unexpected(e.to_string()))?,
         self.distance,
         self.map_my_run_id,
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_ROUTE: &str = r#"
   SELECT id, title, distance, map_my_run_id, created_at, updated_at
   FROM routes
"#;

/// PostgreSQL 実装の RouteRepository
#[derive(Debug, Clone)]
pub struct PostgresRouteRepository {
   pool: PgPool,
}

impl PostgresRouteRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl RouteRepository for PostgresRouteRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, route: &Route) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO routes (id, title, distance, map_my_run_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
      )
      .bind(route.id().as_uuid())
      .bind(route.title().as_str())
      .bind(route.distance())
      .bind(route.map_my_run_id())
      .bind(route.created_at())
      .bind(route.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, route: &Route) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE routes
            SET title = $2, distance = $3, map_my_run_id = $4, updated_at = $5
            WHERE id = $1
            "#,
      )
      .bind(route.id().as_uuid())
      .bind(route.title().as_str())
      .bind(route.distance())
      .bind(route.map_my_run_id())
      .bind(route.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &RouteId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM routes WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &RouteId) -> Result<Option<Route>, InfraError> {
      let row = sqlx::query_as::<_, RouteRow>(&format!("{SELECT_ROUTE} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(RouteRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Route>, InfraError> {
      let rows = sqlx::query_as::<_, RouteRow>(&format!("{SELECT_ROUTE} ORDER BY title"))
         .fetch_all(&self.pool)
         .await?;

      rows.into_iter().map(RouteRow::into_entity).collect()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresRouteRepository>();
   }
}
