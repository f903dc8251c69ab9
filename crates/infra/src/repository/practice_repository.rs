//! # PracticeRepository
//!
//! 練習スケジュールの永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::practice::{Practice, PracticeId};
use uuid::Uuid;

use crate::error::InfraError;

/// 練習リポジトリトレイト
#[async_trait]
pub trait PracticeRepository: Send + Sync {
   /// 練習を登録する
   async fn insert(&self, practice: &Practice) -> Result<(), InfraError>;

   /// 練習を更新する
   async fn update(&self, practice: &Practice) -> Result<(), InfraError>;

   /// 練習を削除する
   async fn delete(&self, id: &PracticeId) -> Result<(), InfraError>;

   /// ID で練習を検索
   async fn find_by_id(&self, id: &PracticeId) -> Result<Option<Practice>, InfraError>;

   /// 全練習を取得（登録順）
   async fn find_all(&self) -> Result<Vec<Practice>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct PracticeRow {
   id: Uuid,
   day: String,
   time: Option<NaiveTime>,
   location: Option<String>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl PracticeRow {
   fn into_entity(self) -> Practice {
      Practice::from_db(
         PracticeId::from_uuid(self.id),
         self.day,
         self.time,
         self.location,
         self.created_at,
         self.updated_at,
      )
   }
}

const SELECT_PRACTICE: &str = r#"
   SELECT id, day, time, location, created_at, updated_at
   FROM practices
"#;

/// PostgreSQL 実装の PracticeRepository
#[derive(Debug, Clone)]
pub struct PostgresPracticeRepository {
   pool: PgPool,
}

impl PostgresPracticeRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl PracticeRepository for PostgresPracticeRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, practice: &Practice) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO practices (id, day, time, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
      )
      .bind(practice.id().as_uuid())
      .bind(practice.day())
      .bind(practice.time())
      .bind(practice.location())
      .bind(practice.created_at())
      .bind(practice.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, practice: &Practice) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE practices
            SET day = $2, time = $3, location = $4, updated_at = $5
            WHERE id = $1
            "#,
      )
      .bind(practice.id().as_uuid())
      .bind(practice.day())
      .bind(practice.time())
      .bind(practice.location())
      .bind(practice.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &PracticeId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM practices WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &PracticeId) -> Result<Option<Practice>, InfraError> {
      let row = sqlx::query_as::<_, PracticeRow>(&format!("{SELECT_PRACTICE} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      Ok(row.map(PracticeRow::into_entity))
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Practice>, InfraError> {
      let rows =
         sqlx::query_as::<_, PracticeRow>(&format!("{SELECT_PRACTICE} ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await?;

      Ok(rows.into_iter().map(PracticeRow::into_entity).collect())
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresPracticeRepository>();
   }
}
