//! # EventRepository
//!
//! イベント情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **日付範囲クエリ**: 開催間近ウィンドウの検索は DB 側で絞り込む
//!   （`find_by_date_range`、両端含む）
//! - **写真メタデータ**: paperclip 互換の 4 カラム
//!   （file_name / content_type / file_size / updated_at）に分解して保存

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   attachment::PhotoMetadata,
   event::{Event, EventId},
   value_objects::EventName,
};
use uuid::Uuid;

use crate::error::InfraError;

/// イベントリポジトリトレイト
#[async_trait]
pub trait EventRepository: Send + Sync {
   /// イベントを登録する
   async fn insert(&self, event: &Event) -> Result<(), InfraError>;

   /// イベントを更新する
   async fn update(&self, event: &Event) -> Result<(), InfraError>;

   /// イベントを削除する
   async fn delete(&self, id: &EventId) -> Result<(), InfraError>;

   /// ID でイベントを検索
   async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, InfraError>;

   /// 全イベントを取得（開催日順）
   async fn find_all(&self) -> Result<Vec<Event>, InfraError>;

   /// 開催日が範囲内のイベントを取得（両端含む、開催日順）
   ///
   /// 開催間近ウィンドウの検索で使用する。
   async fn find_by_date_range(
      &self,
      from: NaiveDate,
      to: NaiveDate,
   ) -> Result<Vec<Event>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
   id: Uuid,
   name: String,
   date: NaiveDate,
   time: NaiveTime,
   description: String,
   photo_file_name: Option<String>,
   photo_content_type: Option<String>,
   photo_file_size: Option<i64>,
   photo_updated_at: Option<DateTime<Utc>>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl EventRow {
   fn into_entity(self) -> Result<Event, InfraError> {
      Ok(Event::from_db(
         EventId::from_uuid(self.id),
         EventName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
         self.date,
         self.time,
         self.description,
         PhotoMetadata::from_db(
            self.photo_file_name,
            self.photo_content_type,
            self.photo_file_size,
            self.photo_updated_at,
         ),
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_EVENT: &str = r#"
   SELECT
       id, name, date, time, description,
       photo_file_name, photo_content_type, photo_file_size, photo_updated_at,
       created_at, updated_at
   FROM events
"#;

/// PostgreSQL 実装の EventRepository
#[derive(Debug, Clone)]
pub struct PostgresEventRepository {
   pool: PgPool,
}

impl PostgresEventRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, event: &Event) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO events (
                id, name, date, time, description,
                photo_file_name, photo_content_type, photo_file_size, photo_updated_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
      )
      .bind(event.id().as_uuid())
      .bind(event.name().as_str())
      .bind(event.date())
      .bind(event.time())
      .bind(event.description())
      .bind(event.photo().map(|p| p.file_name()))
      .bind(event.photo().map(|p| p.content_type()))
      .bind(event.photo().map(|p| p.file_size()))
      .bind(event.photo().map(|p| p.updated_at()))
      .bind(event.created_at())
      .bind(event.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, event: &Event) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE events
            SET name = $2, date = $3, time = $4, description = $5,
                photo_file_name = $6, photo_content_type = $7,
                photo_file_size = $8, photo_updated_at = $9,
                updated_at = $10
            WHERE id = $1
            "#,
      )
      .bind(event.id().as_uuid())
      .bind(event.name().as_str())
      .bind(event.date())
      .bind(event.time())
      .bind(event.description())
      .bind(event.photo().map(|p| p.file_name()))
      .bind(event.photo().map(|p| p.content_type()))
      .bind(event.photo().map(|p| p.file_size()))
      .bind(event.photo().map(|p| p.updated_at()))
      .bind(event.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &EventId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM events WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, InfraError> {
      let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(EventRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Event>, InfraError> {
      let rows = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} ORDER BY date, time"))
         .fetch_all(&self.pool)
         .await?;

      rows.into_iter().map(EventRow::into_entity).collect()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_date_range(
      &self,
      from: NaiveDate,
      to: NaiveDate,
   ) -> Result<Vec<Event>, InfraError> {
      let rows = sqlx::query_as::<_, EventRow>(&format!(
         "{SELECT_EVENT} WHERE date BETWEEN $1 AND $2 ORDER BY date, time"
      ))
      .bind(from)
      .bind(to)
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(EventRow::into_entity).collect()
   }
}
