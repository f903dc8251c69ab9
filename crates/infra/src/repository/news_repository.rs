//! # NewsRepository
//!
//! お知らせの永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   member::MemberId,
   news::{News, NewsId},
   value_objects::Title,
};
use uuid::Uuid;

use crate::error::InfraError;

/// お知らせリポジトリトレイト
#[async_trait]
pub trait NewsRepository: Send + Sync {
   /// お知らせを登録する
   async fn insert(&self, news: &News) -> Result<(), InfraError>;

   /// お知らせを更新する
   async fn update(&self, news: &News) -> Result<(), InfraError>;

   /// お知らせを削除する
   async fn delete(&self, id: &NewsId) -> Result<(), InfraError>;

   /// ID でお知らせを検索
   async fn find_by_id(&self, id: &NewsId) -> Result<Option<News>, InfraError>;

   /// 全お知らせを取得（新しい順）
   async fn find_all(&self) -> Result<Vec<News>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct NewsRow {
   id: Uuid,
   title: String,
   author_id: Uuid,
   body: String,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl NewsRow {
   fn into_entity(self) -> Result<News, InfraError> {
      Ok(News::from_db(
         NewsId::from_uuid(self.id),
         Title::new(&self.title).map_err(|e| InfraError::unexpected(e.to_string()))?,
         MemberId::from_uuid(self.author_id),
         self.body,
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_NEWS: &str = r#"
   SELECT id, title, author_id, body, created_at, updated_at
   FROM news
"#;

/// PostgreSQL 実装の NewsRepository
#[derive(Debug, Clone)]
pub struct PostgresNewsRepository {
   pool: PgPool,
}

impl PostgresNewsRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl NewsRepository for PostgresNewsRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, news: &News) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO news (id, title, author_id, body, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
      )
      .bind(news.id().as_uuid())
      .bind(news.title().as_str())
      .bind(news.author_id().as_uuid())
      .bind(news.body())
      .bind(news.created_at())
      .bind(news.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, news: &News) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE news
            SET title = $2, body = $3, updated_at = $4
            WHERE id = $1
            "#,
      )
      .bind(news.id().as_uuid())
      .bind(news.title().as_str())
      .bind(news.body())
      .bind(news.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &NewsId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM news WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &NewsId) -> Result<Option<News>, InfraError> {
      let row = sqlx::query_as::<_, NewsRow>(&format!("{SELECT_NEWS} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(NewsRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<News>, InfraError> {
      let rows =
         sqlx::query_as::<_, NewsRow>(&format!("{SELECT_NEWS} ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

      rows.into_iter().map(NewsRow::into_entity).collect()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresNewsRepository>();
   }
}
