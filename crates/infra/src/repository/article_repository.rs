//! # ArticleRepository
//!
//! 記事の永続化を担当するリポジトリ。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   article::{Article, ArticleId},
   member::MemberId,
   value_objects::Title,
};
use uuid::Uuid;

use crate::error::InfraError;

/// 記事リポジトリトレイト
#[async_trait]
pub trait ArticleRepository: Send + Sync {
   /// 記事を登録する
   async fn insert(&self, article: &Article) -> Result<(), InfraError>;

   /// 記事を更新する
   async fn update(&self, article: &Article) -> Result<(), InfraError>;

   /// 記事を削除する
   async fn delete(&self, id: &ArticleId) -> Result<(), InfraError>;

   /// ID で記事を検索
   async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, InfraError>;

   /// 全記事を取得（新しい順）
   async fn find_all(&self) -> Result<Vec<Article>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
   id: Uuid,
   title: String,
   body: String,
   author_id: Uuid,
   editor_id: Option<Uuid>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl ArticleRow {
   fn into_entity(self) -> Result<Article, InfraError> {
      Ok(Article::from_db(
         ArticleId::from_uuid(self.id),
         Title::new(&self.title).map_err(|e| InfraError::unexpected(e.to_string()))?,
         self.body,
         MemberId::from_uuid(self.author_id),
         self.editor_id.map(MemberId::from_uuid),
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_ARTICLE: &str = r#"
   SELECT id, title, body, author_id, editor_id, created_at, updated_at
   FROM articles
"#;

/// PostgreSQL 実装の ArticleRepository
#[derive(Debug, Clone)]
pub struct PostgresArticleRepository {
   pool: PgPool,
}

impl PostgresArticleRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, article: &Article) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            INSERT INTO articles (id, title, body, author_id, editor_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
      )
      .bind(article.id().as_uuid())
      .bind(article.title().as_str())
      .bind(article.body())
      .bind(article.author_id().as_uuid())
      .bind(article.editor_id().map(|id| id.as_uuid()))
      .bind(article.created_at())
      .bind(article.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, article: &Article) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE articles
            SET title = $2, body = $3, editor_id = $4, updated_at = $5
            WHERE id = $1
            "#,
      )
      .bind(article.id().as_uuid())
      .bind(article.title().as_str())
      .bind(article.body())
      .bind(article.editor_id().map(|id| id.as_uuid()))
      .bind(article.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &ArticleId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM articles WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, InfraError> {
      let row = sqlx::query_as::<_, ArticleRow>(&format!("{SELECT_ARTICLE} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(ArticleRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Article>, InfraError> {
      let rows =
         sqlx::query_as::<_, ArticleRow>(&format!("{SELECT_ARTICLE} ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

      rows.into_iter().map(ArticleRow::into_entity).collect()
   }
}
