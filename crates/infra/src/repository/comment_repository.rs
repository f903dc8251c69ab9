//! # CommentRepository
//!
//! コメントの永続化を担当するリポジトリ。
//! 対象参照は FollowingRepository と同じく型タグ + UUID に分解して保存する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   comment::{Comment, CommentId, CommentableRef},
   member::MemberId,
};
use uuid::Uuid;

use crate::error::InfraError;

/// コメントリポジトリトレイト
#[async_trait]
pub trait CommentRepository: Send + Sync {
   /// コメントを登録する
   async fn insert(&self, comment: &Comment) -> Result<(), InfraError>;

   /// コメントを削除する
   async fn delete(&self, id: &CommentId) -> Result<(), InfraError>;

   /// ID でコメントを検索
   async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, InfraError>;

   /// 対象へのコメントを取得（古い順）
   async fn find_by_target(&self, target: &CommentableRef) -> Result<Vec<Comment>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
   id: Uuid,
   comment: String,
   commenter_id: Uuid,
   commentable_id: Uuid,
   commentable_type: String,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl CommentRow {
   fn into_entity(self) -> Result<Comment, InfraError> {
      let target = CommentableRef::from_db(&self.commentable_type, self.commentable_id)
         .map_err(|e| InfraError::unexpected(e.to_string()))?;

      Ok(Comment::from_db(
         CommentId::from_uuid(self.id),
         self.comment,
         MemberId::from_uuid(self.commenter_id),
         target,
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_COMMENT: &str = r#"
   SELECT id, comment, commenter_id, commentable_id, commentable_type, created_at, updated_at
   FROM comments
"#;

/// PostgreSQL 実装の CommentRepository
#[derive(Debug, Clone)]
pub struct PostgresCommentRepository {
   pool: PgPool,
}

impl PostgresCommentRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, comment: &Comment) -> Result<(), InfraError> {
      let tag: &'static str = comment.target().commentable_type().into();

      sqlx::query(
         r#"
            INSERT INTO comments (
                id, comment, commenter_id, commentable_id, commentable_type,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
      )
      .bind(comment.id().as_uuid())
      .bind(comment.body())
      .bind(comment.commenter_id().as_uuid())
      .bind(comment.target().commentable_id())
      .bind(tag)
      .bind(comment.created_at())
      .bind(comment.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &CommentId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM comments WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, InfraError> {
      let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENT} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(CommentRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_target(&self, target: &CommentableRef) -> Result<Vec<Comment>, InfraError> {
      let tag: &'static str = target.commentable_type().into();

      let rows = sqlx::query_as::<_, CommentRow>(&format!(
         "{SELECT_COMMENT} WHERE commentable_id = $1 AND commentable_type = $2 ORDER BY created_at"
      ))
      .bind(target.commentable_id())
      .bind(tag)
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(CommentRow::into_entity).collect()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresCommentRepository>();
   }
}
