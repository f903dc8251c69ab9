//! # FollowingRepository
//!
//! フォロー関係の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **冪等な follow**: (member_id, followable_id, followable_type) の
//!   一意インデックス + `ON CONFLICT DO NOTHING`。重複フォローは
//!   エラーにせず無視する（戻り値で新規挿入かどうかを返す）
//! - **タグ付きユニオン**: `FollowableRef` を型タグ + UUID に分解して保存

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   following::{FollowableRef, Following, FollowingId},
   member::MemberId,
};
use uuid::Uuid;

use crate::error::InfraError;

/// フォロー関係リポジトリトレイト
#[async_trait]
pub trait FollowingRepository: Send + Sync {
   /// フォロー関係を登録する（冪等）
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 新規に登録された
   /// - `Ok(false)`: 既に同じフォロー関係が存在し、何もしなかった
   async fn insert(&self, following: &Following) -> Result<bool, InfraError>;

   /// フォロー関係を解除する
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 解除した
   /// - `Ok(false)`: 該当するフォロー関係が存在しなかった
   async fn delete_by_member_and_target(
      &self,
      member_id: &MemberId,
      target: &FollowableRef,
   ) -> Result<bool, InfraError>;

   /// 対象のフォロワー（フォロー関係）を取得
   async fn find_by_target(&self, target: &FollowableRef) -> Result<Vec<Following>, InfraError>;

   /// 部員がフォローしている対象を取得
   async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Following>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct FollowingRow {
   id: Uuid,
   member_id: Uuid,
   followable_id: Uuid,
   followable_type: String,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl FollowingRow {
   fn into_entity(self) -> Result<Following, InfraError> {
      let target = FollowableRef::from_db(&self.followable_type, self.followable_id)
         .map_err(|e| InfraError::unexpected(e.to_string()))?;

      Ok(Following::from_db(
         FollowingId::from_uuid(self.id),
         MemberId::from_uuid(self.member_id),
         target,
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_FOLLOWING: &str = r#"
   SELECT id, member_id, followable_id, followable_type, created_at, updated_at
   FROM followings
"#;

/// PostgreSQL 実装の FollowingRepository
#[derive(Debug, Clone)]
pub struct PostgresFollowingRepository {
   pool: PgPool,
}

impl PostgresFollowingRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl FollowingRepository for PostgresFollowingRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, following: &Following) -> Result<bool, InfraError> {
      let tag: &'static str = following.target().followable_type().into();

      let result = sqlx::query(
         r#"
            INSERT INTO followings (
                id, member_id, followable_id, followable_type, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (member_id, followable_id, followable_type) DO NOTHING
            "#,
      )
      .bind(following.id().as_uuid())
      .bind(following.member_id().as_uuid())
      .bind(following.target().followable_id())
      .bind(tag)
      .bind(following.created_at())
      .bind(following.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(result.rows_affected() > 0)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete_by_member_and_target(
      &self,
      member_id: &MemberId,
      target: &FollowableRef,
   ) -> Result<bool, InfraError> {
      let tag: &'static str = target.followable_type().into();

      let result = sqlx::query(
         r#"
            DELETE FROM followings
            WHERE member_id = $1 AND followable_id = $2 AND followable_type = $3
            "#,
      )
      .bind(member_id.as_uuid())
      .bind(target.followable_id())
      .bind(tag)
      .execute(&self.pool)
      .await?;

      Ok(result.rows_affected() > 0)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_target(&self, target: &FollowableRef) -> Result<Vec<Following>, InfraError> {
      let tag: &'static str = target.followable_type().into();

      let rows = sqlx::query_as::<_, FollowingRow>(&format!(
         "{SELECT_FOLLOWING} WHERE followable_id = $1 AND followable_type = $2 ORDER BY created_at"
      ))
      .bind(target.followable_id())
      .bind(tag)
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(FollowingRow::into_entity).collect()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Following>, InfraError> {
      let rows = sqlx::query_as::<_, FollowingRow>(&format!(
         "{SELECT_FOLLOWING} WHERE member_id = $1 ORDER BY created_at"
      ))
      .bind(member_id.as_uuid())
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(FollowingRow::into_entity).collect()
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<PostgresFollowingRepository>();
   }
}
