//! # MemberRepository
//!
//! 部員情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **メールアドレス一意**: email の一意制約違反は Conflict に変換
//! - **一括取得**: N+1 問題を避けるため `find_by_ids` を提供
//!   （通知のフォロワー解決で使用する）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tsudoi_domain::{
   attachment::PhotoMetadata,
   member::{Email, Member, MemberId},
   value_objects::{PersonName, StudentId},
};
use uuid::Uuid;

use crate::error::InfraError;

/// 部員リポジトリトレイト
///
/// 部員情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait MemberRepository: Send + Sync {
   /// 部員を登録する
   ///
   /// # エラー
   ///
   /// メールアドレスが既に登録済みの場合は `InfraErrorKind::Conflict`。
   async fn insert(&self, member: &Member) -> Result<(), InfraError>;

   /// 部員を更新する
   async fn update(&self, member: &Member) -> Result<(), InfraError>;

   /// 部員を削除する
   async fn delete(&self, id: &MemberId) -> Result<(), InfraError>;

   /// ID で部員を検索
   async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, InfraError>;

   /// メールアドレスで部員を検索
   async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, InfraError>;

   /// 複数の ID で部員を一括検索
   ///
   /// 存在しない ID は無視し、見つかった部員のみ返す。
   /// 空の配列を渡した場合は空の Vec を返す。
   async fn find_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, InfraError>;

   /// 全部員を取得（メールアドレス順）
   async fn find_all(&self) -> Result<Vec<Member>, InfraError>;
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
   id: Uuid,
   email: String,
   first_name: Option<String>,
   last_name: Option<String>,
   student_id: Option<String>,
   year: Option<String>,
   competitive: bool,
   officer: bool,
   position: Option<String>,
   request: bool,
   avatar_file_name: Option<String>,
   avatar_content_type: Option<String>,
   avatar_file_size: Option<i64>,
   avatar_updated_at: Option<DateTime<Utc>>,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl MemberRow {
   fn into_entity(self) -> Result<Member, InfraError> {
      Ok(Member::from_db(
         MemberId::from_uuid(self.id),
         Email::new(&self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
         self
            .first_name
            .map(PersonName::new)
            .transpose()
            .map_err(|e| InfraError::unexpected(e.to_string()))?,
         self
            .last_name
            .map(PersonName::new)
            .transpose()
            .map_err(|e| InfraError::unexpected(e.to_string()))?,
         self
            .student_id
            .map(StudentId::new)
            .transpose()
            .map_err(|e| InfraError::unexpected(e.to_string()))?,
         self.year,
         self.competitive,
         self.officer,
         self.position,
         self.request,
         PhotoMetadata::from_db(
            self.avatar_file_name,
            self.avatar_content_type,
            self.avatar_file_size,
            self.avatar_updated_at,
         ),
         self.created_at,
         self.updated_at,
      ))
   }
}

const SELECT_MEMBER: &str = r#"
   SELECT
       id, email, first_name, last_name, student_id, year,
       competitive, officer, position, request,
       avatar_file_name, avatar_content_type, avatar_file_size, avatar_updated_at,
       created_at, updated_at
   FROM members
"#;

/// PostgreSQL 実装の MemberRepository
#[derive(Debug, Clone)]
pub struct PostgresMemberRepository {
   pool: PgPool,
}

impl PostgresMemberRepository {
   /// 新しいリポジトリインスタンスを作成
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl MemberRepository for PostgresMemberRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, member: &Member) -> Result<(), InfraError> {
      let result = sqlx::query(
         r#"
            INSERT INTO members (
                id, email, first_name, last_name, student_id, year,
                competitive, officer, position, request,
                avatar_file_name, avatar_content_type, avatar_file_size, avatar_updated_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
      )
      .bind(member.id().as_uuid())
      .bind(member.email().as_str())
      .bind(member.first_name().map(|n| n.as_str()))
      .bind(member.last_name().map(|n| n.as_str()))
      .bind(member.student_id().map(|s| s.as_str()))
      .bind(member.year())
      .bind(member.competitive())
      .bind(member.is_officer())
      .bind(member.position())
      .bind(member.request())
      .bind(member.avatar().map(|p| p.file_name()))
      .bind(member.avatar().map(|p| p.content_type()))
      .bind(member.avatar().map(|p| p.file_size()))
      .bind(member.avatar().map(|p| p.updated_at()))
      .bind(member.created_at())
      .bind(member.updated_at())
      .execute(&self.pool)
      .await;

      match result {
         Ok(_) => Ok(()),
         Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            InfraError::conflict("Member", member.email().as_str()),
         ),
         Err(e) => Err(e.into()),
      }
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn update(&self, member: &Member) -> Result<(), InfraError> {
      sqlx::query(
         r#"
            UPDATE members
            SET email = $2, first_name = $3, last_name = $4, student_id = $5,
                year = $6, competitive = $7, officer = $8, position = $9, request = $10,
                avatar_file_name = $11, avatar_content_type = $12,
                avatar_file_size = $13, avatar_updated_at = $14,
                updated_at = $15
            WHERE id = $1
            "#,
      )
      .bind(member.id().as_uuid())
      .bind(member.email().as_str())
      .bind(member.first_name().map(|n| n.as_str()))
      .bind(member.last_name().map(|n| n.as_str()))
      .bind(member.student_id().map(|s| s.as_str()))
      .bind(member.year())
      .bind(member.competitive())
      .bind(member.is_officer())
      .bind(member.position())
      .bind(member.request())
      .bind(member.avatar().map(|p| p.file_name()))
      .bind(member.avatar().map(|p| p.content_type()))
      .bind(member.avatar().map(|p| p.file_size()))
      .bind(member.avatar().map(|p| p.updated_at()))
      .bind(member.updated_at())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn delete(&self, id: &MemberId) -> Result<(), InfraError> {
      sqlx::query("DELETE FROM members WHERE id = $1")
         .bind(id.as_uuid())
         .execute(&self.pool)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, InfraError> {
      let row = sqlx::query_as::<_, MemberRow>(&format!("{SELECT_MEMBER} WHERE id = $1"))
         .bind(id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(MemberRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, InfraError> {
      let row = sqlx::query_as::<_, MemberRow>(&format!("{SELECT_MEMBER} WHERE email = $1"))
         .bind(email.as_str())
         .fetch_optional(&self.pool)
         .await?;

      row.map(MemberRow::into_entity).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, InfraError> {
      if ids.is_empty() {
         return Ok(Vec::new());
      }

      let uuid_ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

      let rows = sqlx::query_as::<_, MemberRow>(&format!("{SELECT_MEMBER} WHERE id = ANY($1)"))
         .bind(&uuid_ids)
         .fetch_all(&self.pool)
         .await?;

      rows.into_iter().map(MemberRow::into_entity).collect()
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Member>, InfraError> {
      let rows = sqlx::query_as::<_, MemberRow>(&format!("{SELECT_MEMBER} ORDER BY email"))
         .fetch_all(&self.pool)
         .await?;

      rows.into_iter().map(MemberRow::into_entity).collect()
   }
}
