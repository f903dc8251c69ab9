//! # コメントユースケース
//!
//! 記事・お知らせ・イベントへのコメント投稿・削除を実装する。
//!
//! ## 認可
//!
//! - 投稿は部員なら誰でも
//! - 削除は投稿者本人または役員

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   comment::{Comment, CommentId, CommentableRef},
   member::MemberId,
};
use tsudoi_infra::repository::{CommentRepository, MemberRepository};

use crate::{error::CoreError, usecase::helpers};

/// コメントユースケース実装
pub struct CommentUseCaseImpl {
   comment_repo: Arc<dyn CommentRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl CommentUseCaseImpl {
   pub fn new(
      comment_repo: Arc<dyn CommentRepository>,
      member_repo: Arc<dyn MemberRepository>,
   ) -> Self {
      Self {
         comment_repo,
         member_repo,
      }
   }

   /// コメントを投稿する
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      target: CommentableRef,
      body: String,
      now: DateTime<Utc>,
   ) -> Result<Comment, CoreError> {
      helpers::require_member(&self.member_repo, acting_member_id).await?;

      let comment = Comment::new(
         CommentId::new(),
         body,
         acting_member_id.clone(),
         target,
         now,
      )?;
      self.comment_repo.insert(&comment).await?;
      Ok(comment)
   }

   /// 対象へのコメント一覧を取得する
   pub async fn list_by_target(
      &self,
      target: &CommentableRef,
   ) -> Result<Vec<Comment>, CoreError> {
      Ok(self.comment_repo.find_by_target(target).await?)
   }

   /// コメントを削除する（投稿者本人または役員）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &CommentId,
   ) -> Result<(), CoreError> {
      let actor = helpers::require_member(&self.member_repo, acting_member_id).await?;

      let Some(comment) = self.comment_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Comment: {id}")));
      };

      if !comment.can_be_deleted_by(acting_member_id, actor.is_officer()) {
         return Err(CoreError::Forbidden(
            "コメントの削除は投稿者本人または役員のみ可能です".to_string(),
         ));
      }

      self.comment_repo.delete(id).await?;
      Ok(())
   }
}
