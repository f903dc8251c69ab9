//! # 記事ユースケース
//!
//! 記事の作成・編集・削除を実装する。
//!
//! ## 認可
//!
//! - 作成は部員なら誰でも（投稿者 = 操作主体）
//! - 編集は投稿者本人または役員（編集者として記録される）
//! - 削除は投稿者本人または役員

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   article::{Article, ArticleId},
   member::MemberId,
   value_objects::Title,
};
use tsudoi_infra::repository::{ArticleRepository, MemberRepository};

use crate::{error::CoreError, usecase::helpers};

/// 記事ユースケース実装
pub struct ArticleUseCaseImpl {
   article_repo: Arc<dyn ArticleRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl ArticleUseCaseImpl {
   pub fn new(
      article_repo: Arc<dyn ArticleRepository>,
      member_repo: Arc<dyn MemberRepository>,
   ) -> Self {
      Self {
         article_repo,
         member_repo,
      }
   }

   /// 記事を作成する（投稿者 = 操作主体）
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      title: Title,
      body: String,
      now: DateTime<Utc>,
   ) -> Result<Article, CoreError> {
      helpers::require_member(&self.member_repo, acting_member_id).await?;

      let article = Article::new(
         ArticleId::new(),
         title,
         body,
         acting_member_id.clone(),
         now,
      )?;
      self.article_repo.insert(&article).await?;
      Ok(article)
   }

   /// 記事を取得する
   pub async fn get(&self, id: &ArticleId) -> Result<Article, CoreError> {
      let Some(article) = self.article_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Article: {id}")));
      };
      Ok(article)
   }

   /// 全記事を取得する
   pub async fn list(&self) -> Result<Vec<Article>, CoreError> {
      Ok(self.article_repo.find_all().await?)
   }

   /// 記事を編集する（投稿者本人または役員、編集者として記録される）
   pub async fn edit(
      &self,
      acting_member_id: &MemberId,
      id: &ArticleId,
      title: Title,
      body: String,
      now: DateTime<Utc>,
   ) -> Result<Article, CoreError> {
      let actor = helpers::require_member(&self.member_repo, acting_member_id).await?;
      let article = self.get(id).await?;

      if !actor.is_officer() && article.author_id() != acting_member_id {
         return Err(CoreError::Forbidden(
            "記事の編集は投稿者本人または役員のみ可能です".to_string(),
         ));
      }

      let edited = article.edited(title, body, acting_member_id.clone(), now)?;
      self.article_repo.update(&edited).await?;
      Ok(edited)
   }

   /// 記事を削除する（投稿者本人または役員）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &ArticleId,
   ) -> Result<(), CoreError> {
      let actor = helpers::require_member(&self.member_repo, acting_member_id).await?;
      let article = self.get(id).await?;

      if !actor.is_officer() && article.author_id() != acting_member_id {
         return Err(CoreError::Forbidden(
            "記事の削除は投稿者本人または役員のみ可能です".to_string(),
         ));
      }

      self.article_repo.delete(id).await?;
      Ok(())
   }
}
