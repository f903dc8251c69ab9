//! # お知らせユースケース
//!
//! お知らせの作成・更新・削除を実装する。変更操作は役員のみ。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   member::MemberId,
   news::{News, NewsId},
   value_objects::Title,
};
use tsudoi_infra::repository::{MemberRepository, NewsRepository};

use crate::{error::CoreError, usecase::helpers};

/// お知らせユースケース実装
pub struct NewsUseCaseImpl {
   news_repo: Arc<dyn NewsRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl NewsUseCaseImpl {
   pub fn new(news_repo: Arc<dyn NewsRepository>, member_repo: Arc<dyn MemberRepository>) -> Self {
      Self {
         news_repo,
         member_repo,
      }
   }

   /// お知らせを作成する（役員のみ、投稿者 = 操作主体）
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      title: Title,
      body: String,
      now: DateTime<Utc>,
   ) -> Result<News, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let news = News::new(NewsId::new(), title, acting_member_id.clone(), body, now)?;
      self.news_repo.insert(&news).await?;
      Ok(news)
   }

   /// お知らせを取得する
   pub async fn get(&self, id: &NewsId) -> Result<News, CoreError> {
      let Some(news) = self.news_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("News: {id}")));
      };
      Ok(news)
   }

   /// 全お知らせを取得する
   pub async fn list(&self) -> Result<Vec<News>, CoreError> {
      Ok(self.news_repo.find_all().await?)
   }

   /// お知らせを更新する（役員のみ）
   pub async fn update(
      &self,
      acting_member_id: &MemberId,
      id: &NewsId,
      title: Title,
      body: String,
      now: DateTime<Utc>,
   ) -> Result<News, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let news = self.get(id).await?;
      let updated = news.with_content(title, body, now)?;
      self.news_repo.update(&updated).await?;
      Ok(updated)
   }

   /// お知らせを削除する（役員のみ）
   pub async fn delete(&self, acting_member_id: &MemberId, id: &NewsId) -> Result<(), CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      self.get(id).await?;
      self.news_repo.delete(id).await?;
      Ok(())
   }
}
