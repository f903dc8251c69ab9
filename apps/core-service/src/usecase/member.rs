//! # 部員ユースケース
//!
//! 入部申請・承認・プロフィール管理に関するビジネスロジックを実装する。
//!
//! ## 認可
//!
//! - 入部申請（register）は誰でも可能
//! - プロフィール更新は本人または役員
//! - 承認・役員権限変更・削除は役員のみ

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::member::{Email, Member, MemberId, MemberProfile};
use tsudoi_infra::repository::MemberRepository;

use crate::{error::CoreError, usecase::helpers};

/// 部員ユースケース実装
pub struct MemberUseCaseImpl {
   member_repo: Arc<dyn MemberRepository>,
}

impl MemberUseCaseImpl {
   pub fn new(member_repo: Arc<dyn MemberRepository>) -> Self {
      Self { member_repo }
   }

   /// 入部申請として部員を登録する
   ///
   /// 作成された部員は `request = true`（承認待ち）で保存される。
   /// メールアドレスが登録済みの場合は Conflict。
   pub async fn register(
      &self,
      email: Email,
      profile: MemberProfile,
      now: DateTime<Utc>,
   ) -> Result<Member, CoreError> {
      let member = Member::new(MemberId::new(), email, profile, now);
      self.member_repo.insert(&member).await?;
      Ok(member)
   }

   /// 部員を取得する
   pub async fn get(&self, id: &MemberId) -> Result<Member, CoreError> {
      let Some(member) = self.member_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Member: {id}")));
      };
      Ok(member)
   }

   /// 全部員を取得する
   pub async fn list(&self) -> Result<Vec<Member>, CoreError> {
      Ok(self.member_repo.find_all().await?)
   }

   /// プロフィールを更新する（本人または役員）
   pub async fn update_profile(
      &self,
      acting_member_id: &MemberId,
      id: &MemberId,
      profile: MemberProfile,
      now: DateTime<Utc>,
   ) -> Result<Member, CoreError> {
      let actor = helpers::require_member(&self.member_repo, acting_member_id).await?;
      if !actor.is_officer() && acting_member_id != id {
         return Err(CoreError::Forbidden(
            "他の部員のプロフィールは編集できません".to_string(),
         ));
      }

      let member = self.get(id).await?;
      let updated = member.with_profile(profile, now);
      self.member_repo.update(&updated).await?;
      Ok(updated)
   }

   /// 入部申請を承認する（役員のみ）
   pub async fn approve(
      &self,
      acting_member_id: &MemberId,
      id: &MemberId,
      now: DateTime<Utc>,
   ) -> Result<Member, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let member = self.get(id).await?;
      let approved = member.approved(now);
      self.member_repo.update(&approved).await?;
      Ok(approved)
   }

   /// 役員権限を付与・剥奪する（役員のみ）
   pub async fn set_officer(
      &self,
      acting_member_id: &MemberId,
      id: &MemberId,
      officer: bool,
      now: DateTime<Utc>,
   ) -> Result<Member, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let member = self.get(id).await?;
      let updated = member.with_officer(officer, now);
      self.member_repo.update(&updated).await?;
      Ok(updated)
   }

   /// 部員を削除する（役員のみ）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &MemberId,
   ) -> Result<(), CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      // 存在確認してから削除（存在しない ID は NotFound で返す）
      self.get(id).await?;
      self.member_repo.delete(id).await?;
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use tsudoi_infra::mock::MockMemberRepository;

   use super::*;

   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn make_usecase(repo: MockMemberRepository) -> MemberUseCaseImpl {
      MemberUseCaseImpl::new(Arc::new(repo))
   }

   fn add_officer(repo: &MockMemberRepository) -> MemberId {
      let officer = Member::new(
         MemberId::new(),
         Email::new("officer@example.com").unwrap(),
         MemberProfile::default(),
         now(),
      )
      .with_officer(true, now());
      let id = officer.id().clone();
      repo.add_member(officer);
      id
   }

   #[tokio::test]
   async fn test_登録された部員は承認待ちになる() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo.clone());

      let member = sut
         .register(
            Email::new("new@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();

      assert!(member.request());
      assert!(sut.get(member.id()).await.is_ok());
   }

   #[tokio::test]
   async fn test_同じメールアドレスの二重登録はconflict() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo.clone());

      let email = Email::new("dup@example.com").unwrap();
      sut.register(email.clone(), MemberProfile::default(), now())
         .await
         .unwrap();

      let result = sut.register(email, MemberProfile::default(), now()).await;
      assert!(matches!(result, Err(CoreError::Infra(_))));
   }

   #[tokio::test]
   async fn test_役員は申請を承認できる() {
      let repo = MockMemberRepository::new();
      let officer_id = add_officer(&repo);
      let sut = make_usecase(repo.clone());

      let applicant = sut
         .register(
            Email::new("applicant@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();

      let approved = sut
         .approve(&officer_id, applicant.id(), now())
         .await
         .unwrap();

      assert!(!approved.request());
   }

   #[tokio::test]
   async fn test_非役員は申請を承認できない() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo.clone());

      let applicant = sut
         .register(
            Email::new("applicant@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();
      let other = sut
         .register(
            Email::new("other@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();

      let result = sut.approve(other.id(), applicant.id(), now()).await;
      assert!(matches!(result, Err(CoreError::Forbidden(_))));

      // 状態が変わっていないこと
      assert!(sut.get(applicant.id()).await.unwrap().request());
   }

   #[tokio::test]
   async fn test_本人はプロフィールを更新できる() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo.clone());

      let member = sut
         .register(
            Email::new("self@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();

      let updated = sut
         .update_profile(
            member.id(),
            member.id(),
            MemberProfile {
               year: Some("2026".to_string()),
               ..Default::default()
            },
            now(),
         )
         .await
         .unwrap();

      assert_eq!(updated.year(), Some("2026"));
   }

   #[tokio::test]
   async fn test_他人のプロフィール更新は役員のみ() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo.clone());

      let member_a = sut
         .register(
            Email::new("a@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();
      let member_b = sut
         .register(
            Email::new("b@example.com").unwrap(),
            MemberProfile::default(),
            now(),
         )
         .await
         .unwrap();

      let result = sut
         .update_profile(member_a.id(), member_b.id(), MemberProfile::default(), now())
         .await;
      assert!(matches!(result, Err(CoreError::Forbidden(_))));
   }

   #[tokio::test]
   async fn test_存在しない部員の取得はnot_found() {
      let repo = MockMemberRepository::new();
      let sut = make_usecase(repo);

      let result = sut.get(&MemberId::new()).await;
      assert!(matches!(result, Err(CoreError::NotFound(_))));
   }
}
