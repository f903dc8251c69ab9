//! # 練習ユースケース
//!
//! 定期練習スケジュールの管理を実装する。変更操作は役員のみ。

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use tsudoi_domain::{
   member::MemberId,
   practice::{Practice, PracticeId},
};
use tsudoi_infra::repository::{MemberRepository, PracticeRepository};

use crate::{error::CoreError, usecase::helpers};

/// 練習ユースケース実装
pub struct PracticeUseCaseImpl {
   practice_repo: Arc<dyn PracticeRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl PracticeUseCaseImpl {
   pub fn new(
      practice_repo: Arc<dyn PracticeRepository>,
      member_repo: Arc<dyn MemberRepository>,
   ) -> Self {
      Self {
         practice_repo,
         member_repo,
      }
   }

   /// 練習を作成する（役員のみ）
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      day: String,
      time: Option<NaiveTime>,
      location: Option<String>,
      now: DateTime<Utc>,
   ) -> Result<Practice, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let practice = Practice::new(PracticeId::new(), day, time, location, now)?;
      self.practice_repo.insert(&practice).await?;
      Ok(practice)
   }

   /// 練習を取得する
   pub async fn get(&self, id: &PracticeId) -> Result<Practice, CoreError> {
      let Some(practice) = self.practice_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Practice: {id}")));
      };
      Ok(practice)
   }

   /// 全練習を取得する
   pub async fn list(&self) -> Result<Vec<Practice>, CoreError> {
      Ok(self.practice_repo.find_all().await?)
   }

   /// 練習を更新する（役員のみ）
   pub async fn update(
      &self,
      acting_member_id: &MemberId,
      id: &PracticeId,
      day: String,
      time: Option<NaiveTime>,
      location: Option<String>,
      now: DateTime<Utc>,
   ) -> Result<Practice, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let practice = self.get(id).await?;
      let updated = practice.with_schedule(day, time, location, now)?;
      self.practice_repo.update(&updated).await?;
      Ok(updated)
   }

   /// 練習を削除する（役員のみ）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &PracticeId,
   ) -> Result<(), CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      self.get(id).await?;
      self.practice_repo.delete(id).await?;
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use tsudoi_domain::member::{Email, Member, MemberProfile};
   use tsudoi_infra::mock::{MockMemberRepository, MockPracticeRepository};

   use super::*;

   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn make_fixture() -> (PracticeUseCaseImpl, MemberId, MemberId) {
      let member_repo = MockMemberRepository::new();

      let officer = Member::new(
         MemberId::new(),
         Email::new("officer@example.com").unwrap(),
         MemberProfile::default(),
         now(),
      )
      .with_officer(true, now());
      let officer_id = officer.id().clone();
      member_repo.add_member(officer);

      let member = Member::new(
         MemberId::new(),
         Email::new("member@example.com").unwrap(),
         MemberProfile::default(),
         now(),
      );
      let member_id = member.id().clone();
      member_repo.add_member(member);

      let sut = PracticeUseCaseImpl::new(
         Arc::new(MockPracticeRepository::new()),
         Arc::new(member_repo),
      );

      (sut, officer_id, member_id)
   }

   #[tokio::test]
   async fn test_役員は練習を作成できる() {
      let (sut, officer_id, _) = make_fixture();

      let practice = sut
         .create(
            &officer_id,
            "Tuesday".to_string(),
            NaiveTime::from_hms_opt(19, 0, 0),
            Some("第2体育館".to_string()),
            now(),
         )
         .await
         .unwrap();

      assert_eq!(practice.day(), "Tuesday");
      assert_eq!(sut.list().await.unwrap().len(), 1);
   }

   #[tokio::test]
   async fn test_非役員の練習作成はforbidden() {
      let (sut, _, member_id) = make_fixture();

      let result = sut
         .create(&member_id, "Tuesday".to_string(), None, None, now())
         .await;

      assert!(matches!(result, Err(CoreError::Forbidden(_))));
   }

   #[tokio::test]
   async fn test_空の曜日はbad_request() {
      let (sut, officer_id, _) = make_fixture();

      let result = sut
         .create(&officer_id, "  ".to_string(), None, None, now())
         .await;

      assert!(matches!(result, Err(CoreError::BadRequest(_))));
   }
}
