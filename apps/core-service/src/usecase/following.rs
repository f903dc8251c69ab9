//! # フォローユースケース
//!
//! イベントのフォロー・フォロー解除とフォロワー一覧の取得を実装する。
//!
//! ## 冪等性
//!
//! 同じ (部員, イベント) の二重フォローは永続化層の一意制約で
//! 黙って重複排除される。`follow_event` は新規フォローかどうかを返す。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   event::{Event, EventId},
   following::{FollowableRef, Following, FollowingId},
   member::{Member, MemberId},
};
use tsudoi_infra::repository::{EventRepository, FollowingRepository, MemberRepository};

use crate::{error::CoreError, usecase::helpers};

/// フォローユースケース実装
pub struct FollowUseCaseImpl {
   following_repo: Arc<dyn FollowingRepository>,
   event_repo: Arc<dyn EventRepository>,
   member_repo: Arc<dyn MemberRepository>,
}

impl FollowUseCaseImpl {
   pub fn new(
      following_repo: Arc<dyn FollowingRepository>,
      event_repo: Arc<dyn EventRepository>,
      member_repo: Arc<dyn MemberRepository>,
   ) -> Self {
      Self {
         following_repo,
         event_repo,
         member_repo,
      }
   }

   /// イベントをフォローする（冪等）
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 新規にフォローした
   /// - `Ok(false)`: 既にフォロー済みだった（状態は変わらない）
   pub async fn follow_event(
      &self,
      member_id: &MemberId,
      event_id: &EventId,
      now: DateTime<Utc>,
   ) -> Result<bool, CoreError> {
      helpers::require_member(&self.member_repo, member_id).await?;
      self.require_event(event_id).await?;

      let following = Following::new(
         FollowingId::new(),
         member_id.clone(),
         FollowableRef::Event(event_id.clone()),
         now,
      );
      Ok(self.following_repo.insert(&following).await?)
   }

   /// イベントのフォローを解除する
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 解除した
   /// - `Ok(false)`: フォローしていなかった
   pub async fn unfollow_event(
      &self,
      member_id: &MemberId,
      event_id: &EventId,
   ) -> Result<bool, CoreError> {
      let target = FollowableRef::Event(event_id.clone());
      Ok(self
         .following_repo
         .delete_by_member_and_target(member_id, &target)
         .await?)
   }

   /// イベントのフォロワー（部員）一覧を取得する
   pub async fn list_followers(&self, event_id: &EventId) -> Result<Vec<Member>, CoreError> {
      self.require_event(event_id).await?;

      let target = FollowableRef::Event(event_id.clone());
      let followings = self.following_repo.find_by_target(&target).await?;
      let member_ids: Vec<MemberId> = followings
         .iter()
         .map(|f| f.member_id().clone())
         .collect();
      Ok(self.member_repo.find_by_ids(&member_ids).await?)
   }

   /// 部員がフォローしているイベント一覧を取得する
   pub async fn list_followed_events(
      &self,
      member_id: &MemberId,
   ) -> Result<Vec<Event>, CoreError> {
      helpers::require_member(&self.member_repo, member_id).await?;

      let followings = self.following_repo.find_by_member(member_id).await?;
      let mut events = Vec::new();
      for following in followings {
         let FollowableRef::Event(event_id) = following.target();
         if let Some(event) = self.event_repo.find_by_id(event_id).await? {
            events.push(event);
         }
      }
      Ok(events)
   }

   async fn require_event(&self, event_id: &EventId) -> Result<Event, CoreError> {
      let Some(event) = self.event_repo.find_by_id(event_id).await? else {
         return Err(CoreError::NotFound(format!("Event: {event_id}")));
      };
      Ok(event)
   }
}

#[cfg(test)]
mod tests {
   use chrono::{NaiveDate, NaiveTime};
   use tsudoi_domain::{
      event::NewEvent,
      member::{Email, MemberProfile},
   };
   use tsudoi_infra::mock::{
      MockEventRepository,
      MockFollowingRepository,
      MockMemberRepository,
   };

   use super::*;

   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   struct Fixture {
      sut: FollowUseCaseImpl,
      following_repo: MockFollowingRepository,
      member_id: MemberId,
      event_id: EventId,
   }

   fn make_fixture() -> Fixture {
      let member_repo = MockMemberRepository::new();
      let member = tsudoi_domain::member::Member::new(
         MemberId::new(),
         Email::new("climber@example.com").unwrap(),
         MemberProfile::default(),
         now(),
      );
      let member_id = member.id().clone();
      member_repo.add_member(member);

      let event_repo = MockEventRepository::new();
      let event = Event::new(
         EventId::new(),
         NewEvent {
            name:        Some("ボルダリング大会".to_string()),
            date:        NaiveDate::from_ymd_opt(2020, 3, 5),
            time:        NaiveTime::from_hms_opt(17, 30, 0),
            description: Some("年に一度の学内大会".to_string()),
         },
         now(),
      )
      .unwrap();
      let event_id = event.id().clone();
      event_repo.add_event(event);

      let following_repo = MockFollowingRepository::new();
      let sut = FollowUseCaseImpl::new(
         Arc::new(following_repo.clone()),
         Arc::new(event_repo),
         Arc::new(member_repo),
      );

      Fixture {
         sut,
         following_repo,
         member_id,
         event_id,
      }
   }

   #[tokio::test]
   async fn test_フォローでフォロワーに追加される() {
      let f = make_fixture();

      let inserted = f
         .sut
         .follow_event(&f.member_id, &f.event_id, now())
         .await
         .unwrap();

      assert!(inserted);
      let followers = f.sut.list_followers(&f.event_id).await.unwrap();
      assert_eq!(followers.len(), 1);
      assert_eq!(followers[0].id(), &f.member_id);
   }

   #[tokio::test]
   async fn test_二重フォローは黙って重複排除される() {
      let f = make_fixture();

      let first = f
         .sut
         .follow_event(&f.member_id, &f.event_id, now())
         .await
         .unwrap();
      let second = f
         .sut
         .follow_event(&f.member_id, &f.event_id, now())
         .await
         .unwrap();

      assert!(first);
      assert!(!second);
      // フォロー行がひとつしか残らないこと
      assert_eq!(f.following_repo.count(), 1);
   }

   #[tokio::test]
   async fn test_フォロー解除でフォロワーから外れる() {
      let f = make_fixture();
      f.sut
         .follow_event(&f.member_id, &f.event_id, now())
         .await
         .unwrap();

      let removed = f
         .sut
         .unfollow_event(&f.member_id, &f.event_id)
         .await
         .unwrap();

      assert!(removed);
      assert!(f.sut.list_followers(&f.event_id).await.unwrap().is_empty());
   }

   #[tokio::test]
   async fn test_フォローしていない解除はfalse() {
      let f = make_fixture();

      let removed = f
         .sut
         .unfollow_event(&f.member_id, &f.event_id)
         .await
         .unwrap();

      assert!(!removed);
   }

   #[tokio::test]
   async fn test_存在しないイベントのフォローはnot_found() {
      let f = make_fixture();

      let result = f
         .sut
         .follow_event(&f.member_id, &EventId::new(), now())
         .await;

      assert!(matches!(result, Err(CoreError::NotFound(_))));
   }

   #[tokio::test]
   async fn test_フォロー中イベント一覧() {
      let f = make_fixture();
      f.sut
         .follow_event(&f.member_id, &f.event_id, now())
         .await
         .unwrap();

      let events = f.sut.list_followed_events(&f.member_id).await.unwrap();

      assert_eq!(events.len(), 1);
      assert_eq!(events[0].id(), &f.event_id);
   }
}
