//! # 開催間近イベント通知ユースケース
//!
//! 外部スケジューラ（cron）から起動され、開催間近ウィンドウ内の
//! イベントをフォロワーにメールで知らせるバッチ処理。
//!
//! ## 設計方針
//!
//! - **現在時刻の注入**: `notify_followers` は `now` を引数で受け取る。
//!   ウィンドウ境界のテストは固定時刻で決定的に行える
//! - **該当イベントなし = 副作用なし**: ウィンドウ内にイベントがなければ
//!   レンダラー・送信系コラボレータには一切触れない
//! - **(イベント, フォロワー) 単位のファンアウト**: 該当イベントごとに
//!   フォロワー 1 名につき 1 通送信する
//! - **中断しない**: 個別の送信失敗は記録・集計するのみで、
//!   バッチ全体は継続する。リポジトリエラーのみ呼び出し元へ伝播する
//! - **冪等**: ストアを一切変更しないため、同じ `now` と同じデータで
//!   何度実行しても送信数は同じになる

use std::sync::Arc;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use tsudoi_domain::{
   event::{Event, upcoming_window},
   following::FollowableRef,
   member::MemberId,
   notification::EventNotification,
};
use tsudoi_infra::repository::{EventRepository, FollowingRepository, MemberRepository};

use crate::{error::CoreError, usecase::notification::NotificationService};

/// 通知バッチの実行結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
   /// ウィンドウ内で見つかったイベント数
   pub upcoming_events: usize,
   /// 送信に成功した通知数
   pub dispatched: usize,
   /// 送信に失敗した通知数（記録済み、リトライなし）
   pub failed: usize,
}

/// 開催間近イベント通知
pub struct UpcomingEventNotifier {
   event_repo: Arc<dyn EventRepository>,
   following_repo: Arc<dyn FollowingRepository>,
   member_repo: Arc<dyn MemberRepository>,
   notification_service: NotificationService,
}

impl UpcomingEventNotifier {
   pub fn new(
      event_repo: Arc<dyn EventRepository>,
      following_repo: Arc<dyn FollowingRepository>,
      member_repo: Arc<dyn MemberRepository>,
      notification_service: NotificationService,
   ) -> Self {
      Self {
         event_repo,
         following_repo,
         member_repo,
         notification_service,
      }
   }

   /// 開催間近イベントのフォロワーへ通知を送信する
   ///
   /// 開催日が `[today, today + 2日]`（両端含む）のイベントを検索し、
   /// イベントごとにフォロワー 1 名につき 1 通のメールを送信する。
   ///
   /// # 引数
   ///
   /// - `now`: 現在時刻（ハンドラ層の Clock から注入）。`today` は
   ///   `now.date_naive()` で導出する
   #[tracing::instrument(skip_all, fields(now = %now))]
   pub async fn notify_followers(
      &self,
      now: DateTime<Utc>,
   ) -> Result<DispatchSummary, CoreError> {
      let today = now.date_naive();
      let (from, to) = upcoming_window(today);

      let events = self.event_repo.find_by_date_range(from, to).await?;

      if events.is_empty() {
         // メール系コラボレータには一切触れずに終了する
         tracing::info!(%from, %to, "開催間近のイベントなし");
         return Ok(DispatchSummary {
            upcoming_events: 0,
            dispatched: 0,
            failed: 0,
         });
      }

      let mut dispatched = 0;
      let mut failed = 0;

      for event in &events {
         let (sent, errors) = self.notify_event_followers(event, now).await?;
         dispatched += sent;
         failed += errors;
      }

      tracing::info!(
         upcoming_events = events.len(),
         dispatched,
         failed,
         "開催間近イベント通知バッチ完了"
      );

      Ok(DispatchSummary {
         upcoming_events: events.len(),
         dispatched,
         failed,
      })
   }

   /// ひとつのイベントについて全フォロワーへ通知する
   ///
   /// 送信の成功数と失敗数を返す。個別の失敗はバッチを中断しない。
   async fn notify_event_followers(
      &self,
      event: &Event,
      now: DateTime<Utc>,
   ) -> Result<(usize, usize), CoreError> {
      let target = FollowableRef::Event(event.id().clone());
      let followings = self.following_repo.find_by_target(&target).await?;

      // 一意制約があるため通常は重複しないが、解決順を安定させつつ重複を除く
      let member_ids: Vec<MemberId> = followings
         .iter()
         .map(|f| f.member_id().clone())
         .unique()
         .collect();

      let followers = self.member_repo.find_by_ids(&member_ids).await?;

      let mut sent = 0;
      let mut errors = 0;

      for follower in &followers {
         let notification = EventNotification::UpcomingEvent {
            event_id:            event.id().clone(),
            event_name:          event.name().as_str().to_string(),
            event_date:          event.date_string(),
            event_time:          event.time_string(),
            event_description:   event.description().to_string(),
            recipient_email:     follower.email().as_str().to_string(),
            recipient_member_id: follower.id().clone(),
         };

         if self.notification_service.notify(notification, now).await {
            sent += 1;
         } else {
            errors += 1;
         }
      }

      Ok((sent, errors))
   }
}

#[cfg(test)]
mod tests {
   use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
   use tsudoi_domain::{
      event::{EventId, NewEvent},
      following::{Following, FollowingId},
      member::{Email, Member, MemberProfile},
   };
   use tsudoi_infra::{
      mock::{
         MockEventRepository,
         MockFollowingRepository,
         MockMemberRepository,
         MockNotificationLogRepository,
         MockNotificationSender,
      },
      repository::FollowingRepository as _,
   };

   use super::*;
   use crate::usecase::notification::TemplateRenderer;

   /// テストの基準時刻（2020-03-05 12:00:00 UTC）
   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2020, 3, 5, 12, 0, 0).unwrap()
   }

   fn today() -> NaiveDate {
      now().date_naive()
   }

   struct Fixture {
      sut: UpcomingEventNotifier,
      event_repo: MockEventRepository,
      following_repo: MockFollowingRepository,
      member_repo: MockMemberRepository,
      sender: MockNotificationSender,
      log_repo: MockNotificationLogRepository,
   }

   fn make_fixture_with_sender(sender: MockNotificationSender) -> Fixture {
      let event_repo = MockEventRepository::new();
      let following_repo = MockFollowingRepository::new();
      let member_repo = MockMemberRepository::new();
      let log_repo = MockNotificationLogRepository::new();

      let notification_service = NotificationService::new(
         Arc::new(sender.clone()),
         TemplateRenderer::new().unwrap(),
         Arc::new(log_repo.clone()),
         "http://localhost:5173".to_string(),
      );

      let sut = UpcomingEventNotifier::new(
         Arc::new(event_repo.clone()),
         Arc::new(following_repo.clone()),
         Arc::new(member_repo.clone()),
         notification_service,
      );

      Fixture {
         sut,
         event_repo,
         following_repo,
         member_repo,
         sender,
         log_repo,
      }
   }

   fn make_fixture() -> Fixture {
      make_fixture_with_sender(MockNotificationSender::new())
   }

   fn make_event(date: NaiveDate) -> Event {
      Event::new(
         EventId::new(),
         NewEvent {
            name:        Some("ボルダリング大会".to_string()),
            date:        Some(date),
            time:        NaiveTime::from_hms_opt(17, 30, 0),
            description: Some("年に一度の学内大会".to_string()),
         },
         now(),
      )
      .unwrap()
   }

   fn make_member(email: &str) -> Member {
      Member::new(
         MemberId::new(),
         Email::new(email).unwrap(),
         MemberProfile::default(),
         now(),
      )
   }

   async fn add_follower(f: &Fixture, event: &Event, email: &str) -> Member {
      let member = make_member(email);
      f.member_repo.add_member(member.clone());
      f.following_repo
         .insert(&Following::new(
            FollowingId::new(),
            member.id().clone(),
            FollowableRef::Event(event.id().clone()),
            now(),
         ))
         .await
         .unwrap();
      member
   }

   // ===== 副作用なしのケース =====

   #[tokio::test]
   async fn test_開催間近イベントがなければメール系に一切触れない() {
      let f = make_fixture();

      // ウィンドウ外のイベントのみ（3日後と過去）
      f.event_repo.add_event(make_event(today() + Duration::days(3)));
      f.event_repo.add_event(make_event(today() - Duration::days(1)));

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(
         summary,
         DispatchSummary {
            upcoming_events: 0,
            dispatched: 0,
            failed: 0,
         }
      );
      assert!(f.sender.sent_emails().is_empty());
      assert!(f.log_repo.logs().is_empty());
   }

   #[tokio::test]
   async fn test_イベントが全くなければ送信数0() {
      let f = make_fixture();

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.dispatched, 0);
      assert!(f.sender.sent_emails().is_empty());
   }

   // ===== ウィンドウ境界のケース =====

   #[tokio::test]
   async fn test_2日後のイベントは通知対象になる() {
      let f = make_fixture();
      let event = make_event(today() + Duration::days(2));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "climber@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.upcoming_events, 1);
      assert!(summary.dispatched >= 1);
      assert_eq!(f.sender.sent_emails().len(), 1);
   }

   #[tokio::test]
   async fn test_開催当日のイベントも通知対象になる() {
      let f = make_fixture();
      let event = make_event(today());
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "climber@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.dispatched, 1);
   }

   #[tokio::test]
   async fn test_3日後のイベントは通知対象にならない() {
      let f = make_fixture();
      let event = make_event(today() + Duration::days(3));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "climber@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.upcoming_events, 0);
      assert!(f.sender.sent_emails().is_empty());
   }

   // ===== ファンアウトのケース =====

   #[tokio::test]
   async fn test_フォロワー1名につき1通送信される() {
      let f = make_fixture();
      let event = make_event(today() + Duration::days(1));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "alice@example.com").await;
      add_follower(&f, &event, "bob@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.dispatched, 2);
      let recipients: Vec<String> =
         f.sender.sent_emails().iter().map(|e| e.to.clone()).collect();
      assert!(recipients.contains(&"alice@example.com".to_string()));
      assert!(recipients.contains(&"bob@example.com".to_string()));
   }

   #[tokio::test]
   async fn test_フォロワーのいないイベントは送信数0() {
      let f = make_fixture();
      f.event_repo.add_event(make_event(today() + Duration::days(1)));

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.upcoming_events, 1);
      assert_eq!(summary.dispatched, 0);
      assert!(f.sender.sent_emails().is_empty());
   }

   #[tokio::test]
   async fn test_複数イベントでイベントごとにファンアウトされる() {
      let f = make_fixture();
      let event_a = make_event(today());
      let event_b = make_event(today() + Duration::days(2));
      f.event_repo.add_event(event_a.clone());
      f.event_repo.add_event(event_b.clone());

      // alice は両方、bob は event_b のみフォロー
      let alice = add_follower(&f, &event_a, "alice@example.com").await;
      f.following_repo
         .insert(&Following::new(
            FollowingId::new(),
            alice.id().clone(),
            FollowableRef::Event(event_b.id().clone()),
            now(),
         ))
         .await
         .unwrap();
      add_follower(&f, &event_b, "bob@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.upcoming_events, 2);
      assert_eq!(summary.dispatched, 3);
   }

   // ===== 決定性・冪等性のケース =====

   #[tokio::test]
   async fn test_同じnowとデータで2回実行しても送信数は同じ() {
      let f = make_fixture();
      let event = make_event(today() + Duration::days(2));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "alice@example.com").await;
      add_follower(&f, &event, "bob@example.com").await;

      let first = f.sut.notify_followers(now()).await.unwrap();
      let second = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(first, second);
      assert_eq!(first.dispatched, 2);
      // 通知バッチはストアを変更しない（フォロー関係もイベントも不変）
      assert_eq!(f.following_repo.count(), 2);
      assert_eq!(f.event_repo.find_all().await.unwrap().len(), 1);
   }

   // ===== 送信失敗のケース =====

   #[tokio::test]
   async fn test_送信失敗はバッチを中断せず集計される() {
      let f = make_fixture_with_sender(MockNotificationSender::failing());
      let event = make_event(today() + Duration::days(1));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "alice@example.com").await;
      add_follower(&f, &event, "bob@example.com").await;

      let summary = f.sut.notify_followers(now()).await.unwrap();

      assert_eq!(summary.dispatched, 0);
      assert_eq!(summary.failed, 2);
      // 失敗も notification_logs に記録される
      let logs = f.log_repo.logs();
      assert_eq!(logs.len(), 2);
      assert!(logs.iter().all(|l| l.status == "failed"));
   }

   // ===== メール内容のケース =====

   #[tokio::test]
   async fn test_メールにフォーマット済みの日時が含まれる() {
      let f = make_fixture();
      let event = make_event(today() + Duration::days(2));
      f.event_repo.add_event(event.clone());
      add_follower(&f, &event, "climber@example.com").await;

      f.sut.notify_followers(now()).await.unwrap();

      let sent = f.sender.sent_emails();
      assert_eq!(sent.len(), 1);
      // 2020-03-07 → "03/07/2020"、17:30 → "5:30 PM"
      assert!(sent[0].subject.contains("03/07/2020"));
      assert!(sent[0].text_body.contains("03/07/2020"));
      assert!(sent[0].text_body.contains("5:30 PM"));
   }
}
