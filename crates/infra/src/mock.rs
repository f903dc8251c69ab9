//! # テスト用モックリポジトリ
//!
//! ユースケーステストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! tsudoi-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! `MockFollowingRepository` は (member_id, 対象) の一意制約を
//! インメモリでも強制し、重複フォローの冪等性を DB なしで検証できる。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tsudoi_domain::{
   article::{Article, ArticleId},
   comment::{Comment, CommentId, CommentableRef},
   event::{Event, EventId},
   following::{FollowableRef, Following},
   member::{Email, Member, MemberId},
   news::{News, NewsId},
   notification::{EmailMessage, NotificationError},
   practice::{Practice, PracticeId},
   route::{Route, RouteId},
};

use crate::{
   error::InfraError,
   notification::NotificationSender,
   repository::{
      ArticleRepository,
      CommentRepository,
      EventRepository,
      FollowingRepository,
      MemberRepository,
      NewsRepository,
      NotificationLog,
      NotificationLogRepository,
      PracticeRepository,
      RouteRepository,
   },
};

// ===== MockMemberRepository =====

#[derive(Clone, Default)]
pub struct MockMemberRepository {
   members: Arc<Mutex<Vec<Member>>>,
}

impl MockMemberRepository {
   pub fn new() -> Self {
      Self {
         members: Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// テストのセットアップ用に部員を直接追加する
   pub fn add_member(&self, member: Member) {
      self.members.lock().unwrap().push(member);
   }
}

#[async_trait]
impl MemberRepository for MockMemberRepository {
   async fn insert(&self, member: &Member) -> Result<(), InfraError> {
      let mut members = self.members.lock().unwrap();
      if members.iter().any(|m| m.email() == member.email()) {
         return Err(InfraError::conflict("Member", member.email().as_str()));
      }
      members.push(member.clone());
      Ok(())
   }

   async fn update(&self, member: &Member) -> Result<(), InfraError> {
      let mut members = self.members.lock().unwrap();
      if let Some(pos) = members.iter().position(|m| m.id() == member.id()) {
         members[pos] = member.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &MemberId) -> Result<(), InfraError> {
      self.members.lock().unwrap().retain(|m| m.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, InfraError> {
      Ok(self
         .members
         .lock()
         .unwrap()
         .iter()
         .find(|m| m.id() == id)
         .cloned())
   }

   async fn find_by_email(&self, email: &Email) -> Result<Option<Member>, InfraError> {
      Ok(self
         .members
         .lock()
         .unwrap()
         .iter()
         .find(|m| m.email() == email)
         .cloned())
   }

   async fn find_by_ids(&self, ids: &[MemberId]) -> Result<Vec<Member>, InfraError> {
      Ok(self
         .members
         .lock()
         .unwrap()
         .iter()
         .filter(|m| ids.contains(m.id()))
         .cloned()
         .collect())
   }

   async fn find_all(&self) -> Result<Vec<Member>, InfraError> {
      Ok(self.members.lock().unwrap().clone())
   }
}

// ===== MockEventRepository =====

#[derive(Clone, Default)]
pub struct MockEventRepository {
   events: Arc<Mutex<Vec<Event>>>,
}

impl MockEventRepository {
   pub fn new() -> Self {
      Self {
         events: Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// テストのセットアップ用にイベントを直接追加する
   pub fn add_event(&self, event: Event) {
      self.events.lock().unwrap().push(event);
   }
}

#[async_trait]
impl EventRepository for MockEventRepository {
   async fn insert(&self, event: &Event) -> Result<(), InfraError> {
      self.events.lock().unwrap().push(event.clone());
      Ok(())
   }

   async fn update(&self, event: &Event) -> Result<(), InfraError> {
      let mut events = self.events.lock().unwrap();
      if let Some(pos) = events.iter().position(|e| e.id() == event.id()) {
         events[pos] = event.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &EventId) -> Result<(), InfraError> {
      self.events.lock().unwrap().retain(|e| e.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, InfraError> {
      Ok(self
         .events
         .lock()
         .unwrap()
         .iter()
         .find(|e| e.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<Event>, InfraError> {
      Ok(self.events.lock().unwrap().clone())
   }

   async fn find_by_date_range(
      &self,
      from: NaiveDate,
      to: NaiveDate,
   ) -> Result<Vec<Event>, InfraError> {
      Ok(self
         .events
         .lock()
         .unwrap()
         .iter()
         .filter(|e| from <= e.date() && e.date() <= to)
         .cloned()
         .collect())
   }
}

// ===== MockFollowingRepository =====

/// (member_id, 対象) の一意制約をインメモリで強制するモック
#[derive(Clone, Default)]
pub struct MockFollowingRepository {
   followings: Arc<Mutex<Vec<Following>>>,
}

impl MockFollowingRepository {
   pub fn new() -> Self {
      Self {
         followings: Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// 登録済みのフォロー関係の件数を返す
   pub fn count(&self) -> usize {
      self.followings.lock().unwrap().len()
   }
}

#[async_trait]
impl FollowingRepository for MockFollowingRepository {
   async fn insert(&self, following: &Following) -> Result<bool, InfraError> {
      let mut followings = self.followings.lock().unwrap();
      let duplicate = followings.iter().any(|f| {
         f.member_id() == following.member_id() && f.target() == following.target()
      });
      if duplicate {
         // ON CONFLICT DO NOTHING 相当
         return Ok(false);
      }
      followings.push(following.clone());
      Ok(true)
   }

   async fn delete_by_member_and_target(
      &self,
      member_id: &MemberId,
      target: &FollowableRef,
   ) -> Result<bool, InfraError> {
      let mut followings = self.followings.lock().unwrap();
      let before = followings.len();
      followings.retain(|f| !(f.member_id() == member_id && f.target() == target));
      Ok(followings.len() < before)
   }

   async fn find_by_target(&self, target: &FollowableRef) -> Result<Vec<Following>, InfraError> {
      Ok(self
         .followings
         .lock()
         .unwrap()
         .iter()
         .filter(|f| f.target() == target)
         .cloned()
         .collect())
   }

   async fn find_by_member(&self, member_id: &MemberId) -> Result<Vec<Following>, InfraError> {
      Ok(self
         .followings
         .lock()
         .unwrap()
         .iter()
         .filter(|f| f.member_id() == member_id)
         .cloned()
         .collect())
   }
}

// ===== MockNewsRepository =====

#[derive(Clone, Default)]
pub struct MockNewsRepository {
   news: Arc<Mutex<Vec<News>>>,
}

impl MockNewsRepository {
   pub fn new() -> Self {
      Self {
         news: Arc::new(Mutex::new(Vec::new())),
      }
   }
}

#[async_trait]
impl NewsRepository for MockNewsRepository {
   async fn insert(&self, news: &News) -> Result<(), InfraError> {
      self.news.lock().unwrap().push(news.clone());
      Ok(())
   }

   async fn update(&self, news: &News) -> Result<(), InfraError> {
      let mut items = self.news.lock().unwrap();
      if let Some(pos) = items.iter().position(|n| n.id() == news.id()) {
         items[pos] = news.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &NewsId) -> Result<(), InfraError> {
      self.news.lock().unwrap().retain(|n| n.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &NewsId) -> Result<Option<News>, InfraError> {
      Ok(self
         .news
         .lock()
         .unwrap()
         .iter()
         .find(|n| n.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<News>, InfraError> {
      Ok(self.news.lock().unwrap().clone())
   }
}

// ===== MockArticleRepository =====

#[derive(Clone, Default)]
pub struct MockArticleRepository {
   articles: Arc<Mutex<Vec<Article>>>,
}

impl MockArticleRepository {
   pub fn new() -> Self {
      Self {
         articles: Arc::new(Mutex::new(Vec::new())),
      }
   }
}

#[async_trait]
impl ArticleRepository for MockArticleRepository {
   async fn insert(&self, article: &Article) -> Result<(), InfraError> {
      self.articles.lock().unwrap().push(article.clone());
      Ok(())
   }

   async fn update(&self, article: &Article) -> Result<(), InfraError> {
      let mut items = self.articles.lock().unwrap();
      if let Some(pos) = items.iter().position(|a| a.id() == article.id()) {
         items[pos] = article.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &ArticleId) -> Result<(), InfraError> {
      self.articles.lock().unwrap().retain(|a| a.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, InfraError> {
      Ok(self
         .articles
         .lock()
         .unwrap()
         .iter()
         .find(|a| a.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<Article>, InfraError> {
      Ok(self.articles.lock().unwrap().clone())
   }
}

// ===== MockPracticeRepository =====

#[derive(Clone, Default)]
pub struct MockPracticeRepository {
   practices: Arc<Mutex<Vec<Practice>>>,
}

impl MockPracticeRepository {
   pub fn new() -> Self {
      Self {
         practices: Arc::new(Mutex::new(Vec::new())),
      }
   }
}

#[async_trait]
impl PracticeRepository for MockPracticeRepository {
   async fn insert(&self, practice: &Practice) -> Result<(), InfraError> {
      self.practices.lock().unwrap().push(practice.clone());
      Ok(())
   }

   async fn update(&self, practice: &Practice) -> Result<(), InfraError> {
      let mut items = self.practices.lock().unwrap();
      if let Some(pos) = items.iter().position(|p| p.id() == practice.id()) {
         items[pos] = practice.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &PracticeId) -> Result<(), InfraError> {
      self.practices.lock().unwrap().retain(|p| p.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &PracticeId) -> Result<Option<Practice>, InfraError> {
      Ok(self
         .practices
         .lock()
         .unwrap()
         .iter()
         .find(|p| p.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<Practice>, InfraError> {
      Ok(self.practices.lock().unwrap().clone())
   }
}

// ===== MockRouteRepository =====

#[derive(Clone, Default)]
pub struct MockRouteRepository {
   routes: Arc<Mutex<Vec<Route>>>,
}

impl MockRouteRepository {
   pub fn new() -> Self {
      Self {
         routes: Arc::new(Mutex::new(Vec::new())),
      }
   }
}

#[async_trait]
impl RouteRepository for MockRouteRepository {
   async fn insert(&self, route: &Route) -> Result<(), InfraError> {
      self.routes.lock().unwrap().push(route.clone());
      Ok(())
   }

   async fn update(&self, route: &Route) -> Result<(), InfraError> {
      let mut items = self.routes.lock().unwrap();
      if let Some(pos) = items.iter().position(|r| r.id() == route.id()) {
         items[pos] = route.clone();
      }
      Ok(())
   }

   async fn delete(&self, id: &RouteId) -> Result<(), InfraError> {
      self.routes.lock().unwrap().retain(|r| r.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &RouteId) -> Result<Option<Route>, InfraError> {
      Ok(self
         .routes
         .lock()
         .unwrap()
         .iter()
         .find(|r| r.id() == id)
         .cloned())
   }

   async fn find_all(&self) -> Result<Vec<Route>, InfraError> {
      Ok(self.routes.lock().unwrap().clone())
   }
}

// ===== MockCommentRepository =====

#[derive(Clone, Default)]
pub struct MockCommentRepository {
   comments: Arc<Mutex<Vec<Comment>>>,
}

impl MockCommentRepository {
   pub fn new() -> Self {
      Self {
         comments: Arc::new(Mutex::new(Vec::new())),
      }
   }
}

#[async_trait]
impl CommentRepository for MockCommentRepository {
   async fn insert(&self, comment: &Comment) -> Result<(), InfraError> {
      self.comments.lock().unwrap().push(comment.clone());
      Ok(())
   }

   async fn delete(&self, id: &CommentId) -> Result<(), InfraError> {
      self.comments.lock().unwrap().retain(|c| c.id() != id);
      Ok(())
   }

   async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, InfraError> {
      Ok(self
         .comments
         .lock()
         .unwrap()
         .iter()
         .find(|c| c.id() == id)
         .cloned())
   }

   async fn find_by_target(&self, target: &CommentableRef) -> Result<Vec<Comment>, InfraError> {
      Ok(self
         .comments
         .lock()
         .unwrap()
         .iter()
         .filter(|c| c.target() == target)
         .cloned()
         .collect())
   }
}

// ===== MockNotificationLogRepository =====

#[derive(Clone, Default)]
pub struct MockNotificationLogRepository {
   logs: Arc<Mutex<Vec<NotificationLog>>>,
}

impl MockNotificationLogRepository {
   pub fn new() -> Self {
      Self {
         logs: Arc::new(Mutex::new(Vec::new())),
      }
   }

   /// 記録された通知ログを返す
   pub fn logs(&self) -> Vec<NotificationLog> {
      self.logs.lock().unwrap().clone()
   }
}

#[async_trait]
impl NotificationLogRepository for MockNotificationLogRepository {
   async fn insert(&self, log: &NotificationLog) -> Result<(), InfraError> {
      self.logs.lock().unwrap().push(log.clone());
      Ok(())
   }
}

// ===== MockNotificationSender =====

/// 送信したメールをインメモリに記録するモック送信実装
///
/// `failing()` で生成すると常に送信失敗を返し、
/// 通知バッチの失敗ポリシー（中断しない）を検証できる。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
   sent: Arc<Mutex<Vec<EmailMessage>>>,
   fail: bool,
}

impl MockNotificationSender {
   pub fn new() -> Self {
      Self {
         sent: Arc::new(Mutex::new(Vec::new())),
         fail: false,
      }
   }

   /// 常に送信失敗を返すモックを作成する
   pub fn failing() -> Self {
      Self {
         sent: Arc::new(Mutex::new(Vec::new())),
         fail: true,
      }
   }

   /// 送信されたメールを返す
   pub fn sent_emails(&self) -> Vec<EmailMessage> {
      self.sent.lock().unwrap().clone()
   }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
   async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
      if self.fail {
         return Err(NotificationError::SendFailed(
            "モック送信失敗".to_string(),
         ));
      }
      self.sent.lock().unwrap().push(email.clone());
      Ok(())
   }
}
