//! # イベントユースケース
//!
//! イベントの作成・更新・削除と写真添付に関するビジネスロジックを実装する。
//!
//! ## 認可
//!
//! すべての変更操作は役員のみ。閲覧は誰でも可能。
//!
//! ## 写真添付のフロー
//!
//! 1. `issue_photo_upload_url` で Presigned PUT URL を発行（メタデータ検証込み）
//! 2. クライアントが S3 に直接アップロード
//! 3. `confirm_photo` で S3 上の存在を確認し、メタデータを保存

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tsudoi_domain::{
   attachment::PhotoMetadata,
   event::{Event, EventId, NewEvent},
   member::MemberId,
};
use tsudoi_infra::{
   repository::{EventRepository, MemberRepository},
   storage::PhotoStorage,
};

use crate::{error::CoreError, usecase::helpers};

/// Presigned URL の有効期限
const PRESIGNED_URL_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// イベントユースケース実装
pub struct EventUseCaseImpl {
   event_repo: Arc<dyn EventRepository>,
   member_repo: Arc<dyn MemberRepository>,
   photo_storage: Arc<dyn PhotoStorage>,
}

impl EventUseCaseImpl {
   pub fn new(
      event_repo: Arc<dyn EventRepository>,
      member_repo: Arc<dyn MemberRepository>,
      photo_storage: Arc<dyn PhotoStorage>,
   ) -> Self {
      Self {
         event_repo,
         member_repo,
         photo_storage,
      }
   }

   /// イベントを作成する（役員のみ）
   ///
   /// 必須項目（name/date/time/description）の欠落は
   /// 欠落フィールドを列挙したバリデーションエラーになる。
   pub async fn create(
      &self,
      acting_member_id: &MemberId,
      input: NewEvent,
      now: DateTime<Utc>,
   ) -> Result<Event, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let event = Event::new(EventId::new(), input, now)?;
      self.event_repo.insert(&event).await?;
      Ok(event)
   }

   /// イベントを取得する
   pub async fn get(&self, id: &EventId) -> Result<Event, CoreError> {
      let Some(event) = self.event_repo.find_by_id(id).await? else {
         return Err(CoreError::NotFound(format!("Event: {id}")));
      };
      Ok(event)
   }

   /// 全イベントを取得する
   pub async fn list(&self) -> Result<Vec<Event>, CoreError> {
      Ok(self.event_repo.find_all().await?)
   }

   /// イベントを更新する（役員のみ）
   pub async fn update(
      &self,
      acting_member_id: &MemberId,
      id: &EventId,
      input: NewEvent,
      now: DateTime<Utc>,
   ) -> Result<Event, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let event = self.get(id).await?;
      let updated = event.with_details(input, now)?;
      self.event_repo.update(&updated).await?;
      Ok(updated)
   }

   /// イベントを削除する（役員のみ）
   pub async fn delete(
      &self,
      acting_member_id: &MemberId,
      id: &EventId,
   ) -> Result<(), CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      self.get(id).await?;
      self.event_repo.delete(id).await?;
      Ok(())
   }

   /// 写真アップロード用の Presigned PUT URL を発行する（役員のみ）
   ///
   /// メタデータ（Content-Type ホワイトリスト等）の検証を通過した場合のみ
   /// URL を発行する。
   pub async fn issue_photo_upload_url(
      &self,
      acting_member_id: &MemberId,
      id: &EventId,
      file_name: &str,
      content_type: &str,
      file_size: i64,
      now: DateTime<Utc>,
   ) -> Result<String, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;
      self.get(id).await?;

      // アップロード前にメタデータの妥当性を検証する
      PhotoMetadata::new(file_name, content_type, file_size, now)?;

      let object_key = photo_object_key(id, file_name);
      let url = self
         .photo_storage
         .generate_presigned_put_url(&object_key, content_type, file_size, PRESIGNED_URL_EXPIRY)
         .await?;
      Ok(url)
   }

   /// アップロード完了を確認し、写真メタデータを保存する（役員のみ）
   pub async fn confirm_photo(
      &self,
      acting_member_id: &MemberId,
      id: &EventId,
      file_name: &str,
      content_type: &str,
      file_size: i64,
      now: DateTime<Utc>,
   ) -> Result<Event, CoreError> {
      helpers::require_officer(&self.member_repo, acting_member_id).await?;

      let event = self.get(id).await?;
      let photo = PhotoMetadata::new(file_name, content_type, file_size, now)?;

      let object_key = photo_object_key(id, file_name);
      if !self.photo_storage.head_object(&object_key).await? {
         return Err(CoreError::BadRequest(
            "写真がまだアップロードされていません".to_string(),
         ));
      }

      let updated = event.with_photo(photo, now);
      self.event_repo.update(&updated).await?;
      Ok(updated)
   }

   /// 写真の閲覧用 Presigned GET URL を発行する
   ///
   /// 写真が添付されていない場合は None。
   pub async fn photo_url(&self, id: &EventId) -> Result<Option<String>, CoreError> {
      let event = self.get(id).await?;
      let Some(photo) = event.photo() else {
         return Ok(None);
      };

      let object_key = photo_object_key(id, photo.file_name());
      let url = self
         .photo_storage
         .generate_presigned_get_url(&object_key, PRESIGNED_URL_EXPIRY)
         .await?;
      Ok(Some(url))
   }
}

/// イベント写真の S3 オブジェクトキー
fn photo_object_key(id: &EventId, file_name: &str) -> String {
   format!("events/{id}/{file_name}")
}

#[cfg(test)]
mod tests {
   use async_trait::async_trait;
   use chrono::{NaiveDate, NaiveTime};
   use tsudoi_domain::member::{Email, Member, MemberProfile};
   use tsudoi_infra::{
      InfraError,
      mock::{MockEventRepository, MockMemberRepository},
   };

   use super::*;

   // ===== モックストレージ =====

   /// head_object の結果を固定できるモックストレージ
   struct StubPhotoStorage {
      object_exists: bool,
   }

   #[async_trait]
   impl PhotoStorage for StubPhotoStorage {
      async fn generate_presigned_put_url(
         &self,
         object_key: &str,
         _content_type: &str,
         _content_length: i64,
         _expires_in: Duration,
      ) -> Result<String, InfraError> {
         Ok(format!("https://s3.example.com/{object_key}?signature=put"))
      }

      async fn generate_presigned_get_url(
         &self,
         object_key: &str,
         _expires_in: Duration,
      ) -> Result<String, InfraError> {
         Ok(format!("https://s3.example.com/{object_key}?signature=get"))
      }

      async fn head_object(&self, _object_key: &str) -> Result<bool, InfraError> {
         Ok(self.object_exists)
      }
   }

   // ===== フィクスチャ =====

   fn now() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn valid_input() -> NewEvent {
      NewEvent {
         name:        Some("ボルダリング大会".to_string()),
         date:        NaiveDate::from_ymd_opt(2020, 3, 5),
         time:        NaiveTime::from_hms_opt(17, 30, 0),
         description: Some("年に一度の学内大会".to_string()),
      }
   }

   struct Fixture {
      sut: EventUseCaseImpl,
      officer_id: MemberId,
      member_id: MemberId,
   }

   fn make_fixture(object_exists: bool) -> Fixture {
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

      let sut = EventUseCaseImpl::new(
         Arc::new(MockEventRepository::new()),
         Arc::new(member_repo),
         Arc::new(StubPhotoStorage { object_exists }),
      );

      Fixture {
         sut,
         officer_id,
         member_id,
      }
   }

   // ===== テスト =====

   #[tokio::test]
   async fn test_役員はイベントを作成できる() {
      let f = make_fixture(true);

      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();

      assert_eq!(event.name().as_str(), "ボルダリング大会");
      assert!(f.sut.get(event.id()).await.is_ok());
   }

   #[tokio::test]
   async fn test_非役員のイベント作成はforbidden() {
      let f = make_fixture(true);

      let result = f.sut.create(&f.member_id, valid_input(), now()).await;

      assert!(matches!(result, Err(CoreError::Forbidden(_))));
      assert!(f.sut.list().await.unwrap().is_empty());
   }

   #[tokio::test]
   async fn test_必須項目欠落はbad_requestで欠落項目を列挙する() {
      let f = make_fixture(true);

      let result = f
         .sut
         .create(
            &f.officer_id,
            NewEvent {
               name: None,
               date: None,
               ..valid_input()
            },
            now(),
         )
         .await;

      let Err(CoreError::BadRequest(message)) = result else {
         panic!("BadRequest であること");
      };
      assert!(message.contains("name"));
      assert!(message.contains("date"));
   }

   #[tokio::test]
   async fn test_許可外のcontent_typeでアップロードurlは発行されない() {
      let f = make_fixture(true);
      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();

      let result = f
         .sut
         .issue_photo_upload_url(
            &f.officer_id,
            event.id(),
            "photo.gif",
            "image/gif",
            1024,
            now(),
         )
         .await;

      assert!(matches!(result, Err(CoreError::BadRequest(_))));
   }

   #[tokio::test]
   async fn test_confirm_photoでメタデータが保存される() {
      let f = make_fixture(true);
      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();

      let updated = f
         .sut
         .confirm_photo(
            &f.officer_id,
            event.id(),
            "photo.png",
            "image/png",
            1024,
            now(),
         )
         .await
         .unwrap();

      let photo = updated.photo().expect("写真メタデータがあること");
      assert_eq!(photo.file_name(), "photo.png");
      assert_eq!(photo.content_type(), "image/png");
   }

   #[tokio::test]
   async fn test_s3に存在しない写真のconfirmはbad_request() {
      let f = make_fixture(false);
      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();

      let result = f
         .sut
         .confirm_photo(
            &f.officer_id,
            event.id(),
            "photo.png",
            "image/png",
            1024,
            now(),
         )
         .await;

      assert!(matches!(result, Err(CoreError::BadRequest(_))));
   }

   #[tokio::test]
   async fn test_photo_urlは写真なしイベントでnoneを返す() {
      let f = make_fixture(true);
      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();

      assert_eq!(f.sut.photo_url(event.id()).await.unwrap(), None);
   }

   #[tokio::test]
   async fn test_更新でphotoが保持される() {
      let f = make_fixture(true);
      let event = f.sut.create(&f.officer_id, valid_input(), now()).await.unwrap();
      f.sut
         .confirm_photo(
            &f.officer_id,
            event.id(),
            "photo.png",
            "image/png",
            1024,
            now(),
         )
         .await
         .unwrap();

      let updated = f
         .sut
         .update(
            &f.officer_id,
            event.id(),
            NewEvent {
               name: Some("新歓ハイク".to_string()),
               ..valid_input()
            },
            now(),
         )
         .await
         .unwrap();

      assert_eq!(updated.name().as_str(), "新歓ハイク");
      assert!(updated.photo().is_some());
   }
}
