//! # Core Service サーバー
//!
//! 部員管理ポータルのビジネスロジックを実行する内部サービス。
//!
//! ## 役割
//!
//! - **ビジネスロジック**: 部員・イベント・フォロー・お知らせ等の CRUD
//! - **データ永続化**: PostgreSQL へのエンティティ保存
//! - **通知バッチ**: 開催間近イベントのフォロワー通知
//!   （外部スケジューラが `/internal/notifications/upcoming-events/dispatch`
//!   を日次で呼び出す）
//!
//! ## アクセス制御
//!
//! Core Service は内部ネットワークからのみアクセス可能とする。
//! 認証は上流コラボレータの責務で、この API は `?member_id=` で
//! 転送された操作主体を信頼する（役員認可はユースケース層で行う）。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CORE_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `S3_ENDPOINT_URL` | No | MinIO 等のカスタムエンドポイント |
//! | `S3_BUCKET_NAME` | No | 写真バケット名 |
//! | `NOTIFICATION_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p tsudoi-core-service
//!
//! # 本番環境
//! CORE_PORT=3001 DATABASE_URL=postgres://... cargo run -p tsudoi-core-service --release
//! ```

mod config;
mod error;
mod handler;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
   Router,
   routing::{delete, get, post},
};
use config::CoreConfig;
use handler::{
   ArticleState,
   CommentState,
   EventState,
   FollowState,
   MemberState,
   NewsState,
   NotificationState,
   PracticeState,
   RouteState,
   approve_member,
   confirm_event_photo,
   create_article,
   create_comment,
   create_event,
   create_news,
   create_practice,
   create_route,
   delete_article,
   delete_comment,
   delete_event,
   delete_member,
   delete_news,
   delete_practice,
   delete_route,
   dispatch_upcoming_event_notifications,
   edit_article,
   follow_event,
   get_article,
   get_event,
   get_event_photo_url,
   get_member,
   get_news,
   get_practice,
   get_route,
   health_check,
   issue_event_photo_upload_url,
   list_articles,
   list_comments,
   list_event_followers,
   list_events,
   list_followed_events,
   list_members,
   list_news,
   list_practices,
   list_routes,
   register_member,
   set_member_officer,
   unfollow_event,
   update_event,
   update_member_profile,
   update_news,
   update_practice,
   update_route,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tsudoi_domain::clock::SystemClock;
use tsudoi_infra::{
   db,
   notification::{
      NoopNotificationSender,
      NotificationSender,
      SesNotificationSender,
      SmtpNotificationSender,
      create_ses_client,
   },
   repository::{
      ArticleRepository,
      CommentRepository,
      EventRepository,
      FollowingRepository,
      MemberRepository,
      NewsRepository,
      NotificationLogRepository,
      PostgresArticleRepository,
      PostgresCommentRepository,
      PostgresEventRepository,
      PostgresFollowingRepository,
      PostgresMemberRepository,
      PostgresNewsRepository,
      PostgresNotificationLogRepository,
      PostgresPracticeRepository,
      PostgresRouteRepository,
      PracticeRepository,
      RouteRepository,
   },
   storage::{self, PhotoStorage, S3PhotoStorage},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usecase::{
   ArticleUseCaseImpl,
   CommentUseCaseImpl,
   EventUseCaseImpl,
   FollowUseCaseImpl,
   MemberUseCaseImpl,
   NewsUseCaseImpl,
   NotificationService,
   PracticeUseCaseImpl,
   RouteUseCaseImpl,
   TemplateRenderer,
   UpcomingEventNotifier,
};

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   tracing_subscriber::registry()
      .with(
         tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,tsudoi=debug".into()),
      )
      .with(tracing_subscriber::fmt::layer())
      .init();

   // 設定読み込み
   let config = CoreConfig::from_env().expect("設定の読み込みに失敗しました");

   tracing::info!(
      "Core Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // データベース接続プールを作成
   let pool = db::create_pool(&config.database_url)
      .await
      .expect("データベース接続に失敗しました");
   tracing::info!("データベースに接続しました");

   db::run_migrations(&pool)
      .await
      .expect("マイグレーションの適用に失敗しました");

   // リポジトリを初期化
   let member_repo: Arc<dyn MemberRepository> =
      Arc::new(PostgresMemberRepository::new(pool.clone()));
   let event_repo: Arc<dyn EventRepository> = Arc::new(PostgresEventRepository::new(pool.clone()));
   let following_repo: Arc<dyn FollowingRepository> =
      Arc::new(PostgresFollowingRepository::new(pool.clone()));
   let news_repo: Arc<dyn NewsRepository> = Arc::new(PostgresNewsRepository::new(pool.clone()));
   let article_repo: Arc<dyn ArticleRepository> =
      Arc::new(PostgresArticleRepository::new(pool.clone()));
   let practice_repo: Arc<dyn PracticeRepository> =
      Arc::new(PostgresPracticeRepository::new(pool.clone()));
   let route_repo: Arc<dyn RouteRepository> = Arc::new(PostgresRouteRepository::new(pool.clone()));
   let comment_repo: Arc<dyn CommentRepository> =
      Arc::new(PostgresCommentRepository::new(pool.clone()));
   let notification_log_repo: Arc<dyn NotificationLogRepository> =
      Arc::new(PostgresNotificationLogRepository::new(pool.clone()));

   // 写真ストレージ（S3 / MinIO）
   let s3_client = storage::create_client(config.s3_endpoint_url.as_deref()).await;
   let photo_storage: Arc<dyn PhotoStorage> = Arc::new(S3PhotoStorage::new(
      s3_client,
      config.s3_bucket_name.clone(),
   ));

   // 通知送信バックエンド
   let sender: Arc<dyn NotificationSender> = match config.notification.backend.as_str() {
      "smtp" => Arc::new(SmtpNotificationSender::new(
         &config.notification.smtp_host,
         config.notification.smtp_port,
         config.notification.from_address.clone(),
      )),
      "ses" => Arc::new(SesNotificationSender::new(
         create_ses_client().await,
         config.notification.from_address.clone(),
      )),
      _ => Arc::new(NoopNotificationSender),
   };
   tracing::info!(backend = %config.notification.backend, "通知バックエンドを初期化しました");

   // 通知パイプライン
   let template_renderer =
      TemplateRenderer::new().expect("通知テンプレートの初期化に失敗しました");
   let notification_service = NotificationService::new(
      sender,
      template_renderer,
      notification_log_repo,
      config.notification.base_url.clone(),
   );
   let notifier = UpcomingEventNotifier::new(
      event_repo.clone(),
      following_repo.clone(),
      member_repo.clone(),
      notification_service,
   );

   // ハンドラ State を初期化
   let member_state = Arc::new(MemberState {
      usecase: MemberUseCaseImpl::new(member_repo.clone()),
   });
   let event_state = Arc::new(EventState {
      usecase: EventUseCaseImpl::new(
         event_repo.clone(),
         member_repo.clone(),
         photo_storage,
      ),
   });
   let follow_state = Arc::new(FollowState {
      usecase: FollowUseCaseImpl::new(
         following_repo,
         event_repo.clone(),
         member_repo.clone(),
      ),
   });
   let news_state = Arc::new(NewsState {
      usecase: NewsUseCaseImpl::new(news_repo, member_repo.clone()),
   });
   let article_state = Arc::new(ArticleState {
      usecase: ArticleUseCaseImpl::new(article_repo, member_repo.clone()),
   });
   let practice_state = Arc::new(PracticeState {
      usecase: PracticeUseCaseImpl::new(practice_repo, member_repo.clone()),
   });
   let route_state = Arc::new(RouteState {
      usecase: RouteUseCaseImpl::new(route_repo, member_repo.clone()),
   });
   let comment_state = Arc::new(CommentState {
      usecase: CommentUseCaseImpl::new(comment_repo, member_repo),
   });
   let notification_state = Arc::new(NotificationState {
      notifier,
      clock: Arc::new(SystemClock),
   });

   // ルーター構築
   let app = Router::new()
      .route("/health", get(health_check))
      // 部員 API
      .route("/internal/members", get(list_members).post(register_member))
      .route(
         "/internal/members/{id}",
         get(get_member).put(update_member_profile).delete(delete_member),
      )
      .route("/internal/members/{id}/approve", post(approve_member))
      .route("/internal/members/{id}/officer", post(set_member_officer))
      .with_state(member_state)
      // イベント API
      .route("/internal/events", get(list_events).post(create_event))
      .route(
         "/internal/events/{id}",
         get(get_event).put(update_event).delete(delete_event),
      )
      .route(
         "/internal/events/{id}/photo/upload-url",
         post(issue_event_photo_upload_url),
      )
      .route(
         "/internal/events/{id}/photo",
         get(get_event_photo_url).post(confirm_event_photo),
      )
      .with_state(event_state)
      // フォロー API
      .route(
         "/internal/events/{id}/follow",
         post(follow_event).delete(unfollow_event),
      )
      .route("/internal/events/{id}/followers", get(list_event_followers))
      .route(
         "/internal/members/{id}/followed-events",
         get(list_followed_events),
      )
      .with_state(follow_state)
      // お知らせ API
      .route("/internal/news", get(list_news).post(create_news))
      .route(
         "/internal/news/{id}",
         get(get_news).put(update_news).delete(delete_news),
      )
      .with_state(news_state)
      // 記事 API
      .route("/internal/articles", get(list_articles).post(create_article))
      .route(
         "/internal/articles/{id}",
         get(get_article).put(edit_article).delete(delete_article),
      )
      .with_state(article_state)
      // 練習 API
      .route("/internal/practices", get(list_practices).post(create_practice))
      .route(
         "/internal/practices/{id}",
         get(get_practice).put(update_practice).delete(delete_practice),
      )
      .with_state(practice_state)
      // ルート API
      .route("/internal/routes", get(list_routes).post(create_route))
      .route(
         "/internal/routes/{id}",
         get(get_route).put(update_route).delete(delete_route),
      )
      .with_state(route_state)
      // コメント API
      .route("/internal/comments", get(list_comments).post(create_comment))
      .route("/internal/comments/{id}", delete(delete_comment))
      .with_state(comment_state)
      // 通知バッチ API（外部スケジューラから起動）
      .route(
         "/internal/notifications/upcoming-events/dispatch",
         post(dispatch_upcoming_event_notifications),
      )
      .with_state(notification_state)
      .layer(TraceLayer::new_for_http());

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .expect("アドレスのパースに失敗しました");

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Core Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
