//! # リポジトリ実装
//!
//! エンティティごとのリポジトリトレイトと PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: トレイトをユースケース層が参照し、実装はインフラ層に閉じる
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計（[`crate::mock`]）
//! - **ランタイムバインド**: `sqlx::query_as` + `FromRow` 行構造体を使用する
//!   （オフラインの `.sqlx` キャッシュを持たないため、`query!` マクロは使わない）

pub mod article_repository;
pub mod comment_repository;
pub mod event_repository;
pub mod following_repository;
pub mod member_repository;
pub mod news_repository;
pub mod notification_log_repository;
pub mod practice_repository;
pub mod route_repository;

pub use article_repository::{ArticleRepository, PostgresArticleRepository};
pub use comment_repository::{CommentRepository, PostgresCommentRepository};
pub use event_repository::{EventRepository, PostgresEventRepository};
pub use following_repository::{FollowingRepository, PostgresFollowingRepository};
pub use member_repository::{MemberRepository, PostgresMemberRepository};
pub use news_repository::{NewsRepository, PostgresNewsRepository};
pub use notification_log_repository::{
   NotificationLog,
   NotificationLogRepository,
   PostgresNotificationLogRepository,
};
pub use practice_repository::{PostgresPracticeRepository, PracticeRepository};
pub use route_repository::{PostgresRouteRepository, RouteRepository};
