//! # ユースケース層
//!
//! ビジネスロジックの実行単位を定義する。
//!
//! ## 設計方針
//!
//! - **リポジトリは `Arc<dyn …>`**: テストではインメモリモックに差し替える
//! - **現在時刻は引数で注入**: `Utc::now()` はハンドラ層でのみ取得し、
//!   ユースケースは `now` を受け取る（境界テストの決定性を確保）
//! - **役員ゲート**: 管理系の変更操作は [`helpers::require_officer`] で認可する

pub mod article;
pub mod comment;
pub mod event;
pub mod following;
mod helpers;
pub mod member;
pub mod news;
pub mod notification;
pub mod notifier;
pub mod practice;
pub mod route;

pub use article::ArticleUseCaseImpl;
pub use comment::CommentUseCaseImpl;
pub use event::EventUseCaseImpl;
pub use following::FollowUseCaseImpl;
pub use member::MemberUseCaseImpl;
pub use news::NewsUseCaseImpl;
pub use notification::{NotificationService, TemplateRenderer};
pub use notifier::UpcomingEventNotifier;
pub use practice::PracticeUseCaseImpl;
pub use route::RouteUseCaseImpl;
