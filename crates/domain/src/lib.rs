//! # Tsudoi ドメイン層
//!
//! 部員管理ポータルのビジネスロジックの中核を担うドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! このクレートは DDD（ドメイン駆動設計）の原則に従い、以下を提供する:
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: Member, Event）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: Email,
//!   EventName）
//! - **ドメインサービス**: エンティティに属さないビジネスロジック
//!   （例: 開催間近ウィンドウの判定）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain → shared
//! ```
//!
//! ドメイン層はインフラ層（DB、S3、メール送信）に一切依存しない。
//! これにより、ビジネスロジックの純粋性が保たれる。
//!
//! ## モジュール構成
//!
//! - [`member`] - 部員エンティティと Email 値オブジェクト
//! - [`event`] - イベントエンティティと開催間近ウィンドウ・日時フォーマット
//! - [`following`] - フォロー関係（タグ付き識別子による多相関連）
//! - [`comment`] - コメント（フォローと同じタグ付き識別子パターン）
//! - [`news`] / [`article`] / [`practice`] / [`route`] - その他のエンティティ
//! - [`notification`] - メール通知イベントのドメインモデル
//! - [`attachment`] - 添付写真のメタデータ
//! - [`clock`] - テスト注入可能な時刻プロバイダ
//! - [`error`] - ドメイン層で発生するエラーの定義

#[macro_use]
mod macros;

pub mod article;
pub mod attachment;
pub mod clock;
pub mod comment;
pub mod error;
pub mod event;
pub mod following;
pub mod member;
pub mod news;
pub mod notification;
pub mod practice;
pub mod route;
pub mod value_objects;

pub use error::DomainError;
