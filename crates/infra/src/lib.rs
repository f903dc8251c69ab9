//! # Tsudoi インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはドメイン層で定義されたモデルに対する永続化・外部通信の
//! 具体的な実装を提供する。外部システムの詳細をカプセル化し、ドメイン層を
//! インフラの変更から保護する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **リポジトリ実装**: エンティティごとのリポジトリトレイトと Postgres 実装
//! - **写真ストレージ**: S3 / MinIO への Presigned URL 発行
//! - **メール送信**: SMTP / SES / Noop の切り替え可能な送信実装
//!
//! ## 依存関係
//!
//! ```text
//! core-service → infra → domain → shared
//! ```
//!
//! インフラ層は `domain` に依存する。
//! ドメイン層はインフラ層に依存しない（依存性逆転の原則）。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`storage`] - S3 写真ストレージ
//! - [`notification`] - メール送信実装

pub mod db;
pub mod error;
pub mod notification;
pub mod repository;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::InfraError;
