//! # ルート
//!
//! ランニングルートエンティティを定義する。
//! 距離と外部サービス（MapMyRun）の ID を任意で持つ。

use chrono::{DateTime, Utc};

use crate::value_objects::Title;

define_uuid_id! {
    /// ルート ID（一意識別子）
    pub struct RouteId;
}

/// ルートエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    id: RouteId,
    title: Title,
    /// 距離（メートル）
    distance: Option<i64>,
    /// MapMyRun 上のルート ID
    map_my_run_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Route {
    /// 新しいルートを作成する
    pub fn new(
        id: RouteId,
        title: Title,
        distance: Option<i64>,
        map_my_run_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            distance,
            map_my_run_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: RouteId,
        title: Title,
        distance: Option<i64>,
        map_my_run_id: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            distance,
            map_my_run_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn distance(&self) -> Option<i64> {
        self.distance
    }

    pub fn map_my_run_id(&self) -> Option<&str> {
        self.map_my_run_id.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 内容を更新した新しいインスタンスを返す
    pub fn with_details(
        self,
        title: Title,
        distance: Option<i64>,
        map_my_run_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            distance,
            map_my_run_id,
            updated_at: now,
            ..self
        }
    }
}
