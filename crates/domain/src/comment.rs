//! # コメント
//!
//! 記事・お知らせ・イベントへのコメントを定義する。
//! 対象参照は [`crate::following`] と同じタグ付きユニオンパターン。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use uuid::Uuid;

use crate::{
    DomainError,
    article::ArticleId,
    event::EventId,
    member::MemberId,
    news::NewsId,
};

define_uuid_id! {
    /// コメント ID（一意識別子）
    pub struct CommentId;
}

/// コメント対象の型タグ
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommentableType {
    Article,
    News,
    Event,
}

/// コメント対象への型付き参照（タグ付きユニオン）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommentableRef {
    Article(ArticleId),
    News(NewsId),
    Event(EventId),
}

impl CommentableRef {
    /// 型タグを返す
    pub fn commentable_type(&self) -> CommentableType {
        match self {
            Self::Article(_) => CommentableType::Article,
            Self::News(_) => CommentableType::News,
            Self::Event(_) => CommentableType::Event,
        }
    }

    /// 対象の UUID を返す（カラム格納用）
    pub fn commentable_id(&self) -> &Uuid {
        match self {
            Self::Article(id) => id.as_uuid(),
            Self::News(id) => id.as_uuid(),
            Self::Event(id) => id.as_uuid(),
        }
    }

    /// 型タグと UUID の組から復元する
    pub fn from_parts(commentable_type: CommentableType, commentable_id: Uuid) -> Self {
        match commentable_type {
            CommentableType::Article => Self::Article(ArticleId::from_uuid(commentable_id)),
            CommentableType::News => Self::News(NewsId::from_uuid(commentable_id)),
            CommentableType::Event => Self::Event(EventId::from_uuid(commentable_id)),
        }
    }

    /// 文字列の型タグと UUID の組から復元する
    pub fn from_db(commentable_type: &str, commentable_id: Uuid) -> Result<Self, DomainError> {
        let tag = commentable_type.parse::<CommentableType>().map_err(|_| {
            DomainError::Validation(format!("不正なコメント対象種別: {commentable_type}"))
        })?;
        Ok(Self::from_parts(tag, commentable_id))
    }
}

/// コメントエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    body: String,
    commenter_id: MemberId,
    target: CommentableRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    /// 新しいコメントを作成する
    ///
    /// # エラー
    ///
    /// 本文が空の場合は `DomainError::Validation` を返す。
    pub fn new(
        id: CommentId,
        body: impl Into<String>,
        commenter_id: MemberId,
        target: CommentableRef,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(DomainError::Validation(
                "コメント本文は必須です".to_string(),
            ));
        }

        Ok(Self {
            id,
            body,
            commenter_id,
            target,
            created_at: now,
            updated_at: now,
        })
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: CommentId,
        body: String,
        commenter_id: MemberId,
        target: CommentableRef,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            body,
            commenter_id,
            target,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &CommentId {
        &self.id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn commenter_id(&self) -> &MemberId {
        &self.commenter_id
    }

    pub fn target(&self) -> &CommentableRef {
        &self.target
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 指定部員がこのコメントを削除できるか判定する
    ///
    /// 投稿者本人、または役員のみ削除可能。
    pub fn can_be_deleted_by(&self, member_id: &MemberId, is_officer: bool) -> bool {
        is_officer || &self.commenter_id == member_id
    }
}
