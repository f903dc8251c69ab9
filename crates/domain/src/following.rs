//! # フォロー関係
//!
//! 部員がエンティティ（現状はイベント）をフォローする関係を定義する。
//!
//! ## 多相関連のタグ付き再設計
//!
//! 元のスキーマは `followable_id` + `followable_type`（文字列）の
//! 多相関連だった。ここでは型タグを enum（[`FollowableType`]）、
//! 対象参照をタグ付きユニオン（[`FollowableRef`]）として表現し、
//! 不正な型タグと ID の組をコンパイル時に排除する。
//! フォロー可能な型を増やす場合は両 enum にバリアントを追加する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use uuid::Uuid;

use crate::{DomainError, event::EventId, member::MemberId};

define_uuid_id! {
    /// フォロー関係 ID（一意識別子）
    pub struct FollowingId;
}

/// フォロー対象の型タグ
///
/// `followings.followable_type` カラムに格納される値。
/// snake_case でシリアライズされる。
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
pub enum FollowableType {
    /// イベント（現状唯一のフォロー対象）
    Event,
}

/// フォロー対象への型付き参照（タグ付きユニオン）
///
/// 型タグと ID をひとつの値として持ち、タグと ID の不整合を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FollowableRef {
    Event(EventId),
}

impl FollowableRef {
    /// 型タグを返す
    pub fn followable_type(&self) -> FollowableType {
        match self {
            Self::Event(_) => FollowableType::Event,
        }
    }

    /// 対象の UUID を返す（カラム格納用）
    pub fn followable_id(&self) -> &Uuid {
        match self {
            Self::Event(id) => id.as_uuid(),
        }
    }

    /// 型タグと UUID の組から復元する（データベースから取得時）
    pub fn from_parts(followable_type: FollowableType, followable_id: Uuid) -> Self {
        match followable_type {
            FollowableType::Event => Self::Event(EventId::from_uuid(followable_id)),
        }
    }

    /// 文字列の型タグと UUID の組から復元する
    ///
    /// 未知の型タグは `DomainError::Validation` を返す。
    pub fn from_db(followable_type: &str, followable_id: Uuid) -> Result<Self, DomainError> {
        let tag = followable_type.parse::<FollowableType>().map_err(|_| {
            DomainError::Validation(format!("不正なフォロー対象種別: {followable_type}"))
        })?;
        Ok(Self::from_parts(tag, followable_id))
    }
}

/// フォロー関係エンティティ
///
/// # 不変条件
///
/// - (member_id, target) の組は一意（重複フォローは永続化層で
///   冪等に無視される）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Following {
    id: FollowingId,
    member_id: MemberId,
    target: FollowableRef,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Following {
    /// 新しいフォロー関係を作成する
    pub fn new(
        id: FollowingId,
        member_id: MemberId,
        target: FollowableRef,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            target,
            created_at: now,
            updated_at: now,
        }
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: FollowingId,
        member_id: MemberId,
        target: FollowableRef,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            target,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &FollowingId {
        &self.id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn target(&self) -> &FollowableRef {
        &self.target
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_followable_typeの文字列変換が正しい() {
        assert_eq!(FollowableType::Event.to_string(), "event");
        assert_eq!(
            FollowableType::from_str("event").unwrap(),
            FollowableType::Event
        );
        assert!(FollowableType::from_str("article").is_err());
    }

    #[test]
    fn test_followable_refは型タグとidを往復できる() {
        let event_id = EventId::new();
        let target = FollowableRef::Event(event_id.clone());

        let restored = FollowableRef::from_parts(
            target.followable_type(),
            *target.followable_id(),
        );

        assert_eq!(restored, target);
        assert_eq!(restored.followable_id(), event_id.as_uuid());
    }

    #[test]
    fn test_from_dbは未知の型タグを拒否する() {
        let result = FollowableRef::from_db("carousel_item", Uuid::now_v7());
        assert!(result.is_err());
    }

    #[test]
    fn test_フォロー関係の生成() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let member_id = MemberId::new();
        let target = FollowableRef::Event(EventId::new());

        let following = Following::new(FollowingId::new(), member_id.clone(), target.clone(), now);

        assert_eq!(following.member_id(), &member_id);
        assert_eq!(following.target(), &target);
        assert_eq!(following.created_at(), now);
    }
}
