//! # お知らせ
//!
//! 部内向けのお知らせエンティティを定義する。
//! タイトル・本文・投稿者はすべて必須。

use chrono::{DateTime, Utc};

use crate::{DomainError, member::MemberId, value_objects::Title};

define_uuid_id! {
    /// お知らせ ID（一意識別子）
    pub struct NewsId;
}

/// お知らせエンティティ
///
/// # 不変条件
///
/// - `title` / `body` / `author_id` は非 NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct News {
    id: NewsId,
    title: Title,
    author_id: MemberId,
    body: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl News {
    /// 新しいお知らせを作成する
    pub fn new(
        id: NewsId,
        title: Title,
        author_id: MemberId,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(DomainError::Validation("本文は必須です".to_string()));
        }

        Ok(Self {
            id,
            title,
            author_id,
            body,
            created_at: now,
            updated_at: now,
        })
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: NewsId,
        title: Title,
        author_id: MemberId,
        body: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            author_id,
            body,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &NewsId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn author_id(&self) -> &MemberId {
        &self.author_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// タイトルと本文を更新した新しいインスタンスを返す
    pub fn with_content(
        self,
        title: Title,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(DomainError::Validation("本文は必須です".to_string()));
        }

        Ok(Self {
            title,
            body,
            updated_at: now,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_空の本文は拒否される() {
        let result = News::new(
            NewsId::new(),
            Title::new("合宿について").unwrap(),
            MemberId::new(),
            "",
            now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_with_contentでタイトルと本文が更新される() {
        let news = News::new(
            NewsId::new(),
            Title::new("合宿について").unwrap(),
            MemberId::new(),
            "詳細は追って連絡します。",
            now(),
        )
        .unwrap();

        let update_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let updated = news
            .clone()
            .with_content(
                Title::new("合宿の日程確定").unwrap(),
                "3月の第1週です。",
                update_time,
            )
            .unwrap();

        assert_eq!(updated.title().as_str(), "合宿の日程確定");
        assert_eq!(updated.body(), "3月の第1週です。");
        assert_eq!(updated.author_id(), news.author_id());
        assert_eq!(updated.created_at(), news.created_at());
        assert_eq!(updated.updated_at(), update_time);
    }
}
