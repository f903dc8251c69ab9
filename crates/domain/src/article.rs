//! # 記事
//!
//! 部誌・ブログ記事エンティティを定義する。
//! お知らせと異なり編集者（editor）を持ち、編集履歴の起点になる。

use chrono::{DateTime, Utc};

use crate::{DomainError, member::MemberId, value_objects::Title};

define_uuid_id! {
    /// 記事 ID（一意識別子）
    pub struct ArticleId;
}

/// 記事エンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    title: Title,
    body: String,
    author_id: MemberId,
    editor_id: Option<MemberId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Article {
    /// 新しい記事を作成する
    pub fn new(
        id: ArticleId,
        title: Title,
        body: impl Into<String>,
        author_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(DomainError::Validation("本文は必須です".to_string()));
        }

        Ok(Self {
            id,
            title,
            body,
            author_id,
            editor_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: ArticleId,
        title: Title,
        body: String,
        author_id: MemberId,
        editor_id: Option<MemberId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            body,
            author_id,
            editor_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &ArticleId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn author_id(&self) -> &MemberId {
        &self.author_id
    }

    pub fn editor_id(&self) -> Option<&MemberId> {
        self.editor_id.as_ref()
    }

    /// 編集した新しいインスタンスを返す（編集者を記録する）
    pub fn edited(
        self,
        title: Title,
        body: impl Into<String>,
        editor_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(DomainError::Validation("本文は必須です".to_string()));
        }

        Ok(Self {
            title,
            body,
            editor_id: Some(editor_id),
            updated_at: now,
            ..self
        })
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
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_新規記事は編集者を持たない() {
        let article = Article::new(
            ArticleId::new(),
            Title::new("夏合宿レポート").unwrap(),
            "初日は雨でした。",
            MemberId::new(),
            now(),
        )
        .unwrap();

        assert_eq!(article.editor_id(), None);
    }

    #[test]
    fn test_editedで編集者が記録される() {
        let article = Article::new(
            ArticleId::new(),
            Title::new("夏合宿レポート").unwrap(),
            "初日は雨でした。",
            MemberId::new(),
            now(),
        )
        .unwrap();

        let editor = MemberId::new();
        let edit_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let edited = article
            .edited(
                Title::new("夏合宿レポート（改訂）").unwrap(),
                "初日は雨、二日目は快晴でした。",
                editor.clone(),
                edit_time,
            )
            .unwrap();

        assert_eq!(edited.editor_id(), Some(&editor));
        assert_eq!(edited.updated_at(), edit_time);
    }
}
