//! # 添付写真メタデータ
//!
//! イベント写真・部員アバターの添付ファイルメタデータを定義する。
//! ファイル本体は S3 に置かれ、DB にはメタデータのみが保存される。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 添付写真として許可する Content-Type
pub const ALLOWED_PHOTO_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

/// 添付写真のメタデータ（値オブジェクト）
///
/// ファイル名・Content-Type・サイズ・更新日時の組。
/// 生成時に Content-Type のホワイトリスト検証を行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    file_name:    String,
    content_type: String,
    file_size:    i64,
    updated_at:   DateTime<Utc>,
}

impl PhotoMetadata {
    /// 写真メタデータを作成する
    ///
    /// # バリデーション
    ///
    /// - `file_name` は空でない
    /// - `content_type` は [`ALLOWED_PHOTO_CONTENT_TYPES`] のいずれか
    /// - `file_size` は正の値
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        file_size: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        let content_type = content_type.into();

        if file_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "ファイル名は必須です".to_string(),
            ));
        }

        if !ALLOWED_PHOTO_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(DomainError::Validation(format!(
                "許可されていない Content-Type です: {content_type}"
            )));
        }

        if file_size <= 0 {
            return Err(DomainError::Validation(
                "ファイルサイズは正の値である必要があります".to_string(),
            ));
        }

        Ok(Self {
            file_name,
            content_type,
            file_size,
            updated_at,
        })
    }

    /// データベースの各カラムから復元する
    ///
    /// カラムがすべて NULL の場合は None を返す（添付なし）。
    pub fn from_db(
        file_name: Option<String>,
        content_type: Option<String>,
        file_size: Option<i64>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        match (file_name, content_type, file_size, updated_at) {
            (Some(file_name), Some(content_type), Some(file_size), Some(updated_at)) => {
                Some(Self {
                    file_name,
                    content_type,
                    file_size,
                    updated_at,
                })
            }
            _ => None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("image/png", true)]
    #[case("image/jpg", true)]
    #[case("image/jpeg", true)]
    #[case("image/gif", false)]
    #[case("application/pdf", false)]
    #[case("", false)]
    fn test_content_typeはホワイトリストで検証される(
        #[case] content_type: &str,
        #[case] ok: bool,
    ) {
        let result = PhotoMetadata::new("photo.png", content_type, 1024, Utc::now());
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn test_ファイルサイズ0は拒否される() {
        assert!(PhotoMetadata::new("photo.png", "image/png", 0, Utc::now()).is_err());
    }

    #[test]
    fn test_from_dbは全カラム揃いのときのみsomeを返す() {
        let now = Utc::now();
        let photo = PhotoMetadata::from_db(
            Some("photo.png".to_string()),
            Some("image/png".to_string()),
            Some(1024),
            Some(now),
        );
        assert!(photo.is_some());

        let missing = PhotoMetadata::from_db(
            Some("photo.png".to_string()),
            None,
            Some(1024),
            Some(now),
        );
        assert_eq!(missing, None);
    }
}
