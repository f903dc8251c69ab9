//! # 部員
//!
//! 部員エンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Member`] | 部員 | メールアドレスで一意に識別される |
//! | [`Email`] | メールアドレス | 生成時にバリデーション |
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: MemberId は UUID をラップし、型安全性を確保
//! - **不変性**: エンティティフィールドは基本的に不変、変更はメソッド経由
//! - **役員権限**: イベント等の管理操作は `officer` フラグで認可する
//!   （認証そのものは外部コラボレータの責務）

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    attachment::PhotoMetadata,
    value_objects::{PersonName, StudentId},
};

define_uuid_id! {
    /// 部員 ID（一意識別子）
    ///
    /// UUID v7 を使用し、生成順にソート可能。
    pub struct MemberId;
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式であること
    /// - 最大 255 文字
    ///
    /// # エラー
    ///
    /// バリデーションに失敗した場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 部員プロフィール（作成・更新の入力）
///
/// フィールド数が多いため、コンストラクタ引数を構造体にまとめる。
#[derive(Debug, Clone, Default)]
pub struct MemberProfile {
    pub first_name:  Option<PersonName>,
    pub last_name:   Option<PersonName>,
    pub student_id:  Option<StudentId>,
    pub year:        Option<String>,
    pub competitive: bool,
    pub position:    Option<String>,
}

/// 部員エンティティ
///
/// # 不変条件
///
/// - `email` は全部員で一意
/// - `request` が true の間は入部申請中（役員の承認待ち）
/// - `officer` が true の部員のみ管理操作を実行できる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: MemberId,
    email: Email,
    first_name: Option<PersonName>,
    last_name: Option<PersonName>,
    student_id: Option<StudentId>,
    year: Option<String>,
    competitive: bool,
    officer: bool,
    position: Option<String>,
    request: bool,
    avatar: Option<PhotoMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Member {
    /// 新しい部員を作成する（入部申請）
    ///
    /// # 不変条件
    ///
    /// - 作成時は `request = true`（承認待ち）、`officer = false`
    pub fn new(id: MemberId, email: Email, profile: MemberProfile, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            student_id: profile.student_id,
            year: profile.year,
            competitive: profile.competitive,
            officer: false,
            position: profile.position,
            request: true,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 既存のデータから部員を復元する（データベースから取得時）
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: MemberId,
        email: Email,
        first_name: Option<PersonName>,
        last_name: Option<PersonName>,
        student_id: Option<StudentId>,
        year: Option<String>,
        competitive: bool,
        officer: bool,
        position: Option<String>,
        request: bool,
        avatar: Option<PhotoMetadata>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            student_id,
            year,
            competitive,
            officer,
            position,
            request,
            avatar,
            created_at,
            updated_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn first_name(&self) -> Option<&PersonName> {
        self.first_name.as_ref()
    }

    pub fn last_name(&self) -> Option<&PersonName> {
        self.last_name.as_ref()
    }

    pub fn student_id(&self) -> Option<&StudentId> {
        self.student_id.as_ref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn competitive(&self) -> bool {
        self.competitive
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn request(&self) -> bool {
        self.request
    }

    pub fn avatar(&self) -> Option<&PhotoMetadata> {
        self.avatar.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ビジネスロジックメソッド

    /// 役員かどうかを判定する
    ///
    /// イベント・お知らせ等の管理操作の認可に使用する。
    pub fn is_officer(&self) -> bool {
        self.officer
    }

    /// 姓名を連結した表示名を返す
    ///
    /// 姓・名とも未設定の場合は None。
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first.as_str(), last.as_str())),
            (Some(first), None) => Some(first.as_str().to_string()),
            (None, Some(last)) => Some(last.as_str().to_string()),
            (None, None) => None,
        }
    }

    /// プロフィールを更新した新しいインスタンスを返す
    pub fn with_profile(self, profile: MemberProfile, now: DateTime<Utc>) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            student_id: profile.student_id,
            year: profile.year,
            competitive: profile.competitive,
            position: profile.position,
            updated_at: now,
            ..self
        }
    }

    /// 入部申請を承認した新しいインスタンスを返す
    pub fn approved(self, now: DateTime<Utc>) -> Self {
        Self {
            request: false,
            updated_at: now,
            ..self
        }
    }

    /// 役員権限を付与・剥奪した新しいインスタンスを返す
    pub fn with_officer(self, officer: bool, now: DateTime<Utc>) -> Self {
        Self {
            officer,
            updated_at: now,
            ..self
        }
    }

    /// アバター写真を設定した新しいインスタンスを返す
    pub fn with_avatar(self, avatar: PhotoMetadata, now: DateTime<Utc>) -> Self {
        Self {
            avatar: Some(avatar),
            updated_at: now,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    /// テスト用の固定タイムスタンプ
    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[fixture]
    fn applicant(now: DateTime<Utc>) -> Member {
        Member::new(
            MemberId::new(),
            Email::new("climber@example.com").unwrap(),
            MemberProfile {
                first_name: Some(PersonName::new("太郎").unwrap()),
                last_name: Some(PersonName::new("山田").unwrap()),
                ..Default::default()
            },
            now,
        )
    }

    // Email のテスト

    #[test]
    fn test_メールアドレスは正常な形式を受け入れる() {
        assert!(Email::new("member@example.com").is_ok());
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("no-at-sign", "@記号なし")]
    #[case("@example.com", "ローカル部分が空")]
    #[case("member@", "ドメイン部分が空")]
    #[case(&format!("{}@example.com", "a".repeat(256)), "255文字超過")]
    fn test_メールアドレスは不正な形式を拒否する(
        #[case] input: &str,
        #[case] _reason: &str,
    ) {
        assert!(Email::new(input).is_err());
    }

    // Member のテスト

    #[rstest]
    fn test_新規部員は申請中で役員ではない(applicant: Member) {
        assert!(applicant.request());
        assert!(!applicant.is_officer());
    }

    #[rstest]
    fn test_承認後はrequestが解除される(applicant: Member) {
        let approval_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let approved = applicant.approved(approval_time);

        assert!(!approved.request());
        assert_eq!(approved.updated_at(), approval_time);
    }

    #[rstest]
    fn test_役員権限を付与できる(applicant: Member) {
        let transition_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let officer = applicant.with_officer(true, transition_time);

        assert!(officer.is_officer());
    }

    #[rstest]
    fn test_full_nameは姓名を連結する(applicant: Member) {
        assert_eq!(applicant.full_name(), Some("太郎 山田".to_string()));
    }

    #[rstest]
    fn test_full_nameは未設定ならnone(now: DateTime<Utc>) {
        let member = Member::new(
            MemberId::new(),
            Email::new("anon@example.com").unwrap(),
            MemberProfile::default(),
            now,
        );
        assert_eq!(member.full_name(), None);
    }

    #[rstest]
    fn test_プロフィール更新後の状態(applicant: Member) {
        let transition_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let updated = applicant.clone().with_profile(
            MemberProfile {
                year: Some("2026".to_string()),
                competitive: true,
                ..Default::default()
            },
            transition_time,
        );

        assert_eq!(updated.year(), Some("2026"));
        assert!(updated.competitive());
        assert_eq!(updated.first_name(), None);
        assert_eq!(updated.created_at(), applicant.created_at());
        assert_eq!(updated.updated_at(), transition_time);
    }
}
