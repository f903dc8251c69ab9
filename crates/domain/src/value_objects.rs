//! # 共通値オブジェクト
//!
//! 複数のエンティティから利用される値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: 生の `String` の混同をコンパイル時に防ぐ
//! - **生成時バリデーション**: 不正な値のインスタンスを作れない
//! - **PII 保護**: 氏名は Debug 出力でマスクする

define_validated_string! {
    /// 部員の氏名（姓または名）
    ///
    /// PII のため Debug 出力は `[REDACTED]` にマスクされる。
    pub struct PersonName {
        label: "氏名",
        max_length: 100,
        pii: true,
    }
}

define_validated_string! {
    /// イベント名
    pub struct EventName {
        label: "イベント名",
        max_length: 255,
    }
}

define_validated_string! {
    /// お知らせ・記事・ルートのタイトル
    pub struct Title {
        label: "タイトル",
        max_length: 255,
    }
}

define_validated_string! {
    /// 学籍番号（最大 6 文字）
    pub struct StudentId {
        label: "学籍番号",
        max_length: 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_person_nameは前後の空白を除去する() {
        let name = PersonName::new("  山田  ").unwrap();
        assert_eq!(name.as_str(), "山田");
    }

    #[test]
    fn test_person_nameのdebug出力はマスクされる() {
        let name = PersonName::new("山田太郎").unwrap();
        assert!(format!("{:?}", name).contains("[REDACTED]"));
        assert!(!format!("{:?}", name).contains("山田"));
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("   ", "空白のみ")]
    fn test_event_nameは空の入力を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(EventName::new(input).is_err());
    }

    #[test]
    fn test_event_nameは最大長を超える入力を拒否する() {
        assert!(EventName::new("a".repeat(256)).is_err());
        assert!(EventName::new("a".repeat(255)).is_ok());
    }

    #[test]
    fn test_titleのdisplayは平文を出力する() {
        let title = Title::new("新歓のお知らせ").unwrap();
        assert_eq!(title.to_string(), "新歓のお知らせ");
    }

    #[rstest]
    #[case("abc123", true)]
    #[case("abcd123", false)]
    fn test_student_idは6文字以内(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(StudentId::new(input).is_ok(), ok);
    }
}
