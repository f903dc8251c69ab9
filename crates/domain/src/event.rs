//! # イベント
//!
//! イベントエンティティと、開催間近ウィンドウ・日時フォーマットを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Event`] | イベント | name/date/time/description は必須 |
//! | [`NewEvent`] | イベント作成入力 | 必須項目の欠落を一括検証する |
//!
//! ## 開催間近ウィンドウ
//!
//! 開催日が `[today, today + 2日]`（両端含む）に入るイベントを
//! 「開催間近」とみなし、フォロワーへのメール通知対象とする。
//! 境界は [`UPCOMING_LOOKAHEAD_DAYS`] と [`upcoming_window`] に集約し、
//! 通知ユースケースとテストの双方がここを参照する。

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::{DomainError, attachment::PhotoMetadata, value_objects::EventName};

define_uuid_id! {
    /// イベント ID（一意識別子）
    pub struct EventId;
}

/// 開催間近とみなす先読み日数
///
/// 開催日が本日から 2 日後までのイベントが通知対象になる。
pub const UPCOMING_LOOKAHEAD_DAYS: i64 = 2;

/// 開催間近ウィンドウ `[today, today + UPCOMING_LOOKAHEAD_DAYS]` を返す
///
/// 両端とも含む。開催当日のイベントも通知対象とする。
pub fn upcoming_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(UPCOMING_LOOKAHEAD_DAYS))
}

/// 日付を `MM/DD/YYYY` 形式にフォーマットする
///
/// 未設定（None）の場合は None を返す。純粋関数で、失敗しない。
pub fn date_string(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_date)
}

/// 時刻を `H:MM AM/PM` 形式（時は 0 埋めなし）にフォーマットする
///
/// 未設定（None）の場合は None を返す。純粋関数で、失敗しない。
pub fn time_string(time: Option<NaiveTime>) -> Option<String> {
    time.map(format_time)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// イベント作成入力
///
/// 永続化前の「下書き」で、必須項目もまだ Option で持つ。
/// [`Event::new`] が欠落項目をまとめて検証する。
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub name:        Option<String>,
    pub date:        Option<NaiveDate>,
    pub time:        Option<NaiveTime>,
    pub description: Option<String>,
}

impl NewEvent {
    /// 下書きの日付を `MM/DD/YYYY` 形式で返す（未設定なら None）
    pub fn date_string(&self) -> Option<String> {
        date_string(self.date)
    }

    /// 下書きの時刻を `H:MM AM/PM` 形式で返す（未設定なら None）
    pub fn time_string(&self) -> Option<String> {
        time_string(self.time)
    }
}

/// イベントエンティティ
///
/// # 不変条件
///
/// - `name` / `date` / `time` / `description` は非 NULL
///   （[`Event::new`] が構築時に強制するため、永続化後は常に成立する）
/// - `photo` は任意。Content-Type は [`PhotoMetadata`] が検証する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    name: EventName,
    date: NaiveDate,
    time: NaiveTime,
    description: String,
    photo: Option<PhotoMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Event {
    /// 新しいイベントを作成する
    ///
    /// # エラー
    ///
    /// 必須項目が欠けている場合、欠落したフィールド名をすべて列挙した
    /// ひとつの `DomainError::Validation` を返す。
    pub fn new(id: EventId, input: NewEvent, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let mut missing = Vec::new();
        if input.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            missing.push("name");
        }
        if input.date.is_none() {
            missing.push("date");
        }
        if input.time.is_none() {
            missing.push("time");
        }
        if input
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            missing.push("description");
        }

        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "必須項目が未入力です: {}",
                missing.join(", ")
            )));
        }

        // 上の検証で全項目の存在が保証されている
        let name = EventName::new(input.name.unwrap_or_default())?;
        let Some(date) = input.date else {
            unreachable!("date は検証済み");
        };
        let Some(time) = input.time else {
            unreachable!("time は検証済み");
        };
        let description = input.description.unwrap_or_default().trim().to_string();

        Ok(Self {
            id,
            name,
            date,
            time,
            description,
            photo: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// 既存のデータからイベントを復元する（データベースから取得時）
    #[allow(clippy::too_many_arguments)]
    pub fn from_db(
        id: EventId,
        name: EventName,
        date: NaiveDate,
        time: NaiveTime,
        description: String,
        photo: Option<PhotoMetadata>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            date,
            time,
            description,
            photo,
            created_at,
            updated_at,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn name(&self) -> &EventName {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn photo(&self) -> Option<&PhotoMetadata> {
        self.photo.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // ビジネスロジックメソッド

    /// 開催日を `MM/DD/YYYY` 形式で返す
    ///
    /// 永続化済みイベントの date は必須のため、常に値を返す。
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }

    /// 開催時刻を `H:MM AM/PM` 形式（時は 0 埋めなし）で返す
    pub fn time_string(&self) -> String {
        format_time(self.time)
    }

    /// 開催間近かどうかを判定する
    ///
    /// 開催日が `[today, today + UPCOMING_LOOKAHEAD_DAYS]`（両端含む）
    /// に入る場合に true。
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        let (from, to) = upcoming_window(today);
        from <= self.date && self.date <= to
    }

    /// 内容を更新した新しいインスタンスを返す
    pub fn with_details(self, input: NewEvent, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let updated = Self::new(self.id.clone(), input, now)?;
        Ok(Self {
            photo: self.photo,
            created_at: self.created_at,
            ..updated
        })
    }

    /// 写真を添付した新しいインスタンスを返す
    pub fn with_photo(self, photo: PhotoMetadata, now: DateTime<Utc>) -> Self {
        Self {
            photo: Some(photo),
            updated_at: now,
            ..self
        }
    }

    /// 写真を削除した新しいインスタンスを返す
    pub fn without_photo(self, now: DateTime<Utc>) -> Self {
        Self {
            photo: None,
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

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn valid_input() -> NewEvent {
        NewEvent {
            name:        Some("ボルダリング大会".to_string()),
            date:        NaiveDate::from_ymd_opt(2020, 3, 5),
            time:        NaiveTime::from_hms_opt(17, 30, 0),
            description: Some("年に一度の学内大会".to_string()),
        }
    }

    // 日時フォーマットのテスト

    #[test]
    fn test_date_stringは日付をmmddyyyy形式で返す() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 5);
        assert_eq!(date_string(date), Some("03/05/2020".to_string()));
    }

    #[test]
    fn test_date_stringは未設定ならnoneを返す() {
        assert_eq!(date_string(None), None);
    }

    #[test]
    fn test_time_stringは時刻を12時間制で返す() {
        let time = NaiveTime::from_hms_opt(17, 30, 0);
        assert_eq!(time_string(time), Some("5:30 PM".to_string()));
    }

    #[test]
    fn test_time_stringの時は0埋めしない() {
        let time = NaiveTime::from_hms_opt(9, 5, 0);
        assert_eq!(time_string(time), Some("9:05 AM".to_string()));
    }

    #[test]
    fn test_time_stringは未設定ならnoneを返す() {
        assert_eq!(time_string(None), None);
    }

    #[rstest]
    fn test_永続化済みイベントのフォーマットは常に値を返す(now: DateTime<Utc>) {
        let event = Event::new(EventId::new(), valid_input(), now).unwrap();

        assert_eq!(event.date_string(), "03/05/2020");
        assert_eq!(event.time_string(), "5:30 PM");
    }

    // バリデーションのテスト

    #[rstest]
    fn test_全必須項目が揃っていれば作成できる(now: DateTime<Utc>) {
        assert!(Event::new(EventId::new(), valid_input(), now).is_ok());
    }

    #[rstest]
    fn test_欠落フィールドがすべて列挙される(now: DateTime<Utc>) {
        let input = NewEvent {
            name: None,
            date: None,
            time: NaiveTime::from_hms_opt(17, 30, 0),
            description: None,
        };

        let err = Event::new(EventId::new(), input, now).unwrap_err();
        let DomainError::Validation(message) = err else {
            panic!("Validation エラーであること");
        };
        assert!(message.contains("name"));
        assert!(message.contains("date"));
        assert!(message.contains("description"));
        assert!(!message.contains("time"));
    }

    #[rstest]
    fn test_空白のみのnameは欠落扱い(now: DateTime<Utc>) {
        let input = NewEvent {
            name: Some("   ".to_string()),
            ..valid_input()
        };

        let err = Event::new(EventId::new(), input, now).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    // 開催間近ウィンドウのテスト

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, 5).unwrap()
    }

    fn event_on(date: NaiveDate, now: DateTime<Utc>) -> Event {
        Event::new(
            EventId::new(),
            NewEvent {
                date: Some(date),
                ..valid_input()
            },
            now,
        )
        .unwrap()
    }

    #[rstest]
    #[case(0, true, "開催当日")]
    #[case(1, true, "翌日")]
    #[case(2, true, "2日後（上限・含む）")]
    #[case(3, false, "3日後（ウィンドウ外）")]
    #[case(-1, false, "過去のイベント")]
    fn test_開催間近ウィンドウは両端を含む(
        today: NaiveDate,
        now: DateTime<Utc>,
        #[case] offset_days: i64,
        #[case] expected: bool,
        #[case] _reason: &str,
    ) {
        let event = event_on(today + Duration::days(offset_days), now);
        assert_eq!(event.is_upcoming(today), expected);
    }

    #[rstest]
    fn test_upcoming_windowは本日から2日後までを返す(today: NaiveDate) {
        let (from, to) = upcoming_window(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2020, 3, 7).unwrap());
    }

    // 更新系のテスト

    #[rstest]
    fn test_with_detailsはphotoとcreated_atを保持する(now: DateTime<Utc>) {
        let photo =
            PhotoMetadata::new("photo.png", "image/png", 1024, now).unwrap();
        let event = Event::new(EventId::new(), valid_input(), now)
            .unwrap()
            .with_photo(photo.clone(), now);

        let update_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let updated = event
            .clone()
            .with_details(
                NewEvent {
                    name: Some("新歓ハイク".to_string()),
                    ..valid_input()
                },
                update_time,
            )
            .unwrap();

        assert_eq!(updated.name().as_str(), "新歓ハイク");
        assert_eq!(updated.photo(), Some(&photo));
        assert_eq!(updated.created_at(), event.created_at());
        assert_eq!(updated.updated_at(), update_time);
    }

    #[rstest]
    fn test_without_photoで写真が外れる(now: DateTime<Utc>) {
        let photo = PhotoMetadata::new("photo.png", "image/png", 1024, now).unwrap();
        let event = Event::new(EventId::new(), valid_input(), now)
            .unwrap()
            .with_photo(photo, now);

        let removed = event.without_photo(now);
        assert_eq!(removed.photo(), None);
    }
}
