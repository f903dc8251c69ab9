//! # 練習
//!
//! 曜日ごとの定期練習スケジュールを定義する。

use chrono::{DateTime, NaiveTime, Utc};

use crate::DomainError;

define_uuid_id! {
    /// 練習 ID（一意識別子）
    pub struct PracticeId;
}

/// 練習エンティティ
///
/// # 不変条件
///
/// - `day`（曜日ラベル）は非 NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Practice {
    id: PracticeId,
    day: String,
    time: Option<NaiveTime>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Practice {
    /// 新しい練習を作成する
    pub fn new(
        id: PracticeId,
        day: impl Into<String>,
        time: Option<NaiveTime>,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let day = day.into().trim().to_string();
        if day.is_empty() {
            return Err(DomainError::Validation("曜日は必須です".to_string()));
        }

        Ok(Self {
            id,
            day,
            time,
            location,
            created_at: now,
            updated_at: now,
        })
    }

    /// 既存のデータから復元する（データベースから取得時）
    pub fn from_db(
        id: PracticeId,
        day: String,
        time: Option<NaiveTime>,
        location: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            day,
            time,
            location,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PracticeId {
        &self.id
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 開始時刻を `H:MM AM/PM` 形式で返す（未設定なら None）
    pub fn time_string(&self) -> Option<String> {
        crate::event::time_string(self.time)
    }

    /// スケジュールを更新した新しいインスタンスを返す
    pub fn with_schedule(
        self,
        day: impl Into<String>,
        time: Option<NaiveTime>,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let day = day.into().trim().to_string();
        if day.is_empty() {
            return Err(DomainError::Validation("曜日は必須です".to_string()));
        }

        Ok(Self {
            day,
            time,
            location,
            updated_at: now,
            ..self
        })
    }
}
