//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`EventNotification`] | イベント通知 | 現状は開催間近通知のみ |
//! | [`NotificationEventType`] | 通知イベント種別 | notification_logs の event_type |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 通知の種類を増やす場合はバリアントを追加する
//! - **fire-and-forget**: 通知送信の失敗は通知バッチ全体を中断しない
//! - **テンプレート分離**: 通知イベントとメール生成は分離
//!   （TemplateRenderer は core-service）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{event::EventId, member::MemberId};

define_uuid_id! {
    /// 通知ログ ID（一意識別子）
    ///
    /// notification_logs テーブルの主キー。UUID v7 を使用。
    pub struct NotificationLogId;
}

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// 通知ログの記録に失敗
    #[error("通知ログの記録に失敗: {0}")]
    LogFailed(String),
}

/// 通知イベント種別
///
/// notification_logs テーブルの `event_type` カラムに格納される値。
/// snake_case でシリアライズされる。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    /// 開催間近: 開催日がウィンドウ内に入ったイベント → フォロワーに送信
    UpcomingEvent,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:        String,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// イベント通知
///
/// 通知ユースケースが組み立て、テンプレートレンダラーと
/// NotificationSender が消費する。受信者 1 名につき 1 件生成される。
#[derive(Debug, Clone)]
pub enum EventNotification {
    /// 開催間近: ウィンドウ内のイベントをフォロワーに知らせる
    UpcomingEvent {
        event_id:            EventId,
        event_name:          String,
        /// `MM/DD/YYYY` 形式の開催日
        event_date:          String,
        /// `H:MM AM/PM` 形式の開催時刻
        event_time:          String,
        event_description:   String,
        recipient_email:     String,
        recipient_member_id: MemberId,
    },
}

impl EventNotification {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::UpcomingEvent { .. } => NotificationEventType::UpcomingEvent,
        }
    }

    /// 通知対象イベントの ID を返す
    pub fn event_id(&self) -> &EventId {
        match self {
            Self::UpcomingEvent { event_id, .. } => event_id,
        }
    }

    /// 通知対象イベントの名前を返す
    pub fn event_name(&self) -> &str {
        match self {
            Self::UpcomingEvent { event_name, .. } => event_name,
        }
    }

    /// 受信者のメールアドレスを返す
    pub fn recipient_email(&self) -> &str {
        match self {
            Self::UpcomingEvent {
                recipient_email, ..
            } => recipient_email,
        }
    }

    /// 受信者の部員 ID を返す
    pub fn recipient_member_id(&self) -> &MemberId {
        match self {
            Self::UpcomingEvent {
                recipient_member_id,
                ..
            } => recipient_member_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_notification_event_typeの文字列変換が正しい() {
        assert_eq!(
            NotificationEventType::UpcomingEvent.to_string(),
            "upcoming_event"
        );
        assert_eq!(
            NotificationEventType::from_str("upcoming_event").unwrap(),
            NotificationEventType::UpcomingEvent
        );
    }

    fn make_upcoming_event() -> EventNotification {
        EventNotification::UpcomingEvent {
            event_id:            EventId::new(),
            event_name:          "ボルダリング大会".to_string(),
            event_date:          "03/05/2020".to_string(),
            event_time:          "5:30 PM".to_string(),
            event_description:   "年に一度の学内大会".to_string(),
            recipient_email:     "climber@example.com".to_string(),
            recipient_member_id: MemberId::new(),
        }
    }

    #[test]
    fn test_event_typeが正しい値を返す() {
        assert_eq!(
            make_upcoming_event().event_type(),
            NotificationEventType::UpcomingEvent
        );
    }

    #[test]
    fn test_recipient_emailが受信者のアドレスを返す() {
        assert_eq!(
            make_upcoming_event().recipient_email(),
            "climber@example.com"
        );
    }

    #[test]
    fn test_recipient_member_idが受信者のidを返す() {
        let member_id = MemberId::new();
        let notification = EventNotification::UpcomingEvent {
            event_id:            EventId::new(),
            event_name:          "テスト".to_string(),
            event_date:          "01/01/2020".to_string(),
            event_time:          "9:00 AM".to_string(),
            event_description:   "テスト".to_string(),
            recipient_email:     "member@example.com".to_string(),
            recipient_member_id: member_id.clone(),
        };
        assert_eq!(notification.recipient_member_id(), &member_id);
    }
}
