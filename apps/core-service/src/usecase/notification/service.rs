//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信 → ログ記録を統合するサービス。
//!
//! ## 設計方針
//!
//! - **fire-and-forget**: `notify()` はエラーを返さず、成否を bool で返す
//!   （通知バッチは 1 件の失敗で中断しない）
//! - **ログ記録**: 成功・失敗どちらも `notification_logs` テーブルに記録
//! - **依存性注入**: `NotificationSender` と `NotificationLogRepository` は trait で抽象化

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tsudoi_domain::notification::{EventNotification, NotificationLogId};
use tsudoi_infra::{
    notification::NotificationSender,
    repository::{NotificationLog, NotificationLogRepository},
};

use super::TemplateRenderer;

/// 通知サービス
///
/// イベント通知のメール送信の全体フローを統合する。
/// `notify()` は fire-and-forget で、送信失敗してもエラーを返さない。
pub struct NotificationService {
    sender: Arc<dyn NotificationSender>,
    template_renderer: TemplateRenderer,
    log_repo: Arc<dyn NotificationLogRepository>,
    base_url: String,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        log_repo: Arc<dyn NotificationLogRepository>,
        base_url: String,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            log_repo,
            base_url,
        }
    }

    /// 通知を送信する（fire-and-forget）
    ///
    /// テンプレートレンダリング → メール送信 → ログ記録を行う。
    /// いずれのステップで失敗してもエラーを返さない（ログ出力のみ）。
    ///
    /// # 戻り値
    ///
    /// 送信に成功した場合 true。
    pub async fn notify(&self, notification: EventNotification, now: DateTime<Utc>) -> bool {
        let event_type = notification.event_type();
        let event_type_str: &str = event_type.into();
        let event_id = notification.event_id().clone();
        let event_name = notification.event_name().to_string();
        let recipient_member_id = notification.recipient_member_id().clone();
        let recipient_email = notification.recipient_email().to_string();

        // テンプレートレンダリング
        let email = match self.template_renderer.render(&notification, &self.base_url) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = event_type_str,
                    "通知テンプレートのレンダリングに失敗"
                );
                return false;
            }
        };

        let subject = email.subject.clone();

        // メール送信
        let (sent, status, error_message) = match self.sender.send_email(&email).await {
            Ok(()) => {
                tracing::info!(
                    event_type = event_type_str,
                    recipient = %recipient_email,
                    "通知メール送信成功"
                );
                (true, "sent".to_string(), None)
            }
            Err(e) => {
                tracing::error!(
                    event_type = event_type_str,
                    recipient = %recipient_email,
                    error = %e,
                    "通知メール送信失敗"
                );
                (false, "failed".to_string(), Some(e.to_string()))
            }
        };

        // 通知ログ記録
        let log = NotificationLog {
            id: NotificationLogId::new(),
            event_type: event_type_str.to_string(),
            event_id,
            event_name,
            recipient_member_id,
            recipient_email,
            subject,
            status,
            error_message,
            sent_at: now,
        };

        if let Err(e) = self.log_repo.insert(&log).await {
            tracing::error!(
                error = %e,
                "通知ログの記録に失敗"
            );
        }

        sent
    }
}

#[cfg(test)]
mod tests {
    use tsudoi_domain::{event::EventId, member::MemberId};
    use tsudoi_infra::mock::{MockNotificationLogRepository, MockNotificationSender};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn make_service(
        sender: MockNotificationSender,
        log_repo: MockNotificationLogRepository,
    ) -> NotificationService {
        let template_renderer = TemplateRenderer::new().unwrap();
        NotificationService::new(
            Arc::new(sender),
            template_renderer,
            Arc::new(log_repo),
            "http://localhost:5173".to_string(),
        )
    }

    fn make_notification() -> EventNotification {
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

    #[tokio::test]
    async fn 送信成功時にlog_repoにstatus_sentで記録する() {
        let sender = MockNotificationSender::new();
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender.clone(), log_repo.clone());

        let sent = service.notify(make_notification(), now()).await;

        assert!(sent);
        let logs = log_repo.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, "sent");
        assert!(logs[0].error_message.is_none());
        assert_eq!(logs[0].event_type, "upcoming_event");
        assert_eq!(logs[0].recipient_email, "climber@example.com");
        assert_eq!(logs[0].sent_at, now());
    }

    #[tokio::test]
    async fn 送信失敗時はfalseを返しstatus_failedで記録する() {
        let sender = MockNotificationSender::failing();
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender, log_repo.clone());

        let sent = service.notify(make_notification(), now()).await;

        assert!(!sent);
        let logs = log_repo.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, "failed");
        assert!(logs[0].error_message.is_some());
    }

    #[tokio::test]
    async fn mock_notification_senderが送信メッセージを記録する() {
        let sender = MockNotificationSender::new();
        let log_repo = MockNotificationLogRepository::new();
        let service = make_service(sender.clone(), log_repo);

        service.notify(make_notification(), now()).await;

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "climber@example.com");
        assert_eq!(
            sent[0].subject,
            "[Tsudoi] 開催間近のイベント: ボルダリング大会 03/05/2020"
        );
    }
}
