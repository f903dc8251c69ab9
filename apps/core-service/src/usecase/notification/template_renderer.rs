//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `[Tsudoi] 開催間近のイベント: {イベント名} {開催日}`
//! - **イベント詳細リンク**: `{base_url}/events/{event_id}` をテンプレートに渡す

use tera::{Context, Tera};
use tsudoi_domain::notification::{EmailMessage, EventNotification, NotificationError};

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`EventNotification` から
/// `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "upcoming_event.html",
                    include_str!("../../../templates/notifications/upcoming_event.html"),
                ),
                (
                    "upcoming_event.txt",
                    include_str!("../../../templates/notifications/upcoming_event.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントからメールメッセージを生成する
    ///
    /// # 引数
    ///
    /// - `notification`: イベント通知
    /// - `base_url`: アプリケーションのベース URL（例: `http://localhost:5173`）
    pub fn render(
        &self,
        notification: &EventNotification,
        base_url: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let (template_name, subject, context) = self.build_template_params(notification, base_url);

        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: notification.recipient_email().to_string(),
            subject,
            html_body,
            text_body,
        })
    }

    /// テンプレート名、件名、コンテキストを構築する
    fn build_template_params(
        &self,
        notification: &EventNotification,
        base_url: &str,
    ) -> (String, String, Context) {
        let mut context = Context::new();

        let (template_name, subject) = match notification {
            EventNotification::UpcomingEvent {
                event_id,
                event_name,
                event_date,
                event_time,
                event_description,
                ..
            } => {
                let event_url = format!("{base_url}/events/{event_id}");
                context.insert("event_name", event_name);
                context.insert("event_date", event_date);
                context.insert("event_time", event_time);
                context.insert("event_description", event_description);
                context.insert("event_url", &event_url);
                (
                    "upcoming_event".to_string(),
                    format!("[Tsudoi] 開催間近のイベント: {event_name} {event_date}"),
                )
            }
        };

        (template_name, subject, context)
    }
}

#[cfg(test)]
mod tests {
    use tsudoi_domain::{event::EventId, member::MemberId};

    use super::*;

    fn make_base_url() -> &'static str {
        "http://localhost:5173"
    }

    fn make_notification(event_id: EventId) -> EventNotification {
        EventNotification::UpcomingEvent {
            event_id,
            event_name: "ボルダリング大会".to_string(),
            event_date: "03/05/2020".to_string(),
            event_time: "5:30 PM".to_string(),
            event_description: "年に一度の学内大会".to_string(),
            recipient_email: "climber@example.com".to_string(),
            recipient_member_id: MemberId::new(),
        }
    }

    #[test]
    fn newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn upcoming_eventのレンダリングが正しい() {
        let renderer = TemplateRenderer::new().unwrap();
        let event_id = EventId::new();
        let notification = make_notification(event_id.clone());

        let email = renderer.render(&notification, make_base_url()).unwrap();

        assert_eq!(email.to, "climber@example.com");
        assert_eq!(
            email.subject,
            "[Tsudoi] 開催間近のイベント: ボルダリング大会 03/05/2020"
        );
        assert!(email.html_body.contains("ボルダリング大会"));
        assert!(email.html_body.contains("03/05/2020"));
        assert!(email.html_body.contains("5:30 PM"));
        assert!(
            email
                .html_body
                .contains(&format!("http://localhost:5173/events/{event_id}"))
        );
        assert!(email.text_body.contains("ボルダリング大会"));
        assert!(email.text_body.contains("5:30 PM"));
    }

    #[test]
    fn textとhtmlの両方に説明が含まれる() {
        let renderer = TemplateRenderer::new().unwrap();
        let email = renderer
            .render(&make_notification(EventId::new()), make_base_url())
            .unwrap();

        assert!(email.html_body.contains("年に一度の学内大会"));
        assert!(email.text_body.contains("年に一度の学内大会"));
    }
}
